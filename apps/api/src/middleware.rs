use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use orbit_core::{AppError, AppResult, UserIdentity};

use crate::error::ApiResult;
use crate::state::AppState;

pub const PROXY_SECRET_HEADER: &str = "x-orbit-proxy-secret";
pub const SUBJECT_HEADER: &str = "x-orbit-subject";
pub const DISPLAY_NAME_HEADER: &str = "x-orbit-display-name";
pub const EMAIL_HEADER: &str = "x-orbit-email";

/// Accepts identity headers only from the authenticating proxy.
pub async fn require_proxy_identity(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = identity_from_headers(request.headers(), state.proxy_secret.as_ref())?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

pub fn identity_from_headers(headers: &HeaderMap, proxy_secret: &str) -> AppResult<UserIdentity> {
    let presented = header_value(headers, PROXY_SECRET_HEADER)?
        .ok_or_else(|| AppError::Unauthorized("request did not pass the auth proxy".to_owned()))?;
    if !constant_time_eq(presented.as_bytes(), proxy_secret.as_bytes()) {
        return Err(AppError::Unauthorized(
            "request did not pass the auth proxy".to_owned(),
        ));
    }

    let subject = header_value(headers, SUBJECT_HEADER)?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let display_name =
        header_value(headers, DISPLAY_NAME_HEADER)?.unwrap_or_else(|| subject.clone());
    let email = header_value(headers, EMAIL_HEADER)?;

    Ok(UserIdentity::new(subject, display_name, email))
}

fn header_value(headers: &HeaderMap, name: &str) -> AppResult<Option<String>> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(|value| value.trim().to_owned())
                .map_err(|_| AppError::Validation(format!("header '{name}' is not valid text")))
        })
        .transpose()
        .map(|value| value.filter(|value| !value.is_empty()))
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |difference, (left, right)| difference | (left ^ right))
            == 0
}
