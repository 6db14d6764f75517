use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use orbit_application::DecommissionApplicationInput;
use orbit_core::{UserIdentity, WorkspaceId};
use orbit_domain::ApplicationId;

use crate::dto::{
    ApplicationLifecycleResponse, ApplicationResponse, CreateApplicationRequest,
    DecommissionApplicationRequest, ForceDeleteApplicationRequest, QuotaInfoResponse,
};
use crate::error::{ApiResponse, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn workspace_quota_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(workspace_id): Path<String>,
) -> ApiResult<Json<ApiResponse<QuotaInfoResponse>>> {
    let workspace_id = workspace_id.parse::<WorkspaceId>()?;
    let quota = state
        .catalog_service
        .workspace_quota(&user, workspace_id)
        .await?;

    Ok(ApiResponse::ok(QuotaInfoResponse::from(quota)))
}

pub async fn create_application_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(workspace_id): Path<String>,
    ApiJson(payload): ApiJson<CreateApplicationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ApplicationResponse>>)> {
    let workspace_id = workspace_id.parse::<WorkspaceId>()?;
    let application = state
        .catalog_service
        .create_application(&user, workspace_id, payload.name.as_str())
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(ApplicationResponse::from(application)),
    ))
}

pub async fn lifecycle_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(application_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ApplicationLifecycleResponse>>> {
    let application_id = application_id.parse::<ApplicationId>()?;
    let lifecycle = state
        .lifecycle_service
        .lifecycle_status(&user, application_id)
        .await?;

    Ok(ApiResponse::ok(lifecycle.into()))
}

pub async fn decommission_application_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(application_id): Path<String>,
    payload: Option<ApiJson<DecommissionApplicationRequest>>,
) -> ApiResult<Json<ApiResponse<ApplicationLifecycleResponse>>> {
    let application_id = application_id.parse::<ApplicationId>()?;
    let payload = payload.map(|ApiJson(payload)| payload).unwrap_or_default();
    let lifecycle = state
        .lifecycle_service
        .decommission_application(
            &user,
            application_id,
            DecommissionApplicationInput {
                reason: payload.reason,
                grace_period_days: payload.grace_period_days,
            },
        )
        .await?;

    Ok(ApiResponse::ok(lifecycle.into()))
}

pub async fn cancel_decommissioning_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(application_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ApplicationLifecycleResponse>>> {
    let application_id = application_id.parse::<ApplicationId>()?;
    let lifecycle = state
        .lifecycle_service
        .cancel_decommissioning(&user, application_id)
        .await?;

    Ok(ApiResponse::ok(lifecycle.into()))
}

pub async fn force_delete_application_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(application_id): Path<String>,
    payload: Option<ApiJson<ForceDeleteApplicationRequest>>,
) -> ApiResult<Json<ApiResponse<ApplicationLifecycleResponse>>> {
    let application_id = application_id.parse::<ApplicationId>()?;
    let payload = payload.map(|ApiJson(payload)| payload).unwrap_or_default();
    let lifecycle = state
        .lifecycle_service
        .force_delete_application(&user, application_id, payload.reason)
        .await?;

    Ok(ApiResponse::ok(lifecycle.into()))
}
