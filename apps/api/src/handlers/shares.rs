use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use orbit_application::RequestTopicShareInput;
use orbit_core::UserIdentity;
use orbit_domain::{TopicId, TopicShareId};

use crate::dto::{
    ConnectionDetailsResponse, RejectTopicShareRequest, RequestTopicShareRequest,
    ShareRequestOutcomeResponse, TopicShareResponse,
};
use crate::error::{ApiResponse, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub async fn request_share_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<RequestTopicShareRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ShareRequestOutcomeResponse>>)> {
    let input = RequestTopicShareInput::try_from(payload)?;
    let outcome = state.share_service.request_share(&user, input).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(ShareRequestOutcomeResponse::from(outcome)),
    ))
}

pub async fn approve_share_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<ApiResponse<TopicShareResponse>>> {
    let share_id = share_id.parse::<TopicShareId>()?;
    let share = state.share_service.approve_share(&user, share_id).await?;

    Ok(ApiResponse::ok(share.into()))
}

pub async fn reject_share_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(share_id): Path<String>,
    payload: Option<ApiJson<RejectTopicShareRequest>>,
) -> ApiResult<Json<ApiResponse<TopicShareResponse>>> {
    let share_id = share_id.parse::<TopicShareId>()?;
    let payload = payload.map(|ApiJson(payload)| payload).unwrap_or_default();
    let share = state
        .share_service
        .reject_share(&user, share_id, payload.reason)
        .await?;

    Ok(ApiResponse::ok(share.into()))
}

pub async fn revoke_share_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<ApiResponse<TopicShareResponse>>> {
    let share_id = share_id.parse::<TopicShareId>()?;
    let share = state.share_service.revoke_share(&user, share_id).await?;

    Ok(ApiResponse::ok(share.into()))
}

pub async fn share_connection_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(share_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ConnectionDetailsResponse>>> {
    let share_id = share_id.parse::<TopicShareId>()?;
    let details = state
        .share_service
        .share_connection_details(&user, share_id)
        .await?;

    Ok(ApiResponse::ok(details.into()))
}

pub async fn topic_connection_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(topic_id): Path<String>,
) -> ApiResult<Json<ApiResponse<ConnectionDetailsResponse>>> {
    let topic_id = topic_id.parse::<TopicId>()?;
    let details = state
        .share_service
        .topic_connection_details(&user, topic_id)
        .await?;

    Ok(ApiResponse::ok(details.into()))
}
