use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use orbit_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/workspaces/{workspace_id}/quota",
            get(handlers::applications::workspace_quota_handler),
        )
        .route(
            "/api/workspaces/{workspace_id}/applications",
            post(handlers::applications::create_application_handler),
        )
        .route(
            "/api/applications/{application_id}/lifecycle",
            get(handlers::applications::lifecycle_status_handler),
        )
        .route(
            "/api/applications/{application_id}/decommission",
            post(handlers::applications::decommission_application_handler),
        )
        .route(
            "/api/applications/{application_id}/cancel-decommission",
            post(handlers::applications::cancel_decommissioning_handler),
        )
        .route(
            "/api/applications/{application_id}/force-delete",
            post(handlers::applications::force_delete_application_handler),
        )
        .route(
            "/api/topic-shares",
            post(handlers::shares::request_share_handler),
        )
        .route(
            "/api/topic-shares/{share_id}/approve",
            post(handlers::shares::approve_share_handler),
        )
        .route(
            "/api/topic-shares/{share_id}/reject",
            post(handlers::shares::reject_share_handler),
        )
        .route(
            "/api/topic-shares/{share_id}/revoke",
            post(handlers::shares::revoke_share_handler),
        )
        .route(
            "/api/topic-shares/{share_id}/connection",
            get(handlers::shares::share_connection_handler),
        )
        .route(
            "/api/topics/{topic_id}/connection",
            get(handlers::shares::topic_connection_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_proxy_identity,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
