use std::sync::Arc;
use std::time::Duration;

use orbit_application::{
    ApplicationCatalogService, ApplicationLifecycleService, AuthorizationService,
    NotificationService, QuotaService, SharePolicyEvaluator, TopicShareService, WorkflowEngine,
};
use orbit_core::AppError;
use orbit_infrastructure::{
    ConsoleNotificationService, ConsoleWorkflowEngine, HttpWorkflowEngine,
    WebhookNotificationService,
};
use tracing::info;

use crate::api_config::{ApiConfig, NotificationProviderConfig, WorkflowEngineConfig};
use crate::api_services::Repositories;
use crate::state::AppState;

pub fn build_app_state(
    config: &ApiConfig,
    repositories: Repositories,
    storage_backend: &'static str,
) -> Result<AppState, AppError> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let workflow_engine: Arc<dyn WorkflowEngine> = match &config.workflow_engine {
        WorkflowEngineConfig::Console => Arc::new(ConsoleWorkflowEngine::new()),
        WorkflowEngineConfig::Temporal(temporal) => {
            info!(
                base_url = %temporal.base_url,
                namespace = %temporal.namespace,
                "using temporal workflow engine"
            );
            Arc::new(HttpWorkflowEngine::new(http_client.clone(), temporal.clone()))
        }
    };

    let notifications: Arc<dyn NotificationService> = match &config.notification_provider {
        NotificationProviderConfig::Console => Arc::new(ConsoleNotificationService::new()),
        NotificationProviderConfig::Webhook(endpoint) => Arc::new(
            WebhookNotificationService::new(http_client, endpoint.clone()),
        ),
    };

    Ok(assemble_state(
        repositories,
        workflow_engine,
        notifications,
        config,
        storage_backend,
    ))
}

pub(crate) fn assemble_state(
    repositories: Repositories,
    workflow_engine: Arc<dyn WorkflowEngine>,
    notifications: Arc<dyn NotificationService>,
    config: &ApiConfig,
    storage_backend: &'static str,
) -> AppState {
    let authorization_service = AuthorizationService::new(repositories.memberships.clone());
    let quota_service = QuotaService::new(
        repositories.catalog.applications.clone(),
        repositories.quotas.clone(),
        config.default_application_quota,
    );

    let catalog_service = ApplicationCatalogService::new(
        authorization_service.clone(),
        repositories.catalog.applications.clone(),
        quota_service,
        repositories.audit.clone(),
    );
    let lifecycle_service = ApplicationLifecycleService::new(
        authorization_service.clone(),
        repositories.catalog.clone(),
        workflow_engine.clone(),
        repositories.audit.clone(),
    );
    let share_service = TopicShareService::new(
        authorization_service,
        repositories.catalog,
        repositories.shares,
        SharePolicyEvaluator::new(repositories.share_policies),
        workflow_engine,
        notifications,
        repositories.audit,
    )
    .with_connection_config(config.kafka_connection.clone());

    AppState {
        catalog_service,
        lifecycle_service,
        share_service,
        proxy_secret: Arc::from(config.proxy_secret.as_str()),
        storage_backend,
    }
}
