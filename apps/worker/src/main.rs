//! Orbit share expiry worker.

#![forbid(unsafe_code)]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use orbit_application::{
    AuthorizationService, CatalogRepositories, NotificationService, SharePolicyEvaluator,
    TopicShareService,
};
use orbit_core::{AppError, AppResult};
use orbit_infrastructure::{
    ConsoleNotificationService, ConsoleWorkflowEngine, PostgresAuditRepository,
    PostgresCatalogRepository, PostgresSharingRepository, PostgresWorkspaceRepository,
    WebhookNotificationService,
};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
enum NotificationTarget {
    Console,
    Webhook(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct WorkerConfig {
    database_url: String,
    sweep_interval: Duration,
    notifications: NotificationTarget,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = WorkerConfig::from_lookup(|name| env::var(name).ok())?;
    let pool = connect_pool(config.database_url.as_str()).await?;
    let share_service = build_share_service(pool, &config)?;

    info!(
        interval_seconds = config.sweep_interval.as_secs(),
        "orbit-worker started"
    );

    let mut ticker = tokio::time::interval(config.sweep_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match share_service.expire_due_shares(Utc::now()).await {
            Ok(expired) if expired.is_empty() => {}
            Ok(expired) => info!(expired_count = expired.len(), "expired topic shares"),
            Err(error) => warn!(error = %error, "share expiry sweep failed"),
        }
    }
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

// Expiry never provisions access, so the workflow engine is never called.
fn build_share_service(pool: PgPool, config: &WorkerConfig) -> AppResult<TopicShareService> {
    let catalog = Arc::new(PostgresCatalogRepository::new(pool.clone()));
    let sharing = Arc::new(PostgresSharingRepository::new(pool.clone()));
    let workspaces = Arc::new(PostgresWorkspaceRepository::new(pool.clone()));

    let notifications: Arc<dyn NotificationService> = match &config.notifications {
        NotificationTarget::Console => Arc::new(ConsoleNotificationService::new()),
        NotificationTarget::Webhook(endpoint) => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build HTTP client: {error}"))
                })?;
            Arc::new(WebhookNotificationService::new(
                http_client,
                endpoint.clone(),
            ))
        }
    };

    Ok(TopicShareService::new(
        AuthorizationService::new(workspaces),
        CatalogRepositories {
            applications: catalog.clone(),
            virtual_clusters: catalog.clone(),
            topics: catalog.clone(),
            service_accounts: catalog,
        },
        sharing.clone(),
        SharePolicyEvaluator::new(sharing),
        Arc::new(ConsoleWorkflowEngine::new()),
        notifications,
        Arc::new(PostgresAuditRepository::new(pool)),
    ))
}

impl WorkerConfig {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::Validation("DATABASE_URL is required".to_owned()))?;

        let interval_seconds = match lookup("SHARE_EXPIRY_INTERVAL_SECONDS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid SHARE_EXPIRY_INTERVAL_SECONDS value '{value}': {error}"
                ))
            })?,
            None => 60,
        };
        if interval_seconds == 0 {
            return Err(AppError::Validation(
                "SHARE_EXPIRY_INTERVAL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let provider = lookup("NOTIFICATION_PROVIDER").unwrap_or_else(|| "console".to_owned());
        let notifications = match provider.trim() {
            "console" => NotificationTarget::Console,
            "webhook" => {
                let raw = lookup("NOTIFICATION_WEBHOOK_URL").ok_or_else(|| {
                    AppError::Validation(
                        "NOTIFICATION_WEBHOOK_URL is required for the webhook provider".to_owned(),
                    )
                })?;
                let endpoint = Url::parse(raw.as_str()).map_err(|error| {
                    AppError::Validation(format!(
                        "invalid NOTIFICATION_WEBHOOK_URL value '{raw}': {error}"
                    ))
                })?;
                NotificationTarget::Webhook(endpoint)
            }
            other => {
                return Err(AppError::Validation(format!(
                    "unknown NOTIFICATION_PROVIDER '{other}'"
                )));
            }
        };

        Ok(Self {
            database_url,
            sweep_interval: Duration::from_secs(interval_seconds),
            notifications,
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
