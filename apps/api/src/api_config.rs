use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use orbit_application::{ConnectionMode, KafkaConnectionConfig};
use orbit_core::AppError;
use orbit_domain::DEFAULT_APPLICATION_QUOTA;
use orbit_infrastructure::TemporalHttpConfig;
use tracing_subscriber::EnvFilter;
use url::Url;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendConfig {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEngineConfig {
    Console,
    Temporal(TemporalHttpConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationProviderConfig {
    Console,
    Webhook(Url),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageBackendConfig,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub proxy_secret: String,
    pub workflow_engine: WorkflowEngineConfig,
    pub kafka_connection: KafkaConnectionConfig,
    pub default_application_quota: u32,
    pub notification_provider: NotificationProviderConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let variables = Variables { lookup };

        let storage = match variables.or("STORAGE_BACKEND", "postgres").as_str() {
            "postgres" => StorageBackendConfig::Postgres {
                database_url: variables.required("DATABASE_URL")?,
            },
            "memory" => StorageBackendConfig::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let proxy_secret = variables.required("ORBIT_PROXY_SECRET")?;
        if proxy_secret.len() < 16 {
            return Err(AppError::Validation(
                "ORBIT_PROXY_SECRET must be at least 16 characters".to_owned(),
            ));
        }

        let workflow_engine = match variables.or("WORKFLOW_ENGINE", "console").as_str() {
            "console" => WorkflowEngineConfig::Console,
            "temporal" => WorkflowEngineConfig::Temporal(TemporalHttpConfig {
                base_url: variables.url("TEMPORAL_HTTP_URL")?,
                namespace: variables.or("TEMPORAL_NAMESPACE", "default"),
                task_queue: variables.or("TEMPORAL_TASK_QUEUE", "orbit-governance"),
                max_attempts: variables.parsed("WORKFLOW_MAX_ATTEMPTS", 3)?,
                retry_backoff_ms: variables.parsed("WORKFLOW_RETRY_BACKOFF_MS", 250)?,
            }),
            other => {
                return Err(AppError::Validation(format!(
                    "WORKFLOW_ENGINE must be either 'console' or 'temporal', got '{other}'"
                )));
            }
        };

        let connection_mode = variables.or("KAFKA_CONNECTION_MODE", "direct");
        let kafka_connection = match ConnectionMode::from_str(connection_mode.as_str())? {
            ConnectionMode::Direct => KafkaConnectionConfig::direct(),
            ConnectionMode::Proxy => {
                KafkaConnectionConfig::proxy(variables.required("KAFKA_PROXY_BOOTSTRAP")?)?
            }
        };

        let notification_provider = match variables.or("NOTIFICATION_PROVIDER", "console").as_str()
        {
            "console" => NotificationProviderConfig::Console,
            "webhook" => {
                NotificationProviderConfig::Webhook(variables.url("NOTIFICATION_WEBHOOK_URL")?)
            }
            other => {
                return Err(AppError::Validation(format!(
                    "NOTIFICATION_PROVIDER must be either 'console' or 'webhook', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only,
            storage,
            frontend_url: variables.or("FRONTEND_URL", "http://localhost:3000"),
            api_host: variables.or("API_HOST", "127.0.0.1"),
            api_port: variables.parsed("API_PORT", 3001)?,
            proxy_secret,
            workflow_engine,
            kafka_connection,
            default_application_quota: variables
                .parsed("DEFAULT_APPLICATION_QUOTA", DEFAULT_APPLICATION_QUOTA)?,
            notification_provider,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

struct Variables<F> {
    lookup: F,
}

impl<F> Variables<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn non_empty(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn or(&self, name: &str, default: &str) -> String {
        self.non_empty(name).unwrap_or_else(|| default.to_owned())
    }

    fn required(&self, name: &str) -> Result<String, AppError> {
        self.non_empty(name)
            .ok_or_else(|| AppError::Validation(format!("{name} is required")))
    }

    fn url(&self, name: &str) -> Result<Url, AppError> {
        let value = self.required(name)?;
        Url::parse(value.as_str())
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
    }

    fn parsed<T>(&self, name: &str, default: T) -> Result<T, AppError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.non_empty(name)
            .map(|value| {
                value.parse::<T>().map_err(|error| {
                    AppError::Validation(format!("invalid {name} '{value}': {error}"))
                })
            })
            .transpose()
            .map(|value| value.unwrap_or(default))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
