//! Orbit governance API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dev_seed;
mod dto;
mod error;
mod extract;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use orbit_core::AppError;
use orbit_infrastructure::InMemoryOrbitRepository;
use tracing::info;

use crate::api_config::{ApiConfig, StorageBackendConfig};
use crate::api_services::Repositories;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;

    let (repositories, storage_backend) = match &config.storage {
        StorageBackendConfig::Postgres { database_url } => {
            let pool = api_services::connect_and_migrate(database_url.as_str()).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }
            (Repositories::postgres(pool), "postgres")
        }
        StorageBackendConfig::Memory => {
            if config.migrate_only {
                return Err(AppError::Validation(
                    "migrate requires STORAGE_BACKEND=postgres".to_owned(),
                ));
            }
            let store = Arc::new(InMemoryOrbitRepository::new());
            dev_seed::run(store.as_ref()).await?;
            (Repositories::memory(store), "memory")
        }
    };

    let app_state = api_services::build_app_state(&config, repositories, storage_backend)?;
    let app = api_router::build_router(app_state, config.frontend_url.as_str())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, storage_backend, "orbit-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
