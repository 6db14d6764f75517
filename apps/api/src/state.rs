use std::sync::Arc;

use orbit_application::{ApplicationCatalogService, ApplicationLifecycleService, TopicShareService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: ApplicationCatalogService,
    pub lifecycle_service: ApplicationLifecycleService,
    pub share_service: TopicShareService,
    pub proxy_secret: Arc<str>,
    pub storage_backend: &'static str,
}
