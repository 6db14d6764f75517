use std::sync::Arc;

use orbit_application::{
    ApplicationQuotaRepository, AuditRepository, CatalogRepositories, SharePolicyRepository,
    TopicShareRepository, WorkspaceMembershipRepository,
};
use orbit_infrastructure::{
    InMemoryOrbitRepository, PostgresAuditRepository, PostgresCatalogRepository,
    PostgresSharingRepository, PostgresWorkspaceRepository,
};
use sqlx::PgPool;

/// Repository ports for one storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub catalog: CatalogRepositories,
    pub shares: Arc<dyn TopicShareRepository>,
    pub share_policies: Arc<dyn SharePolicyRepository>,
    pub memberships: Arc<dyn WorkspaceMembershipRepository>,
    pub quotas: Arc<dyn ApplicationQuotaRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let catalog = Arc::new(PostgresCatalogRepository::new(pool.clone()));
        let sharing = Arc::new(PostgresSharingRepository::new(pool.clone()));
        let workspaces = Arc::new(PostgresWorkspaceRepository::new(pool.clone()));

        Self {
            catalog: CatalogRepositories {
                applications: catalog.clone(),
                virtual_clusters: catalog.clone(),
                topics: catalog.clone(),
                service_accounts: catalog,
            },
            shares: sharing.clone(),
            share_policies: sharing,
            memberships: workspaces.clone(),
            quotas: workspaces,
            audit: Arc::new(PostgresAuditRepository::new(pool)),
        }
    }

    pub fn memory(store: Arc<InMemoryOrbitRepository>) -> Self {
        Self {
            catalog: CatalogRepositories {
                applications: store.clone(),
                virtual_clusters: store.clone(),
                topics: store.clone(),
                service_accounts: store.clone(),
            },
            shares: store.clone(),
            share_policies: store.clone(),
            memberships: store.clone(),
            quotas: store.clone(),
            audit: store,
        }
    }
}
