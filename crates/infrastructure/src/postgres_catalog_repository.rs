use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbit_application::{
    ApplicationRepository, ServiceAccountRepository, TopicRepository, VirtualClusterRepository,
};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{
    Application, ApplicationId, ApplicationParts, ApplicationStatus, ClusterEnvironment,
    DecommissionRecord, LifecycleStatus, ServiceAccount, ServiceAccountId, ServiceAccountStatus,
    Topic, TopicId, TopicStatus, TopicVisibility, VirtualCluster, VirtualClusterId,
    VirtualClusterStatus,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

mod applications;
mod clusters;
mod topics;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for applications, virtual clusters, topics
/// and service accounts.
#[derive(Clone)]
pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    id: Uuid,
    workspace_id: Uuid,
    name: String,
    status: String,
    decommissioning_started_at: Option<DateTime<Utc>>,
    grace_period_ends_at: Option<DateTime<Utc>>,
    decommission_reason: Option<String>,
    decommission_workflow_id: Option<String>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    revision: i64,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let decommission = match (row.decommissioning_started_at, row.grace_period_ends_at) {
            (Some(started_at), Some(grace_period_ends_at)) => Some(DecommissionRecord {
                started_at,
                grace_period_ends_at,
                reason: row.decommission_reason,
                workflow_id: row.decommission_workflow_id,
            }),
            _ => None,
        };

        Application::from_parts(ApplicationParts {
            id: ApplicationId::from_uuid(row.id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            name: row.name,
            status: ApplicationStatus::parse(row.status.as_str())?,
            decommission,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
            revision: row.revision,
        })
    }
}

#[derive(Debug, FromRow)]
struct VirtualClusterRow {
    id: Uuid,
    application_id: Uuid,
    workspace_id: Uuid,
    name: String,
    environment: String,
    status: String,
    bootstrap_servers: String,
    topic_prefix: String,
}

impl TryFrom<VirtualClusterRow> for VirtualCluster {
    type Error = AppError;

    fn try_from(row: VirtualClusterRow) -> Result<Self, Self::Error> {
        VirtualCluster::new(
            VirtualClusterId::from_uuid(row.id),
            ApplicationId::from_uuid(row.application_id),
            WorkspaceId::from_uuid(row.workspace_id),
            row.name,
            ClusterEnvironment::parse(row.environment.as_str())?,
            VirtualClusterStatus::parse(row.status.as_str())?,
            row.bootstrap_servers,
            row.topic_prefix,
        )
    }
}

#[derive(Debug, FromRow)]
struct TopicRow {
    id: Uuid,
    workspace_id: Uuid,
    virtual_cluster_id: Uuid,
    name: String,
    visibility: String,
    status: String,
}

impl TryFrom<TopicRow> for Topic {
    type Error = AppError;

    fn try_from(row: TopicRow) -> Result<Self, Self::Error> {
        Topic::new(
            TopicId::from_uuid(row.id),
            WorkspaceId::from_uuid(row.workspace_id),
            VirtualClusterId::from_uuid(row.virtual_cluster_id),
            row.name,
            row.visibility.parse::<TopicVisibility>()?,
            TopicStatus::parse(row.status.as_str())?,
        )
    }
}

#[derive(Debug, FromRow)]
struct ServiceAccountRow {
    id: Uuid,
    application_id: Uuid,
    workspace_id: Uuid,
    username: String,
    status: String,
}

impl TryFrom<ServiceAccountRow> for ServiceAccount {
    type Error = AppError;

    fn try_from(row: ServiceAccountRow) -> Result<Self, Self::Error> {
        Ok(ServiceAccount {
            id: ServiceAccountId::from_uuid(row.id),
            application_id: ApplicationId::from_uuid(row.application_id),
            workspace_id: WorkspaceId::from_uuid(row.workspace_id),
            username: row.username,
            status: ServiceAccountStatus::parse(row.status.as_str())?,
        })
    }
}

#[async_trait]
impl ApplicationRepository for PostgresCatalogRepository {
    async fn create_application(&self, application: Application) -> AppResult<()> {
        self.create_application_impl(application).await
    }

    async fn find_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Option<Application>> {
        self.find_application_impl(application_id).await
    }

    async fn list_workspace_applications(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<Application>> {
        self.list_workspace_applications_impl(workspace_id).await
    }

    async fn count_applications_with_status(
        &self,
        workspace_id: WorkspaceId,
        status: ApplicationStatus,
    ) -> AppResult<u32> {
        self.count_applications_with_status_impl(workspace_id, status)
            .await
    }

    async fn update_application(&self, application: &Application) -> AppResult<Application> {
        self.update_application_impl(application).await
    }
}

#[async_trait]
impl VirtualClusterRepository for PostgresCatalogRepository {
    async fn find_virtual_cluster(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Option<VirtualCluster>> {
        self.find_virtual_cluster_impl(virtual_cluster_id).await
    }

    async fn list_application_virtual_clusters(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<VirtualCluster>> {
        self.list_application_virtual_clusters_impl(application_id)
            .await
    }

    async fn update_virtual_cluster(&self, virtual_cluster: &VirtualCluster) -> AppResult<()> {
        self.update_virtual_cluster_impl(virtual_cluster).await
    }
}

#[async_trait]
impl TopicRepository for PostgresCatalogRepository {
    async fn find_topic(&self, topic_id: TopicId) -> AppResult<Option<Topic>> {
        self.find_topic_impl(topic_id).await
    }

    async fn list_virtual_cluster_topics(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Vec<Topic>> {
        self.list_virtual_cluster_topics_impl(virtual_cluster_id)
            .await
    }

    async fn update_topic(&self, topic: &Topic) -> AppResult<()> {
        self.update_topic_impl(topic).await
    }
}

#[async_trait]
impl ServiceAccountRepository for PostgresCatalogRepository {
    async fn list_application_service_accounts(
        &self,
        application_ids: &[ApplicationId],
    ) -> AppResult<Vec<ServiceAccount>> {
        self.list_application_service_accounts_impl(application_ids)
            .await
    }
}
