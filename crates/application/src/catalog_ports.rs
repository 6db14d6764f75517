use std::sync::Arc;

use async_trait::async_trait;

use orbit_core::{AppResult, WorkspaceId};
use orbit_domain::{
    Application, ApplicationId, ApplicationStatus, ServiceAccount, Topic, TopicId, VirtualCluster,
    VirtualClusterId,
};

/// Repository port for applications.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persists a new application.
    async fn create_application(&self, application: Application) -> AppResult<()>;

    /// Returns one application by id.
    async fn find_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Option<Application>>;

    /// Lists applications registered in a workspace.
    async fn list_workspace_applications(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<Application>>;

    /// Counts workspace applications in one status.
    async fn count_applications_with_status(
        &self,
        workspace_id: WorkspaceId,
        status: ApplicationStatus,
    ) -> AppResult<u32>;

    /// Persists application state when the stored revision still equals
    /// `application.revision()`, returning the stored value at its new revision.
    ///
    /// A stale revision fails with `AppError::Conflict`.
    async fn update_application(&self, application: &Application) -> AppResult<Application>;
}

/// Repository port for virtual clusters.
#[async_trait]
pub trait VirtualClusterRepository: Send + Sync {
    /// Returns one virtual cluster by id.
    async fn find_virtual_cluster(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Option<VirtualCluster>>;

    /// Lists every virtual cluster owned by an application.
    async fn list_application_virtual_clusters(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<VirtualCluster>>;

    /// Persists virtual cluster state.
    async fn update_virtual_cluster(&self, virtual_cluster: &VirtualCluster) -> AppResult<()>;
}

/// Repository port for topics.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Returns one topic by id.
    async fn find_topic(&self, topic_id: TopicId) -> AppResult<Option<Topic>>;

    /// Lists topics hosted by a virtual cluster.
    async fn list_virtual_cluster_topics(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Vec<Topic>>;

    /// Persists topic state.
    async fn update_topic(&self, topic: &Topic) -> AppResult<()>;
}

/// Repository port for application service accounts.
#[async_trait]
pub trait ServiceAccountRepository: Send + Sync {
    /// Lists service accounts of the given applications in any status.
    async fn list_application_service_accounts(
        &self,
        application_ids: &[ApplicationId],
    ) -> AppResult<Vec<ServiceAccount>>;
}

/// Catalog repositories shared by services that walk the
/// application -> virtual cluster -> topic hierarchy.
#[derive(Clone)]
pub struct CatalogRepositories {
    /// Application store.
    pub applications: Arc<dyn ApplicationRepository>,
    /// Virtual cluster store.
    pub virtual_clusters: Arc<dyn VirtualClusterRepository>,
    /// Topic store.
    pub topics: Arc<dyn TopicRepository>,
    /// Service account store.
    pub service_accounts: Arc<dyn ServiceAccountRepository>,
}
