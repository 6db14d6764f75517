use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orbit_application::{
    ApplicationQuotaRepository, ApplicationRepository, AuditEvent, AuditRepository,
    ServiceAccountRepository, SharePolicyRepository, TopicRepository, TopicShareRepository,
    VirtualClusterRepository, WorkspaceMembershipRepository,
};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{
    Application, ApplicationId, ApplicationQuota, ApplicationStatus, ServiceAccount, SharePolicy,
    Topic, TopicId, TopicShare, TopicShareId, VirtualCluster, VirtualClusterId, WorkspaceRole,
};
use tokio::sync::RwLock;

#[cfg(test)]
mod tests;

/// In-memory implementation of every Orbit repository port.
///
/// Backs the API when `STORAGE_BACKEND=memory` and the local dev seed.
#[derive(Debug, Default)]
pub struct InMemoryOrbitRepository {
    applications: RwLock<HashMap<ApplicationId, Application>>,
    virtual_clusters: RwLock<HashMap<VirtualClusterId, VirtualCluster>>,
    topics: RwLock<HashMap<TopicId, Topic>>,
    service_accounts: RwLock<Vec<ServiceAccount>>,
    shares: RwLock<HashMap<TopicShareId, TopicShare>>,
    policies: RwLock<Vec<SharePolicy>>,
    memberships: RwLock<HashMap<(WorkspaceId, String), WorkspaceRole>>,
    quotas: RwLock<HashMap<WorkspaceId, ApplicationQuota>>,
    audit_events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryOrbitRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a subject a role in a workspace.
    pub async fn insert_membership(
        &self,
        workspace_id: WorkspaceId,
        subject: impl Into<String>,
        role: WorkspaceRole,
    ) {
        self.memberships
            .write()
            .await
            .insert((workspace_id, subject.into()), role);
    }

    /// Sets a workspace quota override.
    pub async fn insert_quota(&self, quota: ApplicationQuota) {
        self.quotas.write().await.insert(quota.workspace_id, quota);
    }

    /// Stores a virtual cluster.
    pub async fn insert_virtual_cluster(&self, virtual_cluster: VirtualCluster) {
        self.virtual_clusters
            .write()
            .await
            .insert(virtual_cluster.id(), virtual_cluster);
    }

    /// Stores a topic.
    pub async fn insert_topic(&self, topic: Topic) {
        self.topics.write().await.insert(topic.id(), topic);
    }

    /// Stores a service account.
    pub async fn insert_service_account(&self, service_account: ServiceAccount) {
        self.service_accounts.write().await.push(service_account);
    }

    /// Stores a share policy.
    pub async fn insert_share_policy(&self, policy: SharePolicy) {
        self.policies.write().await.push(policy);
    }

    /// Returns every audit event appended so far, oldest first.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryOrbitRepository {
    async fn create_application(&self, application: Application) -> AppResult<()> {
        let mut applications = self.applications.write().await;
        if applications.contains_key(&application.id()) {
            return Err(AppError::Conflict(format!(
                "application '{}' already exists",
                application.id()
            )));
        }

        applications.insert(application.id(), application);
        Ok(())
    }

    async fn find_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Option<Application>> {
        Ok(self.applications.read().await.get(&application_id).cloned())
    }

    async fn list_workspace_applications(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<Application>> {
        let mut applications: Vec<Application> = self
            .applications
            .read()
            .await
            .values()
            .filter(|application| application.workspace_id() == workspace_id)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(applications)
    }

    async fn count_applications_with_status(
        &self,
        workspace_id: WorkspaceId,
        status: ApplicationStatus,
    ) -> AppResult<u32> {
        let count = self
            .applications
            .read()
            .await
            .values()
            .filter(|application| {
                application.workspace_id() == workspace_id && application.status() == status
            })
            .count();

        u32::try_from(count).map_err(|error| {
            AppError::Internal(format!("application count out of range: {error}"))
        })
    }

    async fn update_application(&self, application: &Application) -> AppResult<Application> {
        let mut applications = self.applications.write().await;
        let stored = applications.get(&application.id()).ok_or_else(|| {
            AppError::NotFound(format!("application '{}' does not exist", application.id()))
        })?;

        if stored.revision() != application.revision() {
            return Err(AppError::Conflict(format!(
                "application '{}' was modified concurrently",
                application.id()
            )));
        }

        let updated = application
            .clone()
            .with_revision(application.revision().saturating_add(1));
        applications.insert(updated.id(), updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl VirtualClusterRepository for InMemoryOrbitRepository {
    async fn find_virtual_cluster(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Option<VirtualCluster>> {
        Ok(self
            .virtual_clusters
            .read()
            .await
            .get(&virtual_cluster_id)
            .cloned())
    }

    async fn list_application_virtual_clusters(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<VirtualCluster>> {
        let mut clusters: Vec<VirtualCluster> = self
            .virtual_clusters
            .read()
            .await
            .values()
            .filter(|cluster| cluster.application_id() == application_id)
            .cloned()
            .collect();
        clusters.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(clusters)
    }

    async fn update_virtual_cluster(&self, virtual_cluster: &VirtualCluster) -> AppResult<()> {
        let mut clusters = self.virtual_clusters.write().await;
        let Some(stored) = clusters.get_mut(&virtual_cluster.id()) else {
            return Err(AppError::NotFound(format!(
                "virtual cluster '{}' does not exist",
                virtual_cluster.id()
            )));
        };

        *stored = virtual_cluster.clone();
        Ok(())
    }
}

#[async_trait]
impl TopicRepository for InMemoryOrbitRepository {
    async fn find_topic(&self, topic_id: TopicId) -> AppResult<Option<Topic>> {
        Ok(self.topics.read().await.get(&topic_id).cloned())
    }

    async fn list_virtual_cluster_topics(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Vec<Topic>> {
        let mut topics: Vec<Topic> = self
            .topics
            .read()
            .await
            .values()
            .filter(|topic| topic.virtual_cluster_id() == virtual_cluster_id)
            .cloned()
            .collect();
        topics.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(topics)
    }

    async fn update_topic(&self, topic: &Topic) -> AppResult<()> {
        let mut topics = self.topics.write().await;
        let Some(stored) = topics.get_mut(&topic.id()) else {
            return Err(AppError::NotFound(format!(
                "topic '{}' does not exist",
                topic.id()
            )));
        };

        *stored = topic.clone();
        Ok(())
    }
}

#[async_trait]
impl ServiceAccountRepository for InMemoryOrbitRepository {
    async fn list_application_service_accounts(
        &self,
        application_ids: &[ApplicationId],
    ) -> AppResult<Vec<ServiceAccount>> {
        Ok(self
            .service_accounts
            .read()
            .await
            .iter()
            .filter(|account| application_ids.contains(&account.application_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TopicShareRepository for InMemoryOrbitRepository {
    async fn create_share(&self, share: TopicShare) -> AppResult<()> {
        let mut shares = self.shares.write().await;
        let open_share_exists = shares.values().any(|existing| {
            existing.topic_id() == share.topic_id()
                && existing.target_workspace_id() == share.target_workspace_id()
                && existing.status().is_open()
        });
        if open_share_exists {
            return Err(AppError::Conflict(format!(
                "topic '{}' already has an open share for workspace '{}'",
                share.topic_id(),
                share.target_workspace_id()
            )));
        }

        shares.insert(share.id(), share);
        Ok(())
    }

    async fn find_share(&self, share_id: TopicShareId) -> AppResult<Option<TopicShare>> {
        Ok(self.shares.read().await.get(&share_id).cloned())
    }

    async fn find_open_share(
        &self,
        topic_id: TopicId,
        target_workspace_id: WorkspaceId,
    ) -> AppResult<Option<TopicShare>> {
        Ok(self
            .shares
            .read()
            .await
            .values()
            .find(|share| {
                share.topic_id() == topic_id
                    && share.target_workspace_id() == target_workspace_id
                    && share.status().is_open()
            })
            .cloned())
    }

    async fn update_share(&self, share: &TopicShare) -> AppResult<()> {
        let mut shares = self.shares.write().await;
        let Some(stored) = shares.get_mut(&share.id()) else {
            return Err(AppError::NotFound(format!(
                "topic share '{}' does not exist",
                share.id()
            )));
        };

        *stored = share.clone();
        Ok(())
    }

    async fn list_shares_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<TopicShare>> {
        let mut due: Vec<TopicShare> = self
            .shares
            .read()
            .await
            .values()
            .filter(|share| share.is_due_for_expiry(now))
            .cloned()
            .collect();
        due.sort_by_key(TopicShare::expires_at);
        Ok(due)
    }
}

#[async_trait]
impl SharePolicyRepository for InMemoryOrbitRepository {
    async fn list_enabled_policies(
        &self,
        owner_workspace_id: WorkspaceId,
    ) -> AppResult<Vec<SharePolicy>> {
        Ok(self
            .policies
            .read()
            .await
            .iter()
            .filter(|policy| {
                policy.enabled
                    && policy
                        .workspace_id
                        .is_none_or(|workspace_id| workspace_id == owner_workspace_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkspaceMembershipRepository for InMemoryOrbitRepository {
    async fn find_member_role(
        &self,
        workspace_id: WorkspaceId,
        subject: &str,
    ) -> AppResult<Option<WorkspaceRole>> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(workspace_id, subject.to_owned()))
            .copied())
    }
}

#[async_trait]
impl ApplicationQuotaRepository for InMemoryOrbitRepository {
    async fn find_quota_override(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Option<ApplicationQuota>> {
        Ok(self.quotas.read().await.get(&workspace_id).copied())
    }
}

#[async_trait]
impl AuditRepository for InMemoryOrbitRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_events.write().await.push(event);
        Ok(())
    }
}
