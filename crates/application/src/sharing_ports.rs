use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbit_core::{AppResult, WorkspaceId};
use orbit_domain::{SharePolicy, TopicId, TopicShare, TopicShareId};

/// Repository port for topic shares.
#[async_trait]
pub trait TopicShareRepository: Send + Sync {
    /// Persists a new share.
    ///
    /// Fails with `AppError::Conflict` when an open share already exists for
    /// the same topic and target workspace.
    async fn create_share(&self, share: TopicShare) -> AppResult<()>;

    /// Returns one share by id.
    async fn find_share(&self, share_id: TopicShareId) -> AppResult<Option<TopicShare>>;

    /// Returns the pending or approved share for a topic and target workspace.
    async fn find_open_share(
        &self,
        topic_id: TopicId,
        target_workspace_id: WorkspaceId,
    ) -> AppResult<Option<TopicShare>>;

    /// Persists share state.
    async fn update_share(&self, share: &TopicShare) -> AppResult<()>;

    /// Lists approved shares whose expiry is at or before `now`.
    async fn list_shares_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<TopicShare>>;
}

/// Repository port for share auto-approval policies.
#[async_trait]
pub trait SharePolicyRepository: Send + Sync {
    /// Lists enabled policies scoped to the owner workspace or platform-wide.
    async fn list_enabled_policies(
        &self,
        owner_workspace_id: WorkspaceId,
    ) -> AppResult<Vec<SharePolicy>>;
}
