use async_trait::async_trait;

use orbit_core::{AppResult, WorkspaceId};
use orbit_domain::{ApplicationQuota, WorkspaceRole};

/// Repository port for workspace memberships.
#[async_trait]
pub trait WorkspaceMembershipRepository: Send + Sync {
    /// Returns the role a subject holds in a workspace, if any.
    async fn find_member_role(
        &self,
        workspace_id: WorkspaceId,
        subject: &str,
    ) -> AppResult<Option<WorkspaceRole>>;
}

/// Repository port for per-workspace application quota overrides.
#[async_trait]
pub trait ApplicationQuotaRepository: Send + Sync {
    /// Returns the quota override of a workspace, if configured.
    async fn find_quota_override(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Option<ApplicationQuota>>;
}
