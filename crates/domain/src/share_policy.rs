use orbit_core::WorkspaceId;
use serde::{Deserialize, Serialize};

use crate::{AccessLevel, SharePolicyId};

/// Auto-approval rule set for topic share requests.
///
/// A policy without a workspace applies platform-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePolicy {
    /// Policy id.
    pub id: SharePolicyId,
    /// Owning workspace, or `None` for a platform-wide policy.
    pub workspace_id: Option<WorkspaceId>,
    /// Disabled policies are ignored.
    pub enabled: bool,
    /// Whether the policy approves anything at all.
    pub auto_approve: bool,
    /// Access levels eligible for auto-approval; empty means all.
    pub allowed_access_levels: Vec<AccessLevel>,
    /// Requesting workspaces eligible for auto-approval; empty means all.
    pub auto_approve_workspaces: Vec<WorkspaceId>,
    /// Higher priorities are evaluated first.
    pub priority: i32,
}

impl SharePolicy {
    /// Returns whether this policy auto-approves the request.
    #[must_use]
    pub fn auto_approves(
        &self,
        requesting_workspace_id: WorkspaceId,
        access_level: AccessLevel,
    ) -> bool {
        if !self.enabled || !self.auto_approve {
            return false;
        }

        if !self.allowed_access_levels.is_empty()
            && !self.allowed_access_levels.contains(&access_level)
        {
            return false;
        }

        self.auto_approve_workspaces.is_empty()
            || self
                .auto_approve_workspaces
                .contains(&requesting_workspace_id)
    }

    /// Returns whether the policy is scoped to a single workspace.
    #[must_use]
    pub fn is_workspace_scoped(&self) -> bool {
        self.workspace_id.is_some()
    }
}
