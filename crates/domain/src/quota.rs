use orbit_core::WorkspaceId;
use serde::{Deserialize, Serialize};

/// Application ceiling applied when a workspace has no override.
pub const DEFAULT_APPLICATION_QUOTA: u32 = 5;

/// Per-workspace override of the application ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationQuota {
    /// Workspace the override applies to.
    pub workspace_id: WorkspaceId,
    /// Maximum number of active applications.
    pub max_applications: u32,
}

/// Quota usage snapshot for a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    /// Active applications.
    pub used: u32,
    /// Effective ceiling.
    pub quota: u32,
    /// Remaining headroom, never negative.
    pub remaining: u32,
    /// Whether the ceiling comes from a workspace override.
    pub has_override: bool,
}

impl QuotaInfo {
    /// Builds a snapshot, clamping remaining headroom at zero.
    #[must_use]
    pub fn new(used: u32, quota: u32, has_override: bool) -> Self {
        Self {
            used,
            quota,
            remaining: quota.saturating_sub(used),
            has_override,
        }
    }

    /// Returns whether another application fits under the ceiling.
    #[must_use]
    pub fn allows_another(&self) -> bool {
        self.used < self.quota
    }
}
