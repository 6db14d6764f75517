use std::sync::Arc;

use orbit_core::{AppResult, WorkspaceId};
use orbit_domain::{ApplicationStatus, QuotaInfo};

use crate::{ApplicationQuotaRepository, ApplicationRepository};

/// Read-only projection of workspace application ceilings.
#[derive(Clone)]
pub struct QuotaService {
    applications: Arc<dyn ApplicationRepository>,
    quotas: Arc<dyn ApplicationQuotaRepository>,
    default_quota: u32,
}

impl QuotaService {
    /// Creates a quota service using `default_quota` when a workspace has no
    /// override.
    #[must_use]
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        quotas: Arc<dyn ApplicationQuotaRepository>,
        default_quota: u32,
    ) -> Self {
        Self {
            applications,
            quotas,
            default_quota,
        }
    }

    /// Returns the override when one exists, otherwise the default ceiling.
    pub async fn effective_quota(&self, workspace_id: WorkspaceId) -> AppResult<u32> {
        Ok(self
            .quotas
            .find_quota_override(workspace_id)
            .await?
            .map_or(self.default_quota, |quota| quota.max_applications))
    }

    /// Counts active applications. Decommissioning and deleted ones do not
    /// consume quota.
    pub async fn quota_usage(&self, workspace_id: WorkspaceId) -> AppResult<u32> {
        self.applications
            .count_applications_with_status(workspace_id, ApplicationStatus::Active)
            .await
    }

    /// Returns whether one more application fits under the ceiling.
    pub async fn can_create_application(&self, workspace_id: WorkspaceId) -> AppResult<bool> {
        let quota = self.workspace_quota_info(workspace_id).await?;
        Ok(quota.allows_another())
    }

    /// Returns usage, ceiling, remaining headroom and override flag.
    pub async fn workspace_quota_info(&self, workspace_id: WorkspaceId) -> AppResult<QuotaInfo> {
        let quota_override = self.quotas.find_quota_override(workspace_id).await?;
        let used = self.quota_usage(workspace_id).await?;
        let quota = quota_override.map_or(self.default_quota, |quota| quota.max_applications);

        Ok(QuotaInfo::new(used, quota, quota_override.is_some()))
    }
}
