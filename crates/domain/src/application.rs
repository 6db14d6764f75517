use chrono::{DateTime, TimeDelta, Utc};
use orbit_core::{AppError, AppResult, NonEmptyString, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, ClusterEnvironment, LifecycleStatus};

/// Shortest grace period an administrator may request, in days.
pub const MIN_GRACE_PERIOD_DAYS: u32 = 1;
/// Longest grace period an administrator may request, in days.
pub const MAX_GRACE_PERIOD_DAYS: u32 = 365;

const PRODUCTION_GRACE_PERIOD_DAYS: i64 = 30;
const STAGING_GRACE_PERIOD_DAYS: i64 = 14;
const DEVELOPMENT_GRACE_PERIOD_DAYS: i64 = 7;

/// Lifecycle status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Application is live.
    Active,
    /// Application is inside its decommission grace period.
    Decommissioning,
    /// Application has been removed.
    Deleted,
}

impl ApplicationStatus {
    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "active" => Ok(Self::Active),
            "decommissioning" => Ok(Self::Decommissioning),
            "deleted" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown application status '{value}'"
            ))),
        }
    }
}

impl LifecycleStatus for ApplicationStatus {
    const RESOURCE: &'static str = "application";

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Decommissioning, Self::Deleted],
            Self::Decommissioning => &[Self::Active, Self::Deleted],
            Self::Deleted => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Decommissioning => "decommissioning",
            Self::Deleted => "deleted",
        }
    }
}

/// Decommission bookkeeping carried by an application while it winds down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecommissionRecord {
    /// When decommissioning started.
    pub started_at: DateTime<Utc>,
    /// When the grace period ends and cleanup may run.
    pub grace_period_ends_at: DateTime<Utc>,
    /// Optional administrator-supplied reason.
    pub reason: Option<String>,
    /// Workflow execution scheduled for cleanup.
    pub workflow_id: Option<String>,
}

/// Raw persisted application fields used by repositories to rebuild an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationParts {
    /// Application id.
    pub id: ApplicationId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: ApplicationStatus,
    /// Decommission bookkeeping.
    pub decommission: Option<DecommissionRecord>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency revision.
    pub revision: i64,
}

/// Application registered by a workspace and owning virtual clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    id: ApplicationId,
    workspace_id: WorkspaceId,
    name: NonEmptyString,
    status: ApplicationStatus,
    decommission: Option<DecommissionRecord>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    revision: i64,
}

impl Application {
    /// Creates a new active application.
    pub fn new(
        id: ApplicationId,
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            workspace_id,
            name: NonEmptyString::new(name)?,
            status: ApplicationStatus::Active,
            decommission: None,
            created_at,
            deleted_at: None,
            revision: 0,
        })
    }

    /// Rebuilds an application from persisted fields.
    pub fn from_parts(parts: ApplicationParts) -> AppResult<Self> {
        if parts.status == ApplicationStatus::Decommissioning && parts.decommission.is_none() {
            return Err(AppError::Internal(format!(
                "application '{}' is decommissioning without a decommission record",
                parts.id
            )));
        }

        Ok(Self {
            id: parts.id,
            workspace_id: parts.workspace_id,
            name: NonEmptyString::new(parts.name)?,
            status: parts.status,
            decommission: parts.decommission,
            created_at: parts.created_at,
            deleted_at: parts.deleted_at,
            revision: parts.revision,
        })
    }

    /// Returns the application id.
    #[must_use]
    pub fn id(&self) -> ApplicationId {
        self.id
    }

    /// Returns the owning workspace id.
    #[must_use]
    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the application name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Returns decommission bookkeeping, if any.
    #[must_use]
    pub fn decommission(&self) -> Option<&DecommissionRecord> {
        self.decommission.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the deletion timestamp.
    #[must_use]
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns the optimistic concurrency revision this value was read at.
    #[must_use]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns a copy of this application carrying a different revision.
    #[must_use]
    pub fn with_revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Starts decommissioning with the given grace period.
    pub fn begin_decommissioning(
        &mut self,
        started_at: DateTime<Utc>,
        grace_period: TimeDelta,
        reason: Option<String>,
    ) -> AppResult<()> {
        match self.status {
            ApplicationStatus::Deleted => {
                return Err(AppError::Conflict(format!(
                    "application '{}' is already deleted",
                    self.id
                )));
            }
            ApplicationStatus::Decommissioning => {
                return Err(AppError::Conflict(format!(
                    "application '{}' is already being decommissioned",
                    self.id
                )));
            }
            ApplicationStatus::Active => {}
        }

        self.status = self
            .status
            .transition_to(ApplicationStatus::Decommissioning)?;
        self.decommission = Some(DecommissionRecord {
            started_at,
            grace_period_ends_at: started_at + grace_period,
            reason: normalize_reason(reason),
            workflow_id: None,
        });

        Ok(())
    }

    /// Records the cleanup workflow scheduled for this decommission.
    pub fn record_decommission_workflow(
        &mut self,
        workflow_id: impl Into<String>,
    ) -> AppResult<()> {
        let record = self.decommission.as_mut().ok_or_else(|| {
            AppError::Conflict(format!(
                "application '{}' has no decommission in progress",
                self.id
            ))
        })?;
        record.workflow_id = Some(workflow_id.into());
        Ok(())
    }

    /// Cancels decommissioning while the grace period is still running.
    pub fn cancel_decommissioning(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        let grace_period_ends_at = match (&self.status, &self.decommission) {
            (ApplicationStatus::Decommissioning, Some(record)) => record.grace_period_ends_at,
            _ => {
                return Err(AppError::Conflict(format!(
                    "application '{}' is not being decommissioned",
                    self.id
                )));
            }
        };

        if now >= grace_period_ends_at {
            return Err(AppError::Conflict(format!(
                "grace period for application '{}' ended at {}; decommissioning can no longer be cancelled",
                self.id,
                grace_period_ends_at.to_rfc3339()
            )));
        }

        self.status = self.status.transition_to(ApplicationStatus::Active)?;
        self.decommission = None;
        Ok(())
    }

    /// Marks the application deleted, keeping or creating decommission bookkeeping.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>, reason: Option<String>) -> AppResult<()> {
        if self.status == ApplicationStatus::Deleted {
            return Err(AppError::Conflict(format!(
                "application '{}' is already deleted",
                self.id
            )));
        }

        self.status = self.status.transition_to(ApplicationStatus::Deleted)?;
        let reason = normalize_reason(reason);
        match self.decommission.as_mut() {
            Some(record) => {
                if reason.is_some() {
                    record.reason = reason;
                }
            }
            None => {
                self.decommission = Some(DecommissionRecord {
                    started_at: now,
                    grace_period_ends_at: now,
                    reason,
                    workflow_id: None,
                });
            }
        }
        self.deleted_at = Some(now);
        Ok(())
    }
}

/// Returns the default grace period for the environment mix of an application's clusters.
///
/// Any production cluster yields 30 days, otherwise any staging cluster yields
/// 14 days, otherwise 7 days.
#[must_use]
pub fn grace_period_for_environments(
    environments: impl IntoIterator<Item = ClusterEnvironment>,
) -> TimeDelta {
    let strictest = environments
        .into_iter()
        .map(|environment| match environment {
            ClusterEnvironment::Production => PRODUCTION_GRACE_PERIOD_DAYS,
            ClusterEnvironment::Staging => STAGING_GRACE_PERIOD_DAYS,
            ClusterEnvironment::Development => DEVELOPMENT_GRACE_PERIOD_DAYS,
        })
        .max()
        .unwrap_or(DEVELOPMENT_GRACE_PERIOD_DAYS);

    TimeDelta::days(strictest)
}

/// Validates an administrator grace period override.
pub fn grace_period_override(days: u32) -> AppResult<TimeDelta> {
    if !(MIN_GRACE_PERIOD_DAYS..=MAX_GRACE_PERIOD_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "grace period must be between {MIN_GRACE_PERIOD_DAYS} and {MAX_GRACE_PERIOD_DAYS} days, got {days}"
        )));
    }

    Ok(TimeDelta::days(i64::from(days)))
}

fn normalize_reason(reason: Option<String>) -> Option<String> {
    reason.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}
