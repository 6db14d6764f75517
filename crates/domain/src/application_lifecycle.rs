use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Application, ApplicationId, ApplicationStatus};

const SECONDS_PER_DAY: i64 = 86_400;

/// Display-ready phase derived from status and grace period boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Application is live.
    Active,
    /// Grace period is running; cancellation is still possible.
    GracePeriod,
    /// Grace period elapsed; waiting for the cleanup workflow.
    AwaitingCleanup,
    /// Application has been removed.
    Deleted,
}

impl LifecyclePhase {
    /// Returns a stable transport value for the phase.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::GracePeriod => "grace_period",
            Self::AwaitingCleanup => "awaiting_cleanup",
            Self::Deleted => "deleted",
        }
    }
}

/// Read-only projection of an application's lifecycle at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationLifecycle {
    /// Application id.
    pub application_id: ApplicationId,
    /// Persisted status.
    pub status: ApplicationStatus,
    /// Derived phase.
    pub phase: LifecyclePhase,
    /// When decommissioning started.
    pub decommissioning_started_at: Option<DateTime<Utc>>,
    /// When the grace period ends.
    pub grace_period_ends_at: Option<DateTime<Utc>>,
    /// Decommission reason.
    pub reason: Option<String>,
    /// Cleanup workflow id.
    pub workflow_id: Option<String>,
    /// Seconds since decommissioning started.
    pub elapsed_seconds: i64,
    /// Seconds until the grace period ends, never negative.
    pub remaining_seconds: i64,
    /// Whole days remaining, rounded up.
    pub days_remaining: i64,
    /// Grace period progress in percent.
    pub progress_percent: u8,
    /// Whether cancellation is currently possible.
    pub can_cancel: bool,
    /// When the application was deleted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Application {
    /// Projects the lifecycle of this application as observed at `now`.
    #[must_use]
    pub fn lifecycle_at(&self, now: DateTime<Utc>) -> ApplicationLifecycle {
        let record = self.decommission();
        let (elapsed_seconds, remaining_seconds, progress_percent) = match record {
            Some(record) => {
                let total = (record.grace_period_ends_at - record.started_at).num_seconds();
                let elapsed = (now - record.started_at).num_seconds().max(0);
                let remaining = (record.grace_period_ends_at - now).num_seconds().max(0);
                (elapsed, remaining, progress(elapsed, total))
            }
            None => (0, 0, 0),
        };

        let phase = match self.status() {
            ApplicationStatus::Active => LifecyclePhase::Active,
            ApplicationStatus::Deleted => LifecyclePhase::Deleted,
            ApplicationStatus::Decommissioning if remaining_seconds > 0 => {
                LifecyclePhase::GracePeriod
            }
            ApplicationStatus::Decommissioning => LifecyclePhase::AwaitingCleanup,
        };

        ApplicationLifecycle {
            application_id: self.id(),
            status: self.status(),
            phase,
            decommissioning_started_at: record.map(|record| record.started_at),
            grace_period_ends_at: record.map(|record| record.grace_period_ends_at),
            reason: record.and_then(|record| record.reason.clone()),
            workflow_id: record.and_then(|record| record.workflow_id.clone()),
            elapsed_seconds,
            remaining_seconds,
            days_remaining: (remaining_seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY,
            progress_percent: if phase == LifecyclePhase::Deleted {
                100
            } else {
                progress_percent
            },
            can_cancel: phase == LifecyclePhase::GracePeriod,
            deleted_at: self.deleted_at(),
        }
    }
}

fn progress(elapsed: i64, total: i64) -> u8 {
    if total <= 0 {
        return 100;
    }

    let percent = (elapsed.saturating_mul(100) / total).clamp(0, 100);
    u8::try_from(percent).unwrap_or(100)
}
