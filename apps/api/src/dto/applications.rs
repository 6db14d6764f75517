use chrono::{DateTime, SecondsFormat, Utc};
use orbit_domain::{Application, ApplicationLifecycle, LifecycleStatus, QuotaInfo};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub(super) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Incoming payload for application registration.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-application-request.ts"
)]
pub struct CreateApplicationRequest {
    pub name: String,
}

/// Incoming payload for starting decommissioning.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/decommission-application-request.ts"
)]
pub struct DecommissionApplicationRequest {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub grace_period_days: Option<u32>,
}

/// Incoming payload for force deletion.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/force-delete-application-request.ts"
)]
pub struct ForceDeleteApplicationRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// API representation of an application.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/application-response.ts"
)]
pub struct ApplicationResponse {
    pub id: String,
    pub workspace_id: String,
    pub name: String,
    pub status: String,
    pub created_at: String,
}

/// API representation of workspace quota usage.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/quota-info-response.ts"
)]
pub struct QuotaInfoResponse {
    pub used: u32,
    pub quota: u32,
    pub remaining: u32,
    pub has_override: bool,
    pub can_create: bool,
}

/// API representation of an application lifecycle projection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/application-lifecycle-response.ts"
)]
pub struct ApplicationLifecycleResponse {
    pub application_id: String,
    pub status: String,
    pub phase: String,
    pub decommissioning_started_at: Option<String>,
    pub grace_period_ends_at: Option<String>,
    pub reason: Option<String>,
    pub workflow_id: Option<String>,
    pub elapsed_seconds: i64,
    pub remaining_seconds: i64,
    pub days_remaining: i64,
    pub progress_percent: u8,
    pub can_cancel: bool,
    pub deleted_at: Option<String>,
}

impl From<Application> for ApplicationResponse {
    fn from(value: Application) -> Self {
        Self {
            id: value.id().to_string(),
            workspace_id: value.workspace_id().to_string(),
            name: value.name().as_str().to_owned(),
            status: value.status().as_str().to_owned(),
            created_at: timestamp(value.created_at()),
        }
    }
}

impl From<QuotaInfo> for QuotaInfoResponse {
    fn from(value: QuotaInfo) -> Self {
        Self {
            used: value.used,
            quota: value.quota,
            remaining: value.remaining,
            has_override: value.has_override,
            can_create: value.allows_another(),
        }
    }
}

impl From<ApplicationLifecycle> for ApplicationLifecycleResponse {
    fn from(value: ApplicationLifecycle) -> Self {
        Self {
            application_id: value.application_id.to_string(),
            status: value.status.as_str().to_owned(),
            phase: value.phase.as_str().to_owned(),
            decommissioning_started_at: value.decommissioning_started_at.map(timestamp),
            grace_period_ends_at: value.grace_period_ends_at.map(timestamp),
            reason: value.reason,
            workflow_id: value.workflow_id,
            elapsed_seconds: value.elapsed_seconds,
            remaining_seconds: value.remaining_seconds,
            days_remaining: value.days_remaining,
            progress_percent: value.progress_percent,
            can_cancel: value.can_cancel,
            deleted_at: value.deleted_at.map(timestamp),
        }
    }
}
