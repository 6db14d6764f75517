use chrono::{DateTime, SecondsFormat, Utc};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{ApplicationId, Topic, TopicShare};
use serde::Serialize;

use super::WorkflowStartRequest;

/// Workflow type cleaning up an application's physical resources.
pub const APPLICATION_DECOMMISSIONING_WORKFLOW: &str = "ApplicationDecommissioningWorkflow";
/// Workflow type granting Kafka ACLs for an approved share.
pub const ACCESS_PROVISIONING_WORKFLOW: &str = "AccessProvisioningWorkflow";

/// Returns the id of the cleanup schedule owned by an application.
#[must_use]
pub fn cleanup_schedule_id(application_id: ApplicationId) -> String {
    format!("cleanup-{application_id}")
}

/// Arguments of `ApplicationDecommissioningWorkflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDecommissioningArguments {
    /// Application being decommissioned.
    pub application_id: String,
    /// Owning workspace.
    pub workspace_id: String,
    /// ISO 8601 end of the grace period.
    pub grace_period_ends_at: String,
    /// Whether cleanup runs immediately.
    pub force_delete: bool,
    /// Administrator reason.
    pub reason: Option<String>,
}

impl ApplicationDecommissioningArguments {
    /// Builds arguments for an application.
    #[must_use]
    pub fn new(
        application_id: ApplicationId,
        workspace_id: WorkspaceId,
        grace_period_ends_at: DateTime<Utc>,
        force_delete: bool,
        reason: Option<String>,
    ) -> Self {
        Self {
            application_id: application_id.to_string(),
            workspace_id: workspace_id.to_string(),
            grace_period_ends_at: grace_period_ends_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            force_delete,
            reason,
        }
    }

    /// Wraps the arguments into a start request with the given workflow id.
    pub fn into_request(self, workflow_id: String) -> AppResult<WorkflowStartRequest> {
        start_request(APPLICATION_DECOMMISSIONING_WORKFLOW, workflow_id, &self)
    }
}

/// Arguments of `AccessProvisioningWorkflow`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessProvisioningArguments {
    /// Share being provisioned.
    pub share_id: String,
    /// Shared topic.
    pub topic_id: String,
    /// Logical topic name.
    pub topic_name: String,
    /// Workspace receiving access.
    pub workspace_id: String,
    /// Granted permission.
    pub permission: String,
    /// ISO 8601 end of access, if bounded.
    pub expires_at: Option<String>,
}

impl AccessProvisioningArguments {
    /// Builds arguments for an approved share.
    #[must_use]
    pub fn for_share(share: &TopicShare, topic: &Topic) -> Self {
        Self {
            share_id: share.id().to_string(),
            topic_id: topic.id().to_string(),
            topic_name: topic.name().as_str().to_owned(),
            workspace_id: share.target_workspace_id().to_string(),
            permission: share.access_level().as_str().to_owned(),
            expires_at: share
                .expires_at()
                .map(|expires_at| expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }

    /// Wraps the arguments into a start request.
    pub fn into_request(self) -> AppResult<WorkflowStartRequest> {
        let workflow_id = format!("access-provisioning-{}", self.share_id);
        start_request(ACCESS_PROVISIONING_WORKFLOW, workflow_id, &self)
    }
}

fn start_request<T: Serialize>(
    workflow_type: &str,
    workflow_id: String,
    arguments: &T,
) -> AppResult<WorkflowStartRequest> {
    let arguments = serde_json::to_value(arguments).map_err(|error| {
        AppError::Internal(format!(
            "failed to encode {workflow_type} arguments: {error}"
        ))
    })?;

    Ok(WorkflowStartRequest {
        workflow_type: workflow_type.to_owned(),
        workflow_id,
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use orbit_core::WorkspaceId;
    use orbit_domain::ApplicationId;
    use serde_json::json;

    use super::{ApplicationDecommissioningArguments, cleanup_schedule_id};

    #[test]
    fn decommissioning_arguments_use_camel_case_and_iso_timestamps() {
        let application_id = ApplicationId::new();
        let workspace_id = WorkspaceId::new();
        let ends_at = Utc
            .with_ymd_and_hms(2026, 11, 17, 9, 30, 0)
            .single()
            .unwrap_or_else(|| panic!("valid timestamp"));

        let request = ApplicationDecommissioningArguments::new(
            application_id,
            workspace_id,
            ends_at,
            false,
            Some("sunset".to_owned()),
        )
        .into_request(format!("decommission-{application_id}"))
        .unwrap_or_else(|error| panic!("encodable arguments: {error}"));

        assert_eq!(request.workflow_type, "ApplicationDecommissioningWorkflow");
        assert_eq!(
            request.arguments,
            json!({
                "applicationId": application_id.to_string(),
                "workspaceId": workspace_id.to_string(),
                "gracePeriodEndsAt": "2026-11-17T09:30:00Z",
                "forceDelete": false,
                "reason": "sunset",
            })
        );
    }

    #[test]
    fn cleanup_schedule_is_named_after_application() {
        let application_id = ApplicationId::new();
        assert_eq!(
            cleanup_schedule_id(application_id),
            format!("cleanup-{application_id}")
        );
    }
}
