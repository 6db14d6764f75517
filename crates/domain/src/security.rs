use orbit_core::WorkspaceId;
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, TopicId, TopicShareId, WorkspaceRole};

/// Actions evaluated by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    /// Read workspace-scoped projections such as quota or lifecycle status.
    ViewWorkspace,
    /// Register a new application.
    CreateApplication,
    /// Decommission, cancel, or force delete an application.
    ManageApplicationLifecycle,
    /// File a cross-workspace topic share request.
    RequestTopicShare,
    /// Approve, reject, or revoke a topic share.
    ReviewTopicShare,
    /// Read bootstrap endpoints and credentials for a topic.
    ViewConnectionDetails,
}

impl AccessAction {
    /// Returns a stable value used in logs and errors.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewWorkspace => "workspace.view",
            Self::CreateApplication => "application.create",
            Self::ManageApplicationLifecycle => "application.lifecycle.manage",
            Self::RequestTopicShare => "topic_share.request",
            Self::ReviewTopicShare => "topic_share.review",
            Self::ViewConnectionDetails => "topic.connection.view",
        }
    }

    /// Returns the least privileged role allowed to perform the action.
    #[must_use]
    pub fn minimum_role(&self) -> WorkspaceRole {
        match self {
            Self::ViewWorkspace
            | Self::CreateApplication
            | Self::RequestTopicShare
            | Self::ViewConnectionDetails => WorkspaceRole::Member,
            Self::ManageApplicationLifecycle | Self::ReviewTopicShare => WorkspaceRole::Admin,
        }
    }
}

/// Resources guarded by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum AccessResource {
    /// A workspace itself.
    Workspace {
        /// Workspace id.
        workspace_id: WorkspaceId,
    },
    /// An application and its workspace.
    Application {
        /// Application id.
        application_id: ApplicationId,
        /// Owning workspace.
        workspace_id: WorkspaceId,
    },
    /// A topic and its owning workspace.
    Topic {
        /// Topic id.
        topic_id: TopicId,
        /// Owning workspace.
        owner_workspace_id: WorkspaceId,
    },
    /// A topic share between two workspaces.
    TopicShare {
        /// Share id.
        share_id: TopicShareId,
        /// Workspace owning the topic.
        owner_workspace_id: WorkspaceId,
        /// Workspace receiving access.
        target_workspace_id: WorkspaceId,
    },
}

impl AccessResource {
    /// Returns the workspace whose membership governs `action` on this resource.
    #[must_use]
    pub fn governing_workspace(&self, action: AccessAction) -> WorkspaceId {
        match (self, action) {
            (Self::Workspace { workspace_id }, _)
            | (Self::Application { workspace_id, .. }, _) => *workspace_id,
            (Self::Topic {
                owner_workspace_id, ..
            }, _) => *owner_workspace_id,
            (
                Self::TopicShare {
                    target_workspace_id,
                    ..
                },
                AccessAction::ViewConnectionDetails | AccessAction::RequestTopicShare,
            ) => *target_workspace_id,
            (Self::TopicShare {
                owner_workspace_id, ..
            }, _) => *owner_workspace_id,
        }
    }

    /// Returns a short label for logs and errors.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Workspace { workspace_id } => format!("workspace '{workspace_id}'"),
            Self::Application { application_id, .. } => {
                format!("application '{application_id}'")
            }
            Self::Topic { topic_id, .. } => format!("topic '{topic_id}'"),
            Self::TopicShare { share_id, .. } => format!("topic share '{share_id}'"),
        }
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when an application is registered.
    ApplicationCreated,
    /// Emitted when decommissioning starts.
    ApplicationDecommissioningStarted,
    /// Emitted when a failed decommission is compensated.
    ApplicationDecommissioningRolledBack,
    /// Emitted when decommissioning is cancelled.
    ApplicationDecommissioningCancelled,
    /// Emitted when an application is force deleted.
    ApplicationForceDeleted,
    /// Emitted when a share request is filed.
    TopicShareRequested,
    /// Emitted when a share is approved by a reviewer or a policy.
    TopicShareApproved,
    /// Emitted when a share is rejected.
    TopicShareRejected,
    /// Emitted when a share is revoked.
    TopicShareRevoked,
    /// Emitted when a share expires.
    TopicShareExpired,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplicationCreated => "application.created",
            Self::ApplicationDecommissioningStarted => "application.decommissioning.started",
            Self::ApplicationDecommissioningRolledBack => {
                "application.decommissioning.rolled_back"
            }
            Self::ApplicationDecommissioningCancelled => "application.decommissioning.cancelled",
            Self::ApplicationForceDeleted => "application.force_deleted",
            Self::TopicShareRequested => "topic_share.requested",
            Self::TopicShareApproved => "topic_share.approved",
            Self::TopicShareRejected => "topic_share.rejected",
            Self::TopicShareRevoked => "topic_share.revoked",
            Self::TopicShareExpired => "topic_share.expired",
        }
    }
}
