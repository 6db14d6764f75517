use async_trait::async_trait;
use orbit_core::{AppResult, WorkspaceId};

/// Kind of workspace notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A share request awaits owner review.
    ShareRequestPending,
    /// A share request was rejected.
    ShareRequestRejected,
    /// Granted access was revoked.
    ShareRevoked,
    /// Granted access expired.
    ShareExpired,
}

impl NotificationKind {
    /// Returns a stable event name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShareRequestPending => "topic_share.pending",
            Self::ShareRequestRejected => "topic_share.rejected",
            Self::ShareRevoked => "topic_share.revoked",
            Self::ShareExpired => "topic_share.expired",
        }
    }
}

/// Notification addressed to the admins of one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceNotification {
    /// Recipient workspace.
    pub workspace_id: WorkspaceId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Resource the notification is about.
    pub resource_id: String,
    /// Short title.
    pub title: String,
    /// Plain text body.
    pub body: String,
}

/// Port for delivering workspace notifications.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Delivers one notification.
    async fn notify_workspace(&self, notification: WorkspaceNotification) -> AppResult<()>;
}
