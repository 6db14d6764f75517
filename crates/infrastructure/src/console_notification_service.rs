//! Console notification service for development. Logs notifications to tracing output.

use async_trait::async_trait;
use orbit_application::{NotificationService, WorkspaceNotification};
use orbit_core::AppResult;
use tracing::info;

/// Development notification service that logs notifications to the console.
#[derive(Clone, Default)]
pub struct ConsoleNotificationService;

impl ConsoleNotificationService {
    /// Creates a new console notification service.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationService for ConsoleNotificationService {
    async fn notify_workspace(&self, notification: WorkspaceNotification) -> AppResult<()> {
        info!(
            workspace_id = %notification.workspace_id,
            kind = notification.kind.as_str(),
            resource_id = %notification.resource_id,
            "--- NOTIFICATION (console) ---\n{}\n\n{}\n--- END NOTIFICATION ---",
            notification.title,
            notification.body
        );

        Ok(())
    }
}
