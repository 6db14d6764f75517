use async_trait::async_trait;
use orbit_application::{NotificationService, WorkspaceNotification};
use orbit_core::{AppError, AppResult};
use serde::Serialize;
use url::Url;

/// Delivers workspace notifications as JSON posts to a webhook.
pub struct WebhookNotificationService {
    http_client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Serialize)]
struct NotificationPayload<'a> {
    event: &'static str,
    workspace_id: String,
    resource_id: &'a str,
    title: &'a str,
    body: &'a str,
}

impl<'a> From<&'a WorkspaceNotification> for NotificationPayload<'a> {
    fn from(notification: &'a WorkspaceNotification) -> Self {
        Self {
            event: notification.kind.as_str(),
            workspace_id: notification.workspace_id.to_string(),
            resource_id: notification.resource_id.as_str(),
            title: notification.title.as_str(),
            body: notification.body.as_str(),
        }
    }
}

impl WebhookNotificationService {
    /// Creates a webhook notifier posting to `endpoint`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }
}

#[async_trait]
impl NotificationService for WebhookNotificationService {
    async fn notify_workspace(&self, notification: WorkspaceNotification) -> AppResult<()> {
        let payload = NotificationPayload::from(&notification);
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                AppError::Unavailable(format!("notification webhook unreachable: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Unavailable(format!(
                "notification webhook answered with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use orbit_application::{NotificationKind, WorkspaceNotification};
    use orbit_core::WorkspaceId;
    use serde_json::json;

    use super::NotificationPayload;

    #[test]
    fn payload_carries_event_name_and_workspace() {
        let workspace_id = WorkspaceId::new();
        let notification = WorkspaceNotification {
            workspace_id,
            kind: NotificationKind::ShareRevoked,
            resource_id: "share-7".to_owned(),
            title: "Access revoked".to_owned(),
            body: "Access to orders was revoked.".to_owned(),
        };

        let payload = serde_json::to_value(NotificationPayload::from(&notification))
            .unwrap_or_else(|error| panic!("payload serializes: {error}"));

        assert_eq!(
            payload,
            json!({
                "event": "topic_share.revoked",
                "workspace_id": workspace_id.to_string(),
                "resource_id": "share-7",
                "title": "Access revoked",
                "body": "Access to orders was revoked.",
            })
        );
    }
}
