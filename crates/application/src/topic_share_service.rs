use std::sync::Arc;

use chrono::{DateTime, Utc};
use orbit_core::{AppError, AppResult, UserIdentity, WorkspaceId};
use orbit_domain::{
    AccessAction, AccessLevel, AccessResource, ApplicationStatus, AuditAction, LifecycleStatus,
    ServiceAccount, ServiceAccountStatus, Topic, TopicId, TopicShare, TopicShareId,
    TopicShareRequest, TopicShareStatus, TopicStatus, VirtualCluster,
};
use tracing::{error, info, warn};

use crate::{
    AccessProvisioningArguments, AuditEvent, AuditRepository, AuthorizationService,
    CatalogRepositories, Clock, NotificationKind, NotificationService, SharePolicyEvaluator,
    SystemClock, TopicShareRepository, WorkflowEngine, WorkspaceNotification,
};

mod connection;
mod expiry;
mod provisioning;
mod request;
mod review;

pub use connection::{ConnectionDetails, ConnectionMode, KafkaConnectionConfig};

/// Subject recorded on decisions taken by the platform itself.
pub const SYSTEM_SUBJECT: &str = "system";

/// Input payload for requesting access to another workspace's topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTopicShareInput {
    /// Requested topic.
    pub topic_id: TopicId,
    /// Workspace that will receive access.
    pub target_workspace_id: WorkspaceId,
    /// Requested access level.
    pub access_level: AccessLevel,
    /// Optional business justification.
    pub reason: Option<String>,
    /// Optional end of access.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a share request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequestOutcome {
    /// Stored share.
    pub share: TopicShare,
    /// Whether a policy approved the request and provisioning started.
    pub auto_approved: bool,
}

/// Creates, reviews, revokes and expires cross-workspace topic shares.
#[derive(Clone)]
pub struct TopicShareService {
    authorization_service: AuthorizationService,
    catalog: CatalogRepositories,
    shares: Arc<dyn TopicShareRepository>,
    policy_evaluator: SharePolicyEvaluator,
    workflow_engine: Arc<dyn WorkflowEngine>,
    notifications: Arc<dyn NotificationService>,
    audit_repository: Arc<dyn AuditRepository>,
    clock: Arc<dyn Clock>,
    connection_config: KafkaConnectionConfig,
}

impl TopicShareService {
    /// Creates a new share service using the wall clock and direct
    /// connection details.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        catalog: CatalogRepositories,
        shares: Arc<dyn TopicShareRepository>,
        policy_evaluator: SharePolicyEvaluator,
        workflow_engine: Arc<dyn WorkflowEngine>,
        notifications: Arc<dyn NotificationService>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            catalog,
            shares,
            policy_evaluator,
            workflow_engine,
            notifications,
            audit_repository,
            clock: Arc::new(SystemClock),
            connection_config: KafkaConnectionConfig::direct(),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces how connection details are resolved.
    #[must_use]
    pub fn with_connection_config(mut self, connection_config: KafkaConnectionConfig) -> Self {
        self.connection_config = connection_config;
        self
    }

    async fn load_share(&self, share_id: TopicShareId) -> AppResult<TopicShare> {
        self.shares
            .find_share(share_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("topic share '{share_id}' does not exist")))
    }

    async fn load_topic(&self, topic_id: TopicId) -> AppResult<Topic> {
        self.catalog
            .topics
            .find_topic(topic_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("topic '{topic_id}' does not exist")))
    }

    fn share_resource(share: &TopicShare) -> AccessResource {
        AccessResource::TopicShare {
            share_id: share.id(),
            owner_workspace_id: share.owner_workspace_id(),
            target_workspace_id: share.target_workspace_id(),
        }
    }

    async fn audit_share(
        &self,
        subject: &str,
        share: &TopicShare,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                workspace_id: share.owner_workspace_id(),
                subject: subject.to_owned(),
                action,
                resource_type: "topic_share".to_owned(),
                resource_id: share.id().to_string(),
                detail: Some(detail),
                occurred_at: self.clock.now(),
            })
            .await
    }

    /// Delivers a notification; failures are logged and never surface.
    async fn notify(&self, notification: WorkspaceNotification) {
        let kind = notification.kind.as_str();
        let workspace_id = notification.workspace_id;
        if let Err(error) = self.notifications.notify_workspace(notification).await {
            warn!(
                %error,
                notification = kind,
                workspace_id = %workspace_id,
                "workspace notification failed"
            );
        }
    }
}

#[cfg(test)]
mod tests;
