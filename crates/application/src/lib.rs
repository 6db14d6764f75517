//! Application services and ports.

#![forbid(unsafe_code)]

mod application_catalog_service;
mod application_lifecycle_service;
mod audit_ports;
mod authorization_service;
mod catalog_ports;
mod clock;
mod notification_ports;
mod quota_service;
mod share_policy_evaluator;
mod sharing_ports;
mod topic_share_service;
mod workflow_ports;
mod workspace_ports;

#[cfg(test)]
mod test_support;

pub use application_catalog_service::ApplicationCatalogService;
pub use application_lifecycle_service::{ApplicationLifecycleService, DecommissionApplicationInput};
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AccessDecision, AuthorizationService};
pub use catalog_ports::{
    ApplicationRepository, CatalogRepositories, ServiceAccountRepository, TopicRepository,
    VirtualClusterRepository,
};
pub use clock::{Clock, SystemClock};
pub use notification_ports::{NotificationKind, NotificationService, WorkspaceNotification};
pub use quota_service::QuotaService;
pub use share_policy_evaluator::SharePolicyEvaluator;
pub use sharing_ports::{SharePolicyRepository, TopicShareRepository};
pub use topic_share_service::{
    ConnectionDetails, ConnectionMode, KafkaConnectionConfig, RequestTopicShareInput,
    SYSTEM_SUBJECT, ShareRequestOutcome, TopicShareService,
};
pub use workflow_ports::{
    ACCESS_PROVISIONING_WORKFLOW, APPLICATION_DECOMMISSIONING_WORKFLOW, AccessProvisioningArguments,
    ApplicationDecommissioningArguments, ScheduleDeletion, WorkflowEngine, WorkflowExecution,
    WorkflowStartRequest, cleanup_schedule_id,
};
pub use workspace_ports::{ApplicationQuotaRepository, WorkspaceMembershipRepository};
