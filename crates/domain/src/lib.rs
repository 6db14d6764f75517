//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod application;
mod application_lifecycle;
mod ids;
mod lifecycle;
mod quota;
mod security;
mod service_account;
mod share_policy;
mod topic;
mod topic_share;
mod virtual_cluster;
mod workspace;

pub use application::{
    Application, ApplicationParts, ApplicationStatus, DecommissionRecord, MAX_GRACE_PERIOD_DAYS,
    MIN_GRACE_PERIOD_DAYS, grace_period_for_environments, grace_period_override,
};
pub use application_lifecycle::{ApplicationLifecycle, LifecyclePhase};
pub use ids::{
    ApplicationId, ServiceAccountId, SharePolicyId, TopicId, TopicShareId, VirtualClusterId,
};
pub use lifecycle::LifecycleStatus;
pub use quota::{ApplicationQuota, DEFAULT_APPLICATION_QUOTA, QuotaInfo};
pub use security::{AccessAction, AccessResource, AuditAction};
pub use service_account::{ServiceAccount, ServiceAccountStatus};
pub use share_policy::SharePolicy;
pub use topic::{Topic, TopicStatus, TopicVisibility};
pub use topic_share::{
    AccessLevel, ShareDecision, TopicShare, TopicShareParts, TopicShareRequest, TopicShareStatus,
};
pub use virtual_cluster::{ClusterEnvironment, VirtualCluster, VirtualClusterStatus};
pub use workspace::{WorkspaceMembership, WorkspaceRole};
