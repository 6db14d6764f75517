//! Hand-written fakes shared by service tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use orbit_core::{AppError, AppResult, UserIdentity, WorkspaceId};
use orbit_domain::{
    Application, ApplicationId, ApplicationQuota, ApplicationStatus, AuditAction,
    ClusterEnvironment, ServiceAccount, ServiceAccountId, ServiceAccountStatus, SharePolicy, Topic,
    TopicId, TopicShare, TopicShareId, TopicStatus, TopicVisibility, VirtualCluster,
    VirtualClusterId, VirtualClusterStatus, WorkspaceRole,
};
use tokio::sync::Mutex;

use crate::{
    ApplicationQuotaRepository, ApplicationRepository, AuditEvent, AuditRepository, Clock,
    NotificationService, ScheduleDeletion, ServiceAccountRepository, SharePolicyRepository,
    TopicRepository, TopicShareRepository, VirtualClusterRepository, WorkflowEngine,
    WorkflowExecution, WorkflowStartRequest, WorkspaceMembershipRepository, WorkspaceNotification,
};

pub fn actor(subject: &str) -> UserIdentity {
    UserIdentity::new(subject, subject, None)
}

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("valid timestamp"))
}

/// One store backing every repository port.
#[derive(Default)]
pub struct FakeStore {
    pub applications: Mutex<HashMap<ApplicationId, Application>>,
    pub clusters: Mutex<HashMap<VirtualClusterId, VirtualCluster>>,
    pub topics: Mutex<HashMap<TopicId, Topic>>,
    pub service_accounts: Mutex<Vec<ServiceAccount>>,
    pub shares: Mutex<HashMap<TopicShareId, TopicShare>>,
    pub policies: Mutex<Vec<SharePolicy>>,
    pub memberships: Mutex<HashMap<(WorkspaceId, String), WorkspaceRole>>,
    pub quotas: Mutex<HashMap<WorkspaceId, ApplicationQuota>>,
    pub failing_cluster_writes: Mutex<Vec<VirtualClusterId>>,
}

impl FakeStore {
    pub async fn add_member(&self, workspace_id: WorkspaceId, subject: &str, role: WorkspaceRole) {
        self.memberships
            .lock()
            .await
            .insert((workspace_id, subject.to_owned()), role);
    }

    pub async fn set_quota(&self, workspace_id: WorkspaceId, max_applications: u32) {
        self.quotas.lock().await.insert(
            workspace_id,
            ApplicationQuota {
                workspace_id,
                max_applications,
            },
        );
    }

    pub async fn seed_application(&self, workspace_id: WorkspaceId, name: &str) -> Application {
        let application = Application::new(ApplicationId::new(), workspace_id, name, at(1, 8))
            .unwrap_or_else(|error| panic!("valid application: {error}"));
        self.applications
            .lock()
            .await
            .insert(application.id(), application.clone());
        application
    }

    pub async fn seed_cluster(
        &self,
        application: &Application,
        environment: ClusterEnvironment,
        status: VirtualClusterStatus,
    ) -> VirtualCluster {
        let cluster = VirtualCluster::new(
            VirtualClusterId::new(),
            application.id(),
            application.workspace_id(),
            format!("{}-{}", application.name().as_str(), environment.as_str()),
            environment,
            status,
            "kafka-1.internal:9092",
            format!("{}.", application.name().as_str()),
        )
        .unwrap_or_else(|error| panic!("valid cluster: {error}"));
        self.clusters
            .lock()
            .await
            .insert(cluster.id(), cluster.clone());
        cluster
    }

    pub async fn seed_topic(
        &self,
        cluster: &VirtualCluster,
        name: &str,
        visibility: TopicVisibility,
    ) -> Topic {
        let topic = Topic::new(
            TopicId::new(),
            cluster.workspace_id(),
            cluster.id(),
            name,
            visibility,
            TopicStatus::Active,
        )
        .unwrap_or_else(|error| panic!("valid topic: {error}"));
        self.topics.lock().await.insert(topic.id(), topic.clone());
        topic
    }

    pub async fn seed_service_account(
        &self,
        application: &Application,
        username: &str,
        status: ServiceAccountStatus,
    ) {
        self.service_accounts.lock().await.push(ServiceAccount {
            id: ServiceAccountId::new(),
            application_id: application.id(),
            workspace_id: application.workspace_id(),
            username: username.to_owned(),
            status,
        });
    }

    pub async fn application(&self, application_id: ApplicationId) -> Application {
        self.applications
            .lock()
            .await
            .get(&application_id)
            .cloned()
            .unwrap_or_else(|| panic!("application {application_id} should exist"))
    }

    pub async fn cluster(&self, cluster_id: VirtualClusterId) -> VirtualCluster {
        self.clusters
            .lock()
            .await
            .get(&cluster_id)
            .cloned()
            .unwrap_or_else(|| panic!("cluster {cluster_id} should exist"))
    }

    pub async fn topic(&self, topic_id: TopicId) -> Topic {
        self.topics
            .lock()
            .await
            .get(&topic_id)
            .cloned()
            .unwrap_or_else(|| panic!("topic {topic_id} should exist"))
    }

    pub async fn share(&self, share_id: TopicShareId) -> TopicShare {
        self.shares
            .lock()
            .await
            .get(&share_id)
            .cloned()
            .unwrap_or_else(|| panic!("share {share_id} should exist"))
    }
}

#[async_trait]
impl ApplicationRepository for FakeStore {
    async fn create_application(&self, application: Application) -> AppResult<()> {
        self.applications
            .lock()
            .await
            .insert(application.id(), application);
        Ok(())
    }

    async fn find_application(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Option<Application>> {
        Ok(self.applications.lock().await.get(&application_id).cloned())
    }

    async fn list_workspace_applications(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<Application>> {
        Ok(self
            .applications
            .lock()
            .await
            .values()
            .filter(|application| application.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }

    async fn count_applications_with_status(
        &self,
        workspace_id: WorkspaceId,
        status: ApplicationStatus,
    ) -> AppResult<u32> {
        let count = self
            .applications
            .lock()
            .await
            .values()
            .filter(|application| {
                application.workspace_id() == workspace_id && application.status() == status
            })
            .count();
        u32::try_from(count).map_err(|error| AppError::Internal(error.to_string()))
    }

    async fn update_application(&self, application: &Application) -> AppResult<Application> {
        let mut applications = self.applications.lock().await;
        let stored = applications
            .get(&application.id())
            .ok_or_else(|| AppError::NotFound(format!("application '{}'", application.id())))?;
        if stored.revision() != application.revision() {
            return Err(AppError::Conflict(format!(
                "application '{}' was modified concurrently",
                application.id()
            )));
        }

        let updated = application
            .clone()
            .with_revision(application.revision() + 1);
        applications.insert(updated.id(), updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl VirtualClusterRepository for FakeStore {
    async fn find_virtual_cluster(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Option<VirtualCluster>> {
        Ok(self.clusters.lock().await.get(&virtual_cluster_id).cloned())
    }

    async fn list_application_virtual_clusters(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<VirtualCluster>> {
        let mut clusters: Vec<VirtualCluster> = self
            .clusters
            .lock()
            .await
            .values()
            .filter(|cluster| cluster.application_id() == application_id)
            .cloned()
            .collect();
        clusters.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(clusters)
    }

    async fn update_virtual_cluster(&self, virtual_cluster: &VirtualCluster) -> AppResult<()> {
        if self
            .failing_cluster_writes
            .lock()
            .await
            .contains(&virtual_cluster.id())
        {
            return Err(AppError::Internal(format!(
                "write to virtual cluster '{}' failed",
                virtual_cluster.id()
            )));
        }

        self.clusters
            .lock()
            .await
            .insert(virtual_cluster.id(), virtual_cluster.clone());
        Ok(())
    }
}

#[async_trait]
impl TopicRepository for FakeStore {
    async fn find_topic(&self, topic_id: TopicId) -> AppResult<Option<Topic>> {
        Ok(self.topics.lock().await.get(&topic_id).cloned())
    }

    async fn list_virtual_cluster_topics(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Vec<Topic>> {
        Ok(self
            .topics
            .lock()
            .await
            .values()
            .filter(|topic| topic.virtual_cluster_id() == virtual_cluster_id)
            .cloned()
            .collect())
    }

    async fn update_topic(&self, topic: &Topic) -> AppResult<()> {
        self.topics.lock().await.insert(topic.id(), topic.clone());
        Ok(())
    }
}

#[async_trait]
impl ServiceAccountRepository for FakeStore {
    async fn list_application_service_accounts(
        &self,
        application_ids: &[ApplicationId],
    ) -> AppResult<Vec<ServiceAccount>> {
        Ok(self
            .service_accounts
            .lock()
            .await
            .iter()
            .filter(|account| application_ids.contains(&account.application_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TopicShareRepository for FakeStore {
    async fn create_share(&self, share: TopicShare) -> AppResult<()> {
        let mut shares = self.shares.lock().await;
        let duplicate = shares.values().any(|existing| {
            existing.topic_id() == share.topic_id()
                && existing.target_workspace_id() == share.target_workspace_id()
                && existing.status().is_open()
        });
        if duplicate {
            return Err(AppError::Conflict("open share already exists".to_owned()));
        }

        shares.insert(share.id(), share);
        Ok(())
    }

    async fn find_share(&self, share_id: TopicShareId) -> AppResult<Option<TopicShare>> {
        Ok(self.shares.lock().await.get(&share_id).cloned())
    }

    async fn find_open_share(
        &self,
        topic_id: TopicId,
        target_workspace_id: WorkspaceId,
    ) -> AppResult<Option<TopicShare>> {
        Ok(self
            .shares
            .lock()
            .await
            .values()
            .find(|share| {
                share.topic_id() == topic_id
                    && share.target_workspace_id() == target_workspace_id
                    && share.status().is_open()
            })
            .cloned())
    }

    async fn update_share(&self, share: &TopicShare) -> AppResult<()> {
        self.shares.lock().await.insert(share.id(), share.clone());
        Ok(())
    }

    async fn list_shares_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<TopicShare>> {
        Ok(self
            .shares
            .lock()
            .await
            .values()
            .filter(|share| share.is_due_for_expiry(now))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SharePolicyRepository for FakeStore {
    async fn list_enabled_policies(
        &self,
        owner_workspace_id: WorkspaceId,
    ) -> AppResult<Vec<SharePolicy>> {
        Ok(self
            .policies
            .lock()
            .await
            .iter()
            .filter(|policy| {
                policy.enabled
                    && policy
                        .workspace_id
                        .is_none_or(|workspace_id| workspace_id == owner_workspace_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkspaceMembershipRepository for FakeStore {
    async fn find_member_role(
        &self,
        workspace_id: WorkspaceId,
        subject: &str,
    ) -> AppResult<Option<WorkspaceRole>> {
        Ok(self
            .memberships
            .lock()
            .await
            .get(&(workspace_id, subject.to_owned()))
            .copied())
    }
}

#[async_trait]
impl ApplicationQuotaRepository for FakeStore {
    async fn find_quota_override(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Option<ApplicationQuota>> {
        Ok(self.quotas.lock().await.get(&workspace_id).cloned())
    }
}

#[derive(Default)]
pub struct FakeAuditRepository {
    pub events: Mutex<Vec<AuditEvent>>,
    pub failing_actions: Mutex<Vec<AuditAction>>,
}

impl FakeAuditRepository {
    pub async fn actions(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .await
            .iter()
            .map(|event| event.action.as_str())
            .collect()
    }
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        if self.failing_actions.lock().await.contains(&event.action) {
            return Err(AppError::Internal(format!(
                "audit store rejected '{}'",
                event.action.as_str()
            )));
        }

        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Workflow engine double recording every call.
#[derive(Default)]
pub struct RecordingWorkflowEngine {
    pub started: Mutex<Vec<WorkflowStartRequest>>,
    pub deleted_schedules: Mutex<Vec<String>>,
    pub fail_starts: Mutex<bool>,
    pub fail_schedule_deletes: Mutex<bool>,
    pub missing_schedules: Mutex<bool>,
}

impl RecordingWorkflowEngine {
    pub async fn failing_starts(self) -> Self {
        *self.fail_starts.lock().await = true;
        self
    }

    pub async fn started_ids(&self) -> Vec<String> {
        self.started
            .lock()
            .await
            .iter()
            .map(|request| request.workflow_id.clone())
            .collect()
    }
}

#[async_trait]
impl WorkflowEngine for RecordingWorkflowEngine {
    async fn start_workflow(&self, request: WorkflowStartRequest) -> AppResult<WorkflowExecution> {
        if *self.fail_starts.lock().await {
            return Err(AppError::Unavailable(format!(
                "workflow engine rejected '{}'",
                request.workflow_id
            )));
        }

        let execution = WorkflowExecution {
            workflow_id: request.workflow_id.clone(),
            run_id: Some("run-1".to_owned()),
        };
        self.started.lock().await.push(request);
        Ok(execution)
    }

    async fn delete_schedule(&self, schedule_id: &str) -> AppResult<ScheduleDeletion> {
        if *self.fail_schedule_deletes.lock().await {
            return Err(AppError::Unavailable("schedule service offline".to_owned()));
        }

        self.deleted_schedules
            .lock()
            .await
            .push(schedule_id.to_owned());
        if *self.missing_schedules.lock().await {
            return Ok(ScheduleDeletion::NotFound);
        }
        Ok(ScheduleDeletion::Deleted)
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub sent: Mutex<Vec<WorkspaceNotification>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl NotificationService for RecordingNotifications {
    async fn notify_workspace(&self, notification: WorkspaceNotification) -> AppResult<()> {
        if *self.fail.lock().await {
            return Err(AppError::Unavailable("mail relay offline".to_owned()));
        }

        self.sent.lock().await.push(notification);
        Ok(())
    }
}

/// Clock frozen at a settable instant.
pub struct FixedClock {
    seconds: AtomicI64,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            seconds: AtomicI64::new(now.timestamp()),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.seconds.store(now.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.seconds.load(Ordering::SeqCst), 0)
            .unwrap_or_else(|| panic!("timestamp in range"))
    }
}
