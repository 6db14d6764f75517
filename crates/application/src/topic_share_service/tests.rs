use std::sync::Arc;

use orbit_core::{AppError, WorkspaceId};
use orbit_domain::{
    AccessLevel, Application, AuditAction, ClusterEnvironment, ServiceAccountStatus, SharePolicy,
    SharePolicyId, Topic, TopicShareStatus, TopicVisibility, VirtualCluster, VirtualClusterStatus,
    WorkspaceRole,
};

use super::{ConnectionMode, KafkaConnectionConfig, RequestTopicShareInput, TopicShareService};
use crate::test_support::{
    FakeAuditRepository, FakeStore, FixedClock, RecordingNotifications, RecordingWorkflowEngine,
    actor, at,
};
use crate::{AuthorizationService, CatalogRepositories, NotificationKind, SharePolicyEvaluator};

struct Fixture {
    store: Arc<FakeStore>,
    engine: Arc<RecordingWorkflowEngine>,
    notifications: Arc<RecordingNotifications>,
    audit: Arc<FakeAuditRepository>,
    clock: Arc<FixedClock>,
    owner: WorkspaceId,
    requester: WorkspaceId,
    cluster: VirtualCluster,
    topic: Topic,
}

impl Fixture {
    async fn new(visibility: TopicVisibility) -> Self {
        let store = Arc::new(FakeStore::default());
        let owner = WorkspaceId::new();
        let requester = WorkspaceId::new();
        store
            .add_member(owner, "olivia", WorkspaceRole::Owner)
            .await;
        store.add_member(owner, "otto", WorkspaceRole::Member).await;
        store
            .add_member(requester, "rita", WorkspaceRole::Member)
            .await;

        let application = store.seed_application(owner, "orders").await;
        let cluster = store
            .seed_cluster(
                &application,
                ClusterEnvironment::Production,
                VirtualClusterStatus::Active,
            )
            .await;
        let topic = store.seed_topic(&cluster, "order-events", visibility).await;

        Self {
            store,
            engine: Arc::new(RecordingWorkflowEngine::default()),
            notifications: Arc::new(RecordingNotifications::default()),
            audit: Arc::new(FakeAuditRepository::default()),
            clock: Arc::new(FixedClock::at(at(10, 9))),
            owner,
            requester,
            cluster,
            topic,
        }
    }

    fn service(&self) -> TopicShareService {
        TopicShareService::new(
            AuthorizationService::new(self.store.clone()),
            CatalogRepositories {
                applications: self.store.clone(),
                virtual_clusters: self.store.clone(),
                topics: self.store.clone(),
                service_accounts: self.store.clone(),
            },
            self.store.clone(),
            SharePolicyEvaluator::new(self.store.clone()),
            self.engine.clone(),
            self.notifications.clone(),
            self.audit.clone(),
        )
        .with_clock(self.clock.clone())
    }

    fn read_request(&self) -> RequestTopicShareInput {
        RequestTopicShareInput {
            topic_id: self.topic.id(),
            target_workspace_id: self.requester,
            access_level: AccessLevel::Read,
            reason: Some("analytics".to_owned()),
            expires_at: None,
        }
    }

    async fn auto_approve_reads_for_requester(&self) {
        self.store.policies.lock().await.push(SharePolicy {
            id: SharePolicyId::new(),
            workspace_id: Some(self.owner),
            enabled: true,
            auto_approve: true,
            allowed_access_levels: vec![AccessLevel::Read],
            auto_approve_workspaces: vec![self.requester],
            priority: 10,
        });
    }

    async fn pending_share(&self) -> orbit_domain::TopicShare {
        self.service()
            .request_share(&actor("rita"), self.read_request())
            .await
            .unwrap_or_else(|error| panic!("request: {error}"))
            .share
    }
}

#[tokio::test]
async fn manual_request_is_pending_and_notifies_owner() {
    let fixture = Fixture::new(TopicVisibility::Discoverable).await;

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert!(!outcome.auto_approved);
    assert_eq!(outcome.share.status(), TopicShareStatus::Pending);
    assert_eq!(
        fixture.store.share(outcome.share.id()).await.status(),
        TopicShareStatus::Pending
    );
    let sent = fixture.notifications.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].workspace_id, fixture.owner);
    assert_eq!(sent[0].kind, NotificationKind::ShareRequestPending);
    assert!(fixture.engine.started.lock().await.is_empty());
}

#[tokio::test]
async fn auto_approved_request_starts_provisioning() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    fixture.auto_approve_reads_for_requester().await;

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert!(outcome.auto_approved);
    let stored = fixture.store.share(outcome.share.id()).await;
    assert_eq!(stored.status(), TopicShareStatus::Approved);
    let workflow_id = format!("access-provisioning-{}", stored.id());
    assert_eq!(
        stored.provisioning_workflow_id(),
        Some(workflow_id.as_str())
    );
    assert_eq!(fixture.engine.started_ids().await, vec![workflow_id]);

    let started = fixture.engine.started.lock().await;
    assert_eq!(started[0].arguments["permission"], "read");
    assert_eq!(started[0].arguments["topicName"], "order-events");
    assert!(fixture.notifications.sent.lock().await.is_empty());
    assert_eq!(
        fixture.audit.actions().await,
        vec!["topic_share.requested", "topic_share.approved"]
    );
}

#[tokio::test]
async fn write_request_is_not_auto_approved_by_read_only_policy() {
    let fixture = Fixture::new(TopicVisibility::Discoverable).await;
    fixture.auto_approve_reads_for_requester().await;
    let mut input = fixture.read_request();
    input.access_level = AccessLevel::Write;

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), input)
        .await
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert!(!outcome.auto_approved);
    assert_eq!(outcome.share.status(), TopicShareStatus::Pending);
}

#[tokio::test]
async fn auto_approval_falls_back_to_pending_when_provisioning_fails() {
    let mut fixture = Fixture::new(TopicVisibility::Discoverable).await;
    fixture.auto_approve_reads_for_requester().await;
    fixture.engine = Arc::new(RecordingWorkflowEngine::default().failing_starts().await);

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert!(!outcome.auto_approved);
    let stored = fixture.store.share(outcome.share.id()).await;
    assert_eq!(stored.status(), TopicShareStatus::Pending);
    assert!(stored.approval().is_none());
    assert_eq!(
        fixture.notifications.sent.lock().await[0].kind,
        NotificationKind::ShareRequestPending
    );
}

#[tokio::test]
async fn started_provisioning_keeps_share_approved_when_audit_fails() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    fixture.auto_approve_reads_for_requester().await;
    fixture
        .audit
        .failing_actions
        .lock()
        .await
        .push(AuditAction::TopicShareApproved);

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await
        .unwrap_or_else(|error| panic!("request: {error}"));

    assert!(outcome.auto_approved);
    let stored = fixture.store.share(outcome.share.id()).await;
    assert_eq!(stored.status(), TopicShareStatus::Approved);
    let workflow_id = format!("access-provisioning-{}", stored.id());
    assert_eq!(
        stored.provisioning_workflow_id(),
        Some(workflow_id.as_str())
    );
    assert_eq!(fixture.engine.started_ids().await, vec![workflow_id]);
    assert!(fixture.notifications.sent.lock().await.is_empty());
}

#[tokio::test]
async fn manual_approval_survives_audit_failure_after_provisioning() {
    let fixture = Fixture::new(TopicVisibility::Discoverable).await;
    let pending = fixture.pending_share().await;
    fixture
        .audit
        .failing_actions
        .lock()
        .await
        .push(AuditAction::TopicShareApproved);

    let approved = fixture
        .service()
        .approve_share(&actor("olivia"), pending.id())
        .await
        .unwrap_or_else(|error| panic!("approve: {error}"));

    assert_eq!(approved.status(), TopicShareStatus::Approved);
    let stored = fixture.store.share(pending.id()).await;
    assert_eq!(stored.status(), TopicShareStatus::Approved);
    assert!(stored.provisioning_workflow_id().is_some());
}

#[tokio::test]
async fn private_topics_do_not_accept_requests() {
    let fixture = Fixture::new(TopicVisibility::Private).await;

    let result = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(fixture.store.shares.lock().await.is_empty());
}

#[tokio::test]
async fn requester_must_belong_to_target_workspace() {
    let fixture = Fixture::new(TopicVisibility::Public).await;

    let result = fixture
        .service()
        .request_share(&actor("olivia"), fixture.read_request())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn self_share_is_rejected() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let mut input = fixture.read_request();
    input.target_workspace_id = fixture.owner;

    let result = fixture
        .service()
        .request_share(&actor("olivia"), input)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn expiry_in_the_past_is_rejected() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let mut input = fixture.read_request();
    input.expires_at = Some(at(9, 9));

    let result = fixture.service().request_share(&actor("rita"), input).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn duplicate_open_request_is_a_conflict() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    fixture.pending_share().await;

    let result = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(message)) if message.contains("pending")));
}

#[tokio::test]
async fn rejected_share_allows_a_new_request() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;
    fixture
        .service()
        .reject_share(&actor("olivia"), share.id(), None)
        .await
        .unwrap_or_else(|error| panic!("reject: {error}"));

    let again = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await;

    assert!(again.is_ok());
}

#[tokio::test]
async fn owner_approval_provisions_access() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;

    let approved = fixture
        .service()
        .approve_share(&actor("olivia"), share.id())
        .await
        .unwrap_or_else(|error| panic!("approve: {error}"));

    assert_eq!(approved.status(), TopicShareStatus::Approved);
    assert_eq!(
        approved
            .approval()
            .map(|decision| decision.decided_by.as_str()),
        Some("olivia")
    );
    assert_eq!(fixture.store.share(share.id()).await, approved);
    assert_eq!(fixture.engine.started.lock().await.len(), 1);
}

#[tokio::test]
async fn plain_members_cannot_review_shares() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;

    let result = fixture
        .service()
        .approve_share(&actor("otto"), share.id())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn approval_is_compensated_when_provisioning_fails() {
    let mut fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;
    fixture.engine = Arc::new(RecordingWorkflowEngine::default().failing_starts().await);

    let result = fixture
        .service()
        .approve_share(&actor("olivia"), share.id())
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
    assert_eq!(
        fixture.store.share(share.id()).await.status(),
        TopicShareStatus::Pending
    );
    assert!(!fixture
        .audit
        .actions()
        .await
        .contains(&"topic_share.approved"));
}

#[tokio::test]
async fn approving_twice_reports_current_status() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;
    let service = fixture.service();
    service
        .approve_share(&actor("olivia"), share.id())
        .await
        .unwrap_or_else(|error| panic!("approve: {error}"));

    let result = service.approve_share(&actor("olivia"), share.id()).await;

    assert!(matches!(
        result,
        Err(AppError::Conflict(message)) if message.contains("is approved")
    ));
}

#[tokio::test]
async fn reject_and_revoke_notify_requesting_workspace() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let service = fixture.service();
    let rejected = fixture.pending_share().await;
    service
        .reject_share(
            &actor("olivia"),
            rejected.id(),
            Some("no PII access".to_owned()),
        )
        .await
        .unwrap_or_else(|error| panic!("reject: {error}"));

    let approved = fixture.pending_share().await;
    service
        .approve_share(&actor("olivia"), approved.id())
        .await
        .unwrap_or_else(|error| panic!("approve: {error}"));
    let revoked = service
        .revoke_share(&actor("olivia"), approved.id())
        .await
        .unwrap_or_else(|error| panic!("revoke: {error}"));

    assert_eq!(revoked.status(), TopicShareStatus::Revoked);
    let sent = fixture.notifications.sent.lock().await;
    let to_requester: Vec<_> = sent
        .iter()
        .filter(|notification| notification.workspace_id == fixture.requester)
        .map(|notification| notification.kind)
        .collect();
    assert_eq!(
        to_requester,
        vec![
            NotificationKind::ShareRequestRejected,
            NotificationKind::ShareRevoked
        ]
    );
    assert_eq!(
        fixture.store.share(rejected.id()).await.rejection_reason(),
        Some("no PII access")
    );
}

#[tokio::test]
async fn revoking_a_pending_share_is_a_conflict() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;

    let result = fixture
        .service()
        .revoke_share(&actor("olivia"), share.id())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn notification_failures_do_not_fail_requests() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    *fixture.notifications.fail.lock().await = true;

    let outcome = fixture
        .service()
        .request_share(&actor("rita"), fixture.read_request())
        .await;

    assert!(outcome.is_ok());
}

#[tokio::test]
async fn due_shares_expire_exactly_once() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    fixture.auto_approve_reads_for_requester().await;
    let mut input = fixture.read_request();
    input.expires_at = Some(at(12, 9));
    let share = fixture
        .service()
        .request_share(&actor("rita"), input)
        .await
        .unwrap_or_else(|error| panic!("request: {error}"))
        .share;
    let service = fixture.service();

    let early = service
        .expire_due_shares(at(11, 9))
        .await
        .unwrap_or_else(|error| panic!("sweep: {error}"));
    let due = service
        .expire_due_shares(at(12, 9))
        .await
        .unwrap_or_else(|error| panic!("sweep: {error}"));
    let again = service
        .expire_due_shares(at(13, 9))
        .await
        .unwrap_or_else(|error| panic!("sweep: {error}"));

    assert!(early.is_empty());
    assert_eq!(due.len(), 1);
    assert!(again.is_empty());
    assert_eq!(
        fixture.store.share(share.id()).await.status(),
        TopicShareStatus::Expired
    );
    let sent = fixture.notifications.sent.lock().await;
    assert_eq!(
        sent.last().map(|notification| notification.kind),
        Some(NotificationKind::ShareExpired)
    );
}

async fn seed_consumer(fixture: &Fixture) -> Application {
    let consumer = fixture
        .store
        .seed_application(fixture.requester, "reporting")
        .await;
    fixture
        .store
        .seed_service_account(&consumer, "svc-reporting", ServiceAccountStatus::Active)
        .await;
    fixture
        .store
        .seed_service_account(&consumer, "svc-legacy", ServiceAccountStatus::Revoked)
        .await;
    consumer
}

#[tokio::test]
async fn direct_connection_uses_physical_cluster_and_prefixed_topic() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    seed_consumer(&fixture).await;
    let share = fixture.pending_share().await;
    let service = fixture.service();
    service
        .approve_share(&actor("olivia"), share.id())
        .await
        .unwrap_or_else(|error| panic!("approve: {error}"));

    let details = service
        .share_connection_details(&actor("rita"), share.id())
        .await
        .unwrap_or_else(|error| panic!("details: {error}"));

    assert_eq!(details.connection_mode, ConnectionMode::Direct);
    assert_eq!(details.bootstrap_servers, "kafka-1.internal:9092");
    assert_eq!(
        details.topic_name,
        fixture.cluster.physical_topic_name("order-events")
    );
    assert_eq!(details.access_level, Some(AccessLevel::Read));
    let usernames: Vec<_> = details
        .service_accounts
        .iter()
        .map(|account| account.username.as_str())
        .collect();
    assert_eq!(usernames, vec!["svc-reporting"]);
}

#[tokio::test]
async fn proxy_connection_uses_proxy_bootstrap_and_logical_topic() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let config = KafkaConnectionConfig::proxy("kafka-proxy.orbit:9092")
        .unwrap_or_else(|error| panic!("config: {error}"));

    let details = fixture
        .service()
        .with_connection_config(config)
        .topic_connection_details(&actor("otto"), fixture.topic.id())
        .await
        .unwrap_or_else(|error| panic!("details: {error}"));

    assert_eq!(details.connection_mode, ConnectionMode::Proxy);
    assert_eq!(details.bootstrap_servers, "kafka-proxy.orbit:9092");
    assert_eq!(details.topic_name, "order-events");
    assert_eq!(details.access_level, None);
}

#[tokio::test]
async fn pending_share_has_no_connection_details() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    let share = fixture.pending_share().await;

    let result = fixture
        .service()
        .share_connection_details(&actor("rita"), share.id())
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn lapsed_share_has_no_connection_details_before_the_sweep() {
    let fixture = Fixture::new(TopicVisibility::Public).await;
    fixture.auto_approve_reads_for_requester().await;
    seed_consumer(&fixture).await;
    let mut input = fixture.read_request();
    input.expires_at = Some(at(12, 9));
    let share = fixture
        .service()
        .request_share(&actor("rita"), input)
        .await
        .unwrap_or_else(|error| panic!("request: {error}"))
        .share;

    fixture.clock.set(at(11, 9));
    let before = fixture
        .service()
        .share_connection_details(&actor("rita"), share.id())
        .await;
    assert!(before.is_ok());

    fixture.clock.set(at(12, 9));
    let lapsed = fixture
        .service()
        .share_connection_details(&actor("rita"), share.id())
        .await;
    assert!(matches!(lapsed, Err(AppError::Conflict(_))));
    assert_eq!(
        fixture.store.share(share.id()).await.status(),
        TopicShareStatus::Approved
    );
}

#[tokio::test]
async fn topic_connection_details_are_limited_to_owner_members() {
    let fixture = Fixture::new(TopicVisibility::Public).await;

    let result = fixture
        .service()
        .topic_connection_details(&actor("rita"), fixture.topic.id())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
