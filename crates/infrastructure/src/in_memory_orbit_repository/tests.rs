use chrono::{TimeDelta, TimeZone, Utc};
use orbit_application::{
    ApplicationRepository, AuditEvent, AuditRepository, SharePolicyRepository, TopicShareRepository,
    VirtualClusterRepository,
};
use orbit_core::{AppError, WorkspaceId};
use orbit_domain::{
    AccessLevel, Application, ApplicationId, AuditAction, ClusterEnvironment, SharePolicy,
    SharePolicyId, TopicId, TopicShare, TopicShareId, TopicShareRequest, VirtualCluster,
    VirtualClusterId, VirtualClusterStatus,
};

use super::InMemoryOrbitRepository;

fn share(topic_id: TopicId, target: WorkspaceId, expires_in_hours: i64) -> TopicShare {
    let requested_at = Utc
        .with_ymd_and_hms(2026, 5, 4, 9, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("valid timestamp"));

    TopicShare::request(
        TopicShareId::new(),
        TopicShareRequest {
            topic_id,
            owner_workspace_id: WorkspaceId::new(),
            target_workspace_id: target,
            access_level: AccessLevel::Read,
            reason: None,
            requested_by: "rita".to_owned(),
            requested_at,
            expires_at: Some(requested_at + TimeDelta::hours(expires_in_hours)),
        },
    )
    .unwrap_or_else(|error| panic!("valid share: {error}"))
}

#[tokio::test]
async fn stale_application_revision_is_rejected() {
    let repository = InMemoryOrbitRepository::new();
    let application = Application::new(
        ApplicationId::new(),
        WorkspaceId::new(),
        "ledger",
        Utc::now(),
    )
    .unwrap_or_else(|error| panic!("valid application: {error}"));
    assert!(
        repository
            .create_application(application.clone())
            .await
            .is_ok()
    );

    let updated = repository
        .update_application(&application)
        .await
        .unwrap_or_else(|error| panic!("first write succeeds: {error}"));
    assert_eq!(updated.revision(), application.revision() + 1);

    let stale = repository.update_application(&application).await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn only_one_open_share_per_topic_and_workspace() {
    let repository = InMemoryOrbitRepository::new();
    let topic_id = TopicId::new();
    let target = WorkspaceId::new();

    assert!(
        repository
            .create_share(share(topic_id, target, 1))
            .await
            .is_ok()
    );
    let duplicate = repository.create_share(share(topic_id, target, 2)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let other_workspace = repository
        .create_share(share(topic_id, WorkspaceId::new(), 2))
        .await;
    assert!(other_workspace.is_ok());
}

#[tokio::test]
async fn due_shares_are_listed_by_expiry() {
    let repository = InMemoryOrbitRepository::new();
    let topic_id = TopicId::new();

    let mut later = share(topic_id, WorkspaceId::new(), 5);
    let mut sooner = share(topic_id, WorkspaceId::new(), 2);
    let pending = share(topic_id, WorkspaceId::new(), 1);
    for approved in [&mut later, &mut sooner] {
        let approved_at = approved.requested_at() + TimeDelta::minutes(1);
        assert!(approved.approve("olivia", approved_at).is_ok());
    }
    for stored in [later.clone(), sooner.clone(), pending] {
        assert!(repository.create_share(stored).await.is_ok());
    }

    let now = later.requested_at() + TimeDelta::hours(6);
    let due = repository
        .list_shares_due_for_expiry(now)
        .await
        .unwrap_or_else(|error| panic!("listing works: {error}"));

    let ids: Vec<TopicShareId> = due.iter().map(TopicShare::id).collect();
    assert_eq!(ids, vec![sooner.id(), later.id()]);
}

#[tokio::test]
async fn policies_are_scoped_to_owner_or_platform() {
    let repository = InMemoryOrbitRepository::new();
    let owner = WorkspaceId::new();
    let policy = |workspace_id: Option<WorkspaceId>, enabled: bool| SharePolicy {
        id: SharePolicyId::new(),
        workspace_id,
        enabled,
        auto_approve: true,
        allowed_access_levels: Vec::new(),
        auto_approve_workspaces: Vec::new(),
        priority: 0,
    };

    let platform = policy(None, true);
    let scoped = policy(Some(owner), true);
    repository.insert_share_policy(platform.clone()).await;
    repository.insert_share_policy(scoped.clone()).await;
    repository
        .insert_share_policy(policy(Some(owner), false))
        .await;
    repository
        .insert_share_policy(policy(Some(WorkspaceId::new()), true))
        .await;

    let policies = repository
        .list_enabled_policies(owner)
        .await
        .unwrap_or_else(|error| panic!("listing works: {error}"));
    assert_eq!(policies, vec![platform, scoped]);
}

#[tokio::test]
async fn updating_unknown_cluster_is_not_found() {
    let repository = InMemoryOrbitRepository::new();
    let cluster = VirtualCluster::new(
        VirtualClusterId::new(),
        ApplicationId::new(),
        WorkspaceId::new(),
        "ledger-production",
        ClusterEnvironment::Production,
        VirtualClusterStatus::Active,
        "kafka-1.internal:9092",
        "ledger.",
    )
    .unwrap_or_else(|error| panic!("valid cluster: {error}"));

    let result = repository.update_virtual_cluster(&cluster).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    repository.insert_virtual_cluster(cluster.clone()).await;
    assert!(repository.update_virtual_cluster(&cluster).await.is_ok());
}

#[tokio::test]
async fn audit_events_are_kept_in_order() {
    let repository = InMemoryOrbitRepository::new();
    let workspace_id = WorkspaceId::new();
    for action in [
        AuditAction::ApplicationCreated,
        AuditAction::ApplicationDecommissioningStarted,
    ] {
        let appended = repository
            .append_event(AuditEvent {
                workspace_id,
                subject: "ada".to_owned(),
                action,
                resource_type: "application".to_owned(),
                resource_id: "app-1".to_owned(),
                detail: None,
                occurred_at: Utc::now(),
            })
            .await;
        assert!(appended.is_ok());
    }

    let actions: Vec<AuditAction> = repository
        .audit_events()
        .await
        .into_iter()
        .map(|event| event.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::ApplicationCreated,
            AuditAction::ApplicationDecommissioningStarted
        ]
    );
}
