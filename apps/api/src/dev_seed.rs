use chrono::Utc;
use orbit_application::ApplicationRepository;
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{
    AccessLevel, Application, ApplicationId, ApplicationQuota, ClusterEnvironment, ServiceAccount,
    ServiceAccountId, ServiceAccountStatus, SharePolicy, SharePolicyId, Topic, TopicId, TopicStatus,
    TopicVisibility, VirtualCluster, VirtualClusterId, VirtualClusterStatus, WorkspaceRole,
};
use orbit_infrastructure::InMemoryOrbitRepository;
use tracing::info;
use uuid::Uuid;

const PAYMENTS_WORKSPACE_ID: &str = "11111111-1111-1111-1111-111111111111";
const ANALYTICS_WORKSPACE_ID: &str = "22222222-2222-2222-2222-222222222222";
const PAYMENTS_ADMIN: &str = "ada@orbit.local";
const PAYMENTS_MEMBER: &str = "max@orbit.local";
const ANALYTICS_ADMIN: &str = "rita@orbit.local";

/// Populates the in-memory store with two workspaces and a shareable topic.
pub async fn run(store: &InMemoryOrbitRepository) -> AppResult<()> {
    let payments = workspace_id(PAYMENTS_WORKSPACE_ID)?;
    let analytics = workspace_id(ANALYTICS_WORKSPACE_ID)?;

    store
        .insert_membership(payments, PAYMENTS_ADMIN, WorkspaceRole::Admin)
        .await;
    store
        .insert_membership(payments, PAYMENTS_MEMBER, WorkspaceRole::Member)
        .await;
    store
        .insert_membership(analytics, ANALYTICS_ADMIN, WorkspaceRole::Admin)
        .await;
    store
        .insert_quota(ApplicationQuota {
            workspace_id: payments,
            max_applications: 10,
        })
        .await;

    let ledger = Application::new(ApplicationId::new(), payments, "ledger", Utc::now())?;
    store.create_application(ledger.clone()).await?;

    let mut first_topic = None;
    for environment in [ClusterEnvironment::Staging, ClusterEnvironment::Production] {
        let cluster = VirtualCluster::new(
            VirtualClusterId::new(),
            ledger.id(),
            payments,
            format!("ledger-{}", environment.as_str()),
            environment,
            VirtualClusterStatus::Active,
            "kafka-1.orbit.local:9092,kafka-2.orbit.local:9092",
            format!("payments.ledger.{}.", environment.as_str()),
        )?;

        for (name, visibility) in [
            ("transactions", TopicVisibility::Public),
            ("settlements", TopicVisibility::Discoverable),
            ("audit-trail", TopicVisibility::Private),
        ] {
            let topic = Topic::new(
                TopicId::new(),
                payments,
                cluster.id(),
                name,
                visibility,
                TopicStatus::Active,
            )?;
            first_topic.get_or_insert(topic.id());
            store.insert_topic(topic).await;
        }
        store.insert_virtual_cluster(cluster).await;
    }

    let reporting = Application::new(ApplicationId::new(), analytics, "reporting", Utc::now())?;
    store.create_application(reporting.clone()).await?;
    store
        .insert_service_account(ServiceAccount {
            id: ServiceAccountId::new(),
            application_id: reporting.id(),
            workspace_id: analytics,
            username: "svc-analytics-reporting".to_owned(),
            status: ServiceAccountStatus::Active,
        })
        .await;

    store
        .insert_share_policy(SharePolicy {
            id: SharePolicyId::new(),
            workspace_id: Some(payments),
            enabled: true,
            auto_approve: true,
            allowed_access_levels: vec![AccessLevel::Read],
            auto_approve_workspaces: vec![analytics],
            priority: 10,
        })
        .await;

    info!(
        payments_workspace_id = %payments,
        analytics_workspace_id = %analytics,
        ledger_application_id = %ledger.id(),
        shareable_topic_id = ?first_topic.map(|topic_id| topic_id.to_string()),
        "development seed loaded"
    );

    Ok(())
}

fn workspace_id(value: &str) -> AppResult<WorkspaceId> {
    Uuid::parse_str(value)
        .map(WorkspaceId::from_uuid)
        .map_err(|error| {
            AppError::Internal(format!("invalid seed workspace id '{value}': {error}"))
        })
}
