use chrono::{TimeDelta, Utc};
use orbit_application::{ApplicationRepository, TopicRepository, VirtualClusterRepository};
use orbit_core::{AppError, WorkspaceId};
use orbit_domain::{
    Application, ApplicationId, ApplicationStatus, ClusterEnvironment, TopicId, TopicStatus,
    TopicVisibility, VirtualClusterId, VirtualClusterStatus,
};
use sqlx::PgPool;

use super::PostgresCatalogRepository;
use crate::postgres_test_support::{ensure_workspace, test_pool};

async fn insert_cluster(pool: &PgPool, application: &Application) -> VirtualClusterId {
    let cluster_id = VirtualClusterId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO virtual_clusters (
                id, application_id, workspace_id, name, environment, status,
                bootstrap_servers, topic_prefix
            )
            VALUES ($1, $2, $3, 'primary', 'production', 'active', 'kafka:9092', 'app.')
            "#,
    )
    .bind(cluster_id.as_uuid())
    .bind(application.id().as_uuid())
    .bind(application.workspace_id().as_uuid())
    .execute(pool)
    .await;
    assert!(insert.is_ok());
    cluster_id
}

#[tokio::test]
async fn application_updates_are_fenced_by_revision() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresCatalogRepository::new(pool.clone());
    let workspace_id = WorkspaceId::new();
    ensure_workspace(&pool, workspace_id, "Fencing Workspace").await;

    let application = Application::new(ApplicationId::new(), workspace_id, "ledger", Utc::now())
        .unwrap_or_else(|error| panic!("valid application: {error}"));
    repository
        .create_application(application.clone())
        .await
        .unwrap_or_else(|error| panic!("create: {error}"));

    let mut decommissioning = application.clone();
    decommissioning
        .begin_decommissioning(Utc::now(), TimeDelta::days(7), Some("retired".to_owned()))
        .unwrap_or_else(|error| panic!("decommission: {error}"));
    let stored = repository
        .update_application(&decommissioning)
        .await
        .unwrap_or_else(|error| panic!("update: {error}"));

    assert_eq!(stored.revision(), application.revision() + 1);
    assert_eq!(stored.status(), ApplicationStatus::Decommissioning);
    assert_eq!(
        stored
            .decommission()
            .and_then(|record| record.reason.as_deref()),
        Some("retired")
    );

    let stale = repository.update_application(&decommissioning).await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let active = repository
        .count_applications_with_status(workspace_id, ApplicationStatus::Active)
        .await;
    assert_eq!(active.ok(), Some(0));
}

#[tokio::test]
async fn cluster_and_topic_status_round_trip() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresCatalogRepository::new(pool.clone());
    let workspace_id = WorkspaceId::new();
    ensure_workspace(&pool, workspace_id, "Catalog Workspace").await;
    let application = Application::new(ApplicationId::new(), workspace_id, "search", Utc::now())
        .unwrap_or_else(|error| panic!("valid application: {error}"));
    repository
        .create_application(application.clone())
        .await
        .unwrap_or_else(|error| panic!("create: {error}"));
    let cluster_id = insert_cluster(&pool, &application).await;

    let topic_id = TopicId::new();
    let insert = sqlx::query(
        r#"
            INSERT INTO topics (id, workspace_id, virtual_cluster_id, name, visibility, status)
            VALUES ($1, $2, $3, 'clicks', 'discoverable', 'active')
            "#,
    )
    .bind(topic_id.as_uuid())
    .bind(workspace_id.as_uuid())
    .bind(cluster_id.as_uuid())
    .execute(&pool)
    .await;
    assert!(insert.is_ok());

    let mut clusters = repository
        .list_application_virtual_clusters(application.id())
        .await
        .unwrap_or_else(|error| panic!("list clusters: {error}"));
    assert_eq!(clusters.len(), 1);
    let mut cluster = clusters.remove(0);
    assert_eq!(cluster.environment(), ClusterEnvironment::Production);
    assert_eq!(cluster.physical_topic_name("clicks"), "app.clicks");

    cluster
        .transition_to(VirtualClusterStatus::ReadOnly)
        .unwrap_or_else(|error| panic!("transition: {error}"));
    assert!(repository.update_virtual_cluster(&cluster).await.is_ok());
    let reloaded = repository.find_virtual_cluster(cluster_id).await;
    assert_eq!(
        reloaded.ok().flatten().map(|cluster| cluster.status()),
        Some(VirtualClusterStatus::ReadOnly)
    );

    let mut topic = repository
        .find_topic(topic_id)
        .await
        .unwrap_or_else(|error| panic!("find topic: {error}"))
        .unwrap_or_else(|| panic!("topic should exist"));
    assert_eq!(topic.visibility(), TopicVisibility::Discoverable);
    topic
        .mark_deleted()
        .unwrap_or_else(|error| panic!("delete topic: {error}"));
    assert!(repository.update_topic(&topic).await.is_ok());

    let topics = repository
        .list_virtual_cluster_topics(cluster_id)
        .await
        .unwrap_or_else(|error| panic!("list topics: {error}"));
    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].status(), TopicStatus::Deleted);
}
