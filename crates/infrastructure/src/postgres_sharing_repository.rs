use async_trait::async_trait;
use chrono::{DateTime, Utc};

use orbit_application::{SharePolicyRepository, TopicShareRepository};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{
    AccessLevel, LifecycleStatus, ShareDecision, SharePolicy, SharePolicyId, TopicId, TopicShare,
    TopicShareId, TopicShareParts, TopicShareRequest, TopicShareStatus,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;


const TOPIC_SHARE_COLUMNS: &str = r#"
    id,
    topic_id,
    owner_workspace_id,
    target_workspace_id,
    access_level,
    status,
    reason,
    requested_by,
    requested_at,
    expires_at,
    approved_by,
    approved_at,
    rejected_by,
    rejected_at,
    rejection_reason,
    revoked_by,
    revoked_at,
    expired_at,
    provisioning_workflow_id
"#;

/// PostgreSQL-backed repository for topic shares and share policies.
#[derive(Clone)]
pub struct PostgresSharingRepository {
    pool: PgPool,
}

impl PostgresSharingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TopicShareRow {
    id: Uuid,
    topic_id: Uuid,
    owner_workspace_id: Uuid,
    target_workspace_id: Uuid,
    access_level: String,
    status: String,
    reason: Option<String>,
    requested_by: String,
    requested_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    approved_by: Option<String>,
    approved_at: Option<DateTime<Utc>>,
    rejected_by: Option<String>,
    rejected_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
    revoked_by: Option<String>,
    revoked_at: Option<DateTime<Utc>>,
    expired_at: Option<DateTime<Utc>>,
    provisioning_workflow_id: Option<String>,
}

fn decision(
    decided_by: Option<String>,
    decided_at: Option<DateTime<Utc>>,
) -> Option<ShareDecision> {
    match (decided_by, decided_at) {
        (Some(decided_by), Some(decided_at)) => Some(ShareDecision {
            decided_by,
            decided_at,
        }),
        _ => None,
    }
}

fn decided_by(decision: &ShareDecision) -> &str {
    decision.decided_by.as_str()
}

impl TryFrom<TopicShareRow> for TopicShare {
    type Error = AppError;

    fn try_from(row: TopicShareRow) -> Result<Self, Self::Error> {
        Ok(TopicShare::from_parts(TopicShareParts {
            id: TopicShareId::from_uuid(row.id),
            request: TopicShareRequest {
                topic_id: TopicId::from_uuid(row.topic_id),
                owner_workspace_id: WorkspaceId::from_uuid(row.owner_workspace_id),
                target_workspace_id: WorkspaceId::from_uuid(row.target_workspace_id),
                access_level: AccessLevel::parse(row.access_level.as_str())?,
                reason: row.reason,
                requested_by: row.requested_by,
                requested_at: row.requested_at,
                expires_at: row.expires_at,
            },
            status: TopicShareStatus::parse(row.status.as_str())?,
            approval: decision(row.approved_by, row.approved_at),
            rejection: decision(row.rejected_by, row.rejected_at),
            rejection_reason: row.rejection_reason,
            revocation: decision(row.revoked_by, row.revoked_at),
            expired_at: row.expired_at,
            provisioning_workflow_id: row.provisioning_workflow_id,
        }))
    }
}

#[derive(Debug, FromRow)]
struct SharePolicyRow {
    id: Uuid,
    workspace_id: Option<Uuid>,
    enabled: bool,
    auto_approve: bool,
    allowed_access_levels: Vec<String>,
    auto_approve_workspaces: Vec<Uuid>,
    priority: i32,
}

impl TryFrom<SharePolicyRow> for SharePolicy {
    type Error = AppError;

    fn try_from(row: SharePolicyRow) -> Result<Self, Self::Error> {
        Ok(SharePolicy {
            id: SharePolicyId::from_uuid(row.id),
            workspace_id: row.workspace_id.map(WorkspaceId::from_uuid),
            enabled: row.enabled,
            auto_approve: row.auto_approve,
            allowed_access_levels: row
                .allowed_access_levels
                .iter()
                .map(|level| AccessLevel::parse(level))
                .collect::<AppResult<_>>()?,
            auto_approve_workspaces: row
                .auto_approve_workspaces
                .into_iter()
                .map(WorkspaceId::from_uuid)
                .collect(),
            priority: row.priority,
        })
    }
}

#[async_trait]
impl TopicShareRepository for PostgresSharingRepository {
    async fn create_share(&self, share: TopicShare) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO topic_shares (
                id,
                topic_id,
                owner_workspace_id,
                target_workspace_id,
                access_level,
                status,
                reason,
                requested_by,
                requested_at,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(share.id().as_uuid())
        .bind(share.topic_id().as_uuid())
        .bind(share.owner_workspace_id().as_uuid())
        .bind(share.target_workspace_id().as_uuid())
        .bind(share.access_level().as_str())
        .bind(share.status().as_str())
        .bind(share.reason())
        .bind(share.requested_by())
        .bind(share.requested_at())
        .bind(share.expires_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "workspace '{}' already has an open share for topic '{}'",
                        share.target_workspace_id(),
                        share.topic_id()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to create topic share '{}': {error}",
                    share.id()
                )))
            }
        }
    }

    async fn find_share(&self, share_id: TopicShareId) -> AppResult<Option<TopicShare>> {
        let row = sqlx::query_as::<_, TopicShareRow>(&format!(
            "SELECT {TOPIC_SHARE_COLUMNS} FROM topic_shares WHERE id = $1"
        ))
        .bind(share_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find topic share '{share_id}': {error}"))
        })?;

        row.map(TopicShare::try_from).transpose()
    }

    async fn find_open_share(
        &self,
        topic_id: TopicId,
        target_workspace_id: WorkspaceId,
    ) -> AppResult<Option<TopicShare>> {
        let query = format!(
            r#"
            SELECT {TOPIC_SHARE_COLUMNS}
            FROM topic_shares
            WHERE topic_id = $1
              AND target_workspace_id = $2
              AND status IN ('pending', 'approved')
            LIMIT 1
            "#
        );
        let row = sqlx::query_as::<_, TopicShareRow>(&query)
            .bind(topic_id.as_uuid())
            .bind(target_workspace_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find open share of topic '{topic_id}': {error}"
                ))
            })?;

        row.map(TopicShare::try_from).transpose()
    }

    async fn update_share(&self, share: &TopicShare) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE topic_shares
            SET status = $2,
                approved_by = $3,
                approved_at = $4,
                rejected_by = $5,
                rejected_at = $6,
                rejection_reason = $7,
                revoked_by = $8,
                revoked_at = $9,
                expired_at = $10,
                provisioning_workflow_id = $11
            WHERE id = $1
            "#,
        )
        .bind(share.id().as_uuid())
        .bind(share.status().as_str())
        .bind(share.approval().map(decided_by))
        .bind(share.approval().map(|decision| decision.decided_at))
        .bind(share.rejection().map(decided_by))
        .bind(share.rejection().map(|decision| decision.decided_at))
        .bind(share.rejection_reason())
        .bind(share.revocation().map(decided_by))
        .bind(share.revocation().map(|decision| decision.decided_at))
        .bind(share.expired_at())
        .bind(share.provisioning_workflow_id())
        .execute(&self.pool)
        .await;

        match result {
            Ok(result) if result.rows_affected() == 0 => Err(AppError::NotFound(format!(
                "topic share '{}' does not exist",
                share.id()
            ))),
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "workspace '{}' already has an open share for topic '{}'",
                        share.target_workspace_id(),
                        share.topic_id()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to update topic share '{}': {error}",
                    share.id()
                )))
            }
        }
    }

    async fn list_shares_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<TopicShare>> {
        let query = format!(
            r#"
            SELECT {TOPIC_SHARE_COLUMNS}
            FROM topic_shares
            WHERE status = 'approved'
              AND expires_at IS NOT NULL
              AND expires_at <= $1
            ORDER BY expires_at, id
            "#
        );
        let rows = sqlx::query_as::<_, TopicShareRow>(&query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list topic shares due for expiry: {error}"
                ))
            })?;

        rows.into_iter().map(TopicShare::try_from).collect()
    }
}

#[async_trait]
impl SharePolicyRepository for PostgresSharingRepository {
    async fn list_enabled_policies(
        &self,
        owner_workspace_id: WorkspaceId,
    ) -> AppResult<Vec<SharePolicy>> {
        let rows = sqlx::query_as::<_, SharePolicyRow>(
            r#"
            SELECT id, workspace_id, enabled, auto_approve, allowed_access_levels,
                   auto_approve_workspaces, priority
            FROM share_policies
            WHERE enabled
              AND (workspace_id IS NULL OR workspace_id = $1)
            ORDER BY priority DESC, (workspace_id IS NULL), id
            "#,
        )
        .bind(owner_workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list share policies for workspace '{owner_workspace_id}': {error}"
            ))
        })?;

        rows.into_iter().map(SharePolicy::try_from).collect()
    }
}
