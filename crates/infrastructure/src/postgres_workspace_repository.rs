use async_trait::async_trait;
use orbit_application::{ApplicationQuotaRepository, WorkspaceMembershipRepository};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{ApplicationQuota, WorkspaceRole};
use sqlx::PgPool;


/// PostgreSQL-backed repository for workspace memberships and quota overrides.
#[derive(Clone)]
pub struct PostgresWorkspaceRepository {
    pool: PgPool,
}

impl PostgresWorkspaceRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkspaceMembershipRepository for PostgresWorkspaceRepository {
    async fn find_member_role(
        &self,
        workspace_id: WorkspaceId,
        subject: &str,
    ) -> AppResult<Option<WorkspaceRole>> {
        let role = sqlx::query_scalar::<_, String>(
            r#"
            SELECT role
            FROM workspace_memberships
            WHERE workspace_id = $1 AND subject = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to resolve membership of '{subject}' in workspace '{workspace_id}': {error}"
            ))
        })?;

        role.map(|role| WorkspaceRole::parse(role.as_str()))
            .transpose()
    }
}

#[async_trait]
impl ApplicationQuotaRepository for PostgresWorkspaceRepository {
    async fn find_quota_override(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Option<ApplicationQuota>> {
        let max_applications = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT max_applications
            FROM application_quotas
            WHERE workspace_id = $1
            "#,
        )
        .bind(workspace_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load application quota for workspace '{workspace_id}': {error}"
            ))
        })?;

        max_applications
            .map(|max_applications| {
                u32::try_from(max_applications)
                    .map(|max_applications| ApplicationQuota {
                        workspace_id,
                        max_applications,
                    })
                    .map_err(|error| {
                        AppError::Internal(format!(
                            "stored quota {max_applications} for workspace '{workspace_id}' is invalid: {error}"
                        ))
                    })
            })
            .transpose()
    }
}
