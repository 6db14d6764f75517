use async_trait::async_trait;
use orbit_application::{AuditEvent, AuditRepository};
use orbit_core::{AppError, AppResult};
use sqlx::PgPool;


/// Audit trail stored in `audit_log_entries`.
///
/// Rows are insert-only. `occurred_at` is the service's decision time and
/// `recorded_at` is stamped by the database.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let AuditEvent {
            workspace_id,
            subject,
            action,
            resource_type,
            resource_id,
            detail,
            occurred_at,
        } = event;

        sqlx::query(
            r#"
            INSERT INTO audit_log_entries
                (workspace_id, subject, action, resource_type, resource_id, detail, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(subject)
        .bind(action.as_str())
        .bind(resource_type.as_str())
        .bind(resource_id.as_str())
        .bind(detail)
        .bind(occurred_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to record audit event '{}' for {resource_type} '{resource_id}': {error}",
                action.as_str()
            ))
        })?;

        Ok(())
    }
}
