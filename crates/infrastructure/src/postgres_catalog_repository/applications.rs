use super::*;

const APPLICATION_COLUMNS: &str = r#"
    id,
    workspace_id,
    name,
    status,
    decommissioning_started_at,
    grace_period_ends_at,
    decommission_reason,
    decommission_workflow_id,
    created_at,
    deleted_at,
    revision
"#;

impl PostgresCatalogRepository {
    pub(super) async fn create_application_impl(&self, application: Application) -> AppResult<()> {
        let decommission = application.decommission();
        let result = sqlx::query(
            r#"
            INSERT INTO applications (
                id,
                workspace_id,
                name,
                status,
                decommissioning_started_at,
                grace_period_ends_at,
                decommission_reason,
                decommission_workflow_id,
                created_at,
                deleted_at,
                revision
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(application.id().as_uuid())
        .bind(application.workspace_id().as_uuid())
        .bind(application.name().as_str())
        .bind(application.status().as_str())
        .bind(decommission.map(|record| record.started_at))
        .bind(decommission.map(|record| record.grace_period_ends_at))
        .bind(decommission.and_then(|record| record.reason.as_deref()))
        .bind(decommission.and_then(|record| record.workflow_id.as_deref()))
        .bind(application.created_at())
        .bind(application.deleted_at())
        .bind(application.revision())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(error) => {
                if let sqlx::Error::Database(database_error) = &error
                    && database_error.code().as_deref() == Some("23505")
                {
                    return Err(AppError::Conflict(format!(
                        "application '{}' already exists",
                        application.id()
                    )));
                }

                Err(AppError::Internal(format!(
                    "failed to create application '{}' in workspace '{}': {error}",
                    application.id(),
                    application.workspace_id()
                )))
            }
        }
    }

    pub(super) async fn find_application_impl(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Option<Application>> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(application_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find application '{application_id}': {error}"
            ))
        })?;

        row.map(Application::try_from).transpose()
    }

    pub(super) async fn list_workspace_applications_impl(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE workspace_id = $1 ORDER BY name, id"
        ))
        .bind(workspace_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list applications for workspace '{workspace_id}': {error}"
            ))
        })?;

        rows.into_iter().map(Application::try_from).collect()
    }

    pub(super) async fn count_applications_with_status_impl(
        &self,
        workspace_id: WorkspaceId,
        status: ApplicationStatus,
    ) -> AppResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM applications
            WHERE workspace_id = $1 AND status = $2
            "#,
        )
        .bind(workspace_id.as_uuid())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to count applications for workspace '{workspace_id}': {error}"
            ))
        })?;

        u32::try_from(count).map_err(|error| {
            AppError::Internal(format!("application count {count} out of range: {error}"))
        })
    }

    pub(super) async fn update_application_impl(
        &self,
        application: &Application,
    ) -> AppResult<Application> {
        let decommission = application.decommission();
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE applications
            SET name = $3,
                status = $4,
                decommissioning_started_at = $5,
                grace_period_ends_at = $6,
                decommission_reason = $7,
                decommission_workflow_id = $8,
                deleted_at = $9,
                revision = revision + 1
            WHERE id = $1 AND revision = $2
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(application.id().as_uuid())
        .bind(application.revision())
        .bind(application.name().as_str())
        .bind(application.status().as_str())
        .bind(decommission.map(|record| record.started_at))
        .bind(decommission.map(|record| record.grace_period_ends_at))
        .bind(decommission.and_then(|record| record.reason.as_deref()))
        .bind(decommission.and_then(|record| record.workflow_id.as_deref()))
        .bind(application.deleted_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update application '{}': {error}",
                application.id()
            ))
        })?;

        match row {
            Some(row) => Application::try_from(row),
            None => match self.find_application_impl(application.id()).await? {
                Some(current) => Err(AppError::Conflict(format!(
                    "application '{}' was modified concurrently (expected revision {}, found {})",
                    application.id(),
                    application.revision(),
                    current.revision()
                ))),
                None => Err(AppError::NotFound(format!(
                    "application '{}' does not exist",
                    application.id()
                ))),
            },
        }
    }
}
