use super::*;

impl PostgresCatalogRepository {
    pub(super) async fn find_virtual_cluster_impl(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Option<VirtualCluster>> {
        let row = sqlx::query_as::<_, VirtualClusterRow>(
            r#"
            SELECT id, application_id, workspace_id, name, environment, status,
                   bootstrap_servers, topic_prefix
            FROM virtual_clusters
            WHERE id = $1
            "#,
        )
        .bind(virtual_cluster_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find virtual cluster '{virtual_cluster_id}': {error}"
            ))
        })?;

        row.map(VirtualCluster::try_from).transpose()
    }

    pub(super) async fn list_application_virtual_clusters_impl(
        &self,
        application_id: ApplicationId,
    ) -> AppResult<Vec<VirtualCluster>> {
        let rows = sqlx::query_as::<_, VirtualClusterRow>(
            r#"
            SELECT id, application_id, workspace_id, name, environment, status,
                   bootstrap_servers, topic_prefix
            FROM virtual_clusters
            WHERE application_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(application_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list virtual clusters for application '{application_id}': {error}"
            ))
        })?;

        rows.into_iter().map(VirtualCluster::try_from).collect()
    }

    pub(super) async fn update_virtual_cluster_impl(
        &self,
        virtual_cluster: &VirtualCluster,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE virtual_clusters
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(virtual_cluster.id().as_uuid())
        .bind(virtual_cluster.status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update virtual cluster '{}': {error}",
                virtual_cluster.id()
            ))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "virtual cluster '{}' does not exist",
                virtual_cluster.id()
            )));
        }

        Ok(())
    }

    pub(super) async fn list_application_service_accounts_impl(
        &self,
        application_ids: &[ApplicationId],
    ) -> AppResult<Vec<ServiceAccount>> {
        let ids: Vec<Uuid> = application_ids.iter().map(ApplicationId::as_uuid).collect();
        let rows = sqlx::query_as::<_, ServiceAccountRow>(
            r#"
            SELECT id, application_id, workspace_id, username, status
            FROM service_accounts
            WHERE application_id = ANY($1)
            ORDER BY username
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list service accounts: {error}"))
        })?;

        rows.into_iter().map(ServiceAccount::try_from).collect()
    }
}
