use super::*;

impl PostgresCatalogRepository {
    pub(super) async fn find_topic_impl(&self, topic_id: TopicId) -> AppResult<Option<Topic>> {
        let row = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT id, workspace_id, virtual_cluster_id, name, visibility, status
            FROM topics
            WHERE id = $1
            "#,
        )
        .bind(topic_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find topic '{topic_id}': {error}"))
        })?;

        row.map(Topic::try_from).transpose()
    }

    pub(super) async fn list_virtual_cluster_topics_impl(
        &self,
        virtual_cluster_id: VirtualClusterId,
    ) -> AppResult<Vec<Topic>> {
        let rows = sqlx::query_as::<_, TopicRow>(
            r#"
            SELECT id, workspace_id, virtual_cluster_id, name, visibility, status
            FROM topics
            WHERE virtual_cluster_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(virtual_cluster_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list topics for virtual cluster '{virtual_cluster_id}': {error}"
            ))
        })?;

        rows.into_iter().map(Topic::try_from).collect()
    }

    pub(super) async fn update_topic_impl(&self, topic: &Topic) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE topics
            SET visibility = $2, status = $3
            WHERE id = $1
            "#,
        )
        .bind(topic.id().as_uuid())
        .bind(topic.visibility().as_str())
        .bind(topic.status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update topic '{}': {error}", topic.id()))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "topic '{}' does not exist",
                topic.id()
            )));
        }

        Ok(())
    }
}
