use orbit_domain::ApplicationStatus;

use super::*;

impl ApplicationLifecycleService {
    /// Deletes an application immediately, bypassing the grace period.
    ///
    /// The cleanup workflow is started before any record changes; if it cannot
    /// start nothing is modified.
    pub async fn force_delete_application(
        &self,
        actor: &UserIdentity,
        application_id: ApplicationId,
        reason: Option<String>,
    ) -> AppResult<ApplicationLifecycle> {
        let mut application = self.load_application(application_id).await?;
        self.authorize(
            actor,
            &application,
            AccessAction::ManageApplicationLifecycle,
        )
        .await?;
        if application.status() == ApplicationStatus::Deleted {
            return Err(AppError::Conflict(format!(
                "application '{application_id}' is already deleted"
            )));
        }

        self.delete_cleanup_schedule(application_id).await;

        let now = self.clock.now();
        let request = ApplicationDecommissioningArguments::new(
            application_id,
            application.workspace_id(),
            now,
            true,
            reason.clone(),
        )
        .into_request(format!(
            "force-delete-{application_id}-{}",
            now.timestamp_millis()
        ))?;
        let execution = self.workflow_engine.start_workflow(request).await?;

        let clusters = self.list_clusters(application_id).await?;
        for cluster in &clusters {
            for mut topic in self
                .catalog
                .topics
                .list_virtual_cluster_topics(cluster.id())
                .await?
            {
                if topic.status() == TopicStatus::Deleted {
                    continue;
                }
                topic.mark_deleted()?;
                self.catalog.topics.update_topic(&topic).await?;
            }
        }

        for mut cluster in clusters {
            if cluster.status() == VirtualClusterStatus::Deleted {
                continue;
            }
            cluster.transition_to(VirtualClusterStatus::Deleted)?;
            self.catalog
                .virtual_clusters
                .update_virtual_cluster(&cluster)
                .await?;
        }

        application.mark_deleted(now, reason)?;
        application.record_decommission_workflow(execution.workflow_id.clone())?;
        let stored = self
            .catalog
            .applications
            .update_application(&application)
            .await?;

        self.audit_application(
            actor,
            &stored,
            AuditAction::ApplicationForceDeleted,
            format!("force deleted; workflow '{}'", execution.workflow_id),
        )
        .await?;

        info!(
            application_id = %application_id,
            workflow_id = %execution.workflow_id,
            "application force deleted"
        );

        Ok(stored.lifecycle_at(now))
    }
}
