use super::*;

impl ApplicationLifecycleService {
    /// Cancels decommissioning while the grace period is running and returns
    /// read-only clusters to active.
    pub async fn cancel_decommissioning(
        &self,
        actor: &UserIdentity,
        application_id: ApplicationId,
    ) -> AppResult<ApplicationLifecycle> {
        let mut application = self.load_application(application_id).await?;
        self.authorize(
            actor,
            &application,
            AccessAction::ManageApplicationLifecycle,
        )
        .await?;

        let now = self.clock.now();
        application.cancel_decommissioning(now)?;
        let stored = self
            .catalog
            .applications
            .update_application(&application)
            .await?;

        for mut cluster in self.list_clusters(application_id).await? {
            if cluster.status() != VirtualClusterStatus::ReadOnly {
                continue;
            }
            cluster.transition_to(VirtualClusterStatus::Active)?;
            self.catalog
                .virtual_clusters
                .update_virtual_cluster(&cluster)
                .await?;
        }

        self.delete_cleanup_schedule(application_id).await;

        self.audit_application(
            actor,
            &stored,
            AuditAction::ApplicationDecommissioningCancelled,
            "decommissioning cancelled".to_owned(),
        )
        .await?;

        info!(application_id = %application_id, "application decommissioning cancelled");

        Ok(stored.lifecycle_at(now))
    }
}
