use super::*;

impl ApplicationLifecycleService {
    /// Starts decommissioning: the application enters its grace period, active
    /// clusters become read-only, and the cleanup workflow is scheduled.
    ///
    /// If the workflow cannot be started every write is rolled back.
    pub async fn decommission_application(
        &self,
        actor: &UserIdentity,
        application_id: ApplicationId,
        input: DecommissionApplicationInput,
    ) -> AppResult<ApplicationLifecycle> {
        let application = self.load_application(application_id).await?;
        self.authorize(
            actor,
            &application,
            AccessAction::ManageApplicationLifecycle,
        )
        .await?;

        let clusters = self.list_clusters(application_id).await?;
        let grace_period = match input.grace_period_days {
            Some(days) => grace_period_override(days)?,
            None => grace_period_for_environments(
                clusters
                    .iter()
                    .filter(|cluster| cluster.status() != VirtualClusterStatus::Deleted)
                    .map(VirtualCluster::environment),
            ),
        };

        let now = self.clock.now();
        let mut decommissioning = application.clone();
        decommissioning.begin_decommissioning(now, grace_period, input.reason.clone())?;

        let mut log = CompensationLog::default();
        let stored = self
            .catalog
            .applications
            .update_application(&decommissioning)
            .await?;
        log.application_written(application.clone(), stored.revision());

        if let Err(error) = self.freeze_clusters(clusters, &mut log).await {
            self.roll_back(actor, &application, log, &error).await;
            return Err(error);
        }

        let grace_period_ends_at = now + grace_period;
        let request = ApplicationDecommissioningArguments::new(
            application_id,
            application.workspace_id(),
            grace_period_ends_at,
            false,
            input.reason,
        )
        .into_request(format!(
            "decommission-{application_id}-{}",
            now.timestamp_millis()
        ));
        let execution = match request {
            Ok(request) => self.workflow_engine.start_workflow(request).await,
            Err(error) => Err(error),
        };
        let execution = match execution {
            Ok(execution) => execution,
            Err(error) => {
                self.roll_back(actor, &application, log, &error).await;
                return Err(error);
            }
        };

        let mut stored = stored;
        stored.record_decommission_workflow(execution.workflow_id.clone())?;
        let stored = self.catalog.applications.update_application(&stored).await?;

        self.audit_application(
            actor,
            &stored,
            AuditAction::ApplicationDecommissioningStarted,
            format!(
                "grace period ends at {}; workflow '{}'",
                grace_period_ends_at.to_rfc3339(),
                execution.workflow_id
            ),
        )
        .await?;

        info!(
            application_id = %application_id,
            grace_period_days = grace_period.num_days(),
            workflow_id = %execution.workflow_id,
            "application decommissioning started"
        );

        Ok(stored.lifecycle_at(now))
    }

    async fn freeze_clusters(
        &self,
        clusters: Vec<VirtualCluster>,
        log: &mut CompensationLog,
    ) -> AppResult<()> {
        for cluster in clusters {
            if cluster.status() != VirtualClusterStatus::Active {
                continue;
            }

            let mut read_only = cluster.clone();
            read_only.transition_to(VirtualClusterStatus::ReadOnly)?;
            self.catalog
                .virtual_clusters
                .update_virtual_cluster(&read_only)
                .await?;
            log.virtual_cluster_written(cluster);
        }
        Ok(())
    }

    async fn roll_back(
        &self,
        actor: &UserIdentity,
        application: &Application,
        log: CompensationLog,
        cause: &AppError,
    ) {
        error!(
            error = %cause,
            application_id = %application.id(),
            "decommissioning failed; rolling back"
        );
        let failures = log.replay(&self.catalog).await;

        let detail = if failures == 0 {
            format!("rolled back: {cause}")
        } else {
            format!("rolled back with {failures} failed restore step(s): {cause}")
        };
        if let Err(error) = self
            .audit_application(
                actor,
                application,
                AuditAction::ApplicationDecommissioningRolledBack,
                detail,
            )
            .await
        {
            warn!(%error, application_id = %application.id(), "failed to audit rollback");
        }
    }
}
