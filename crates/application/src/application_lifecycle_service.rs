use std::sync::Arc;

use orbit_core::{AppError, AppResult, UserIdentity};
use orbit_domain::{
    AccessAction, AccessResource, Application, ApplicationId, ApplicationLifecycle, AuditAction,
    TopicStatus, VirtualCluster, VirtualClusterStatus, grace_period_for_environments,
    grace_period_override,
};
use tracing::{error, info, warn};

use crate::{
    ApplicationDecommissioningArguments, AuditEvent, AuditRepository, AuthorizationService,
    CatalogRepositories, Clock, ScheduleDeletion, SystemClock, WorkflowEngine, cleanup_schedule_id,
};

mod cancel;
mod compensation;
mod decommission;
mod force_delete;
mod status;

use compensation::CompensationLog;

/// Input payload for starting decommissioning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecommissionApplicationInput {
    /// Optional administrator reason.
    pub reason: Option<String>,
    /// Grace period in days, replacing the environment default.
    pub grace_period_days: Option<u32>,
}

/// Grace-period state machine over applications and their virtual clusters.
///
/// Physical cleanup is delegated to the durable workflow engine.
#[derive(Clone)]
pub struct ApplicationLifecycleService {
    authorization_service: AuthorizationService,
    catalog: CatalogRepositories,
    workflow_engine: Arc<dyn WorkflowEngine>,
    audit_repository: Arc<dyn AuditRepository>,
    clock: Arc<dyn Clock>,
}

impl ApplicationLifecycleService {
    /// Creates a new lifecycle service using the wall clock.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        catalog: CatalogRepositories,
        workflow_engine: Arc<dyn WorkflowEngine>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            catalog,
            workflow_engine,
            audit_repository,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn load_application(&self, application_id: ApplicationId) -> AppResult<Application> {
        self.catalog
            .applications
            .find_application(application_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("application '{application_id}' does not exist"))
            })
    }

    async fn authorize(
        &self,
        actor: &UserIdentity,
        application: &Application,
        action: AccessAction,
    ) -> AppResult<()> {
        self.authorization_service
            .require(
                actor,
                AccessResource::Application {
                    application_id: application.id(),
                    workspace_id: application.workspace_id(),
                },
                action,
            )
            .await
            .map(|_| ())
    }

    async fn list_clusters(&self, application_id: ApplicationId) -> AppResult<Vec<VirtualCluster>> {
        self.catalog
            .virtual_clusters
            .list_application_virtual_clusters(application_id)
            .await
    }

    /// Removes the application's cleanup schedule. Failures are logged only.
    async fn delete_cleanup_schedule(&self, application_id: ApplicationId) {
        let schedule_id = cleanup_schedule_id(application_id);
        match self.workflow_engine.delete_schedule(&schedule_id).await {
            Ok(ScheduleDeletion::Deleted) => {
                info!(schedule_id = %schedule_id, "cleanup schedule deleted");
            }
            Ok(ScheduleDeletion::NotFound) => {
                info!(schedule_id = %schedule_id, "no cleanup schedule to delete");
            }
            Err(error) => {
                warn!(%error, schedule_id = %schedule_id, "failed to delete cleanup schedule");
            }
        }
    }

    async fn audit_application(
        &self,
        actor: &UserIdentity,
        application: &Application,
        action: AuditAction,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                workspace_id: application.workspace_id(),
                subject: actor.subject().to_owned(),
                action,
                resource_type: "application".to_owned(),
                resource_id: application.id().to_string(),
                detail: Some(detail),
                occurred_at: self.clock.now(),
            })
            .await
    }
}
