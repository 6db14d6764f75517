use std::sync::Arc;

use orbit_core::{AppError, AppResult, UserIdentity, WorkspaceId};
use orbit_domain::{
    AccessAction, AccessResource, Application, ApplicationId, AuditAction, QuotaInfo,
};
use tracing::info;

use crate::{
    ApplicationRepository, AuditEvent, AuditRepository, AuthorizationService, Clock, QuotaService,
    SystemClock,
};

/// Quota-enforced application registration.
#[derive(Clone)]
pub struct ApplicationCatalogService {
    authorization_service: AuthorizationService,
    applications: Arc<dyn ApplicationRepository>,
    quota_service: QuotaService,
    audit_repository: Arc<dyn AuditRepository>,
    clock: Arc<dyn Clock>,
}

impl ApplicationCatalogService {
    /// Creates a new catalog service using the wall clock.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        applications: Arc<dyn ApplicationRepository>,
        quota_service: QuotaService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            authorization_service,
            applications,
            quota_service,
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

    /// Registers a new application when the workspace has quota headroom.
    pub async fn create_application(
        &self,
        actor: &UserIdentity,
        workspace_id: WorkspaceId,
        name: &str,
    ) -> AppResult<Application> {
        self.authorization_service
            .require(
                actor,
                AccessResource::Workspace { workspace_id },
                AccessAction::CreateApplication,
            )
            .await?;

        let application = Application::new(
            ApplicationId::new(),
            workspace_id,
            name,
            self.clock.now(),
        )?;

        let quota = self.quota_service.workspace_quota_info(workspace_id).await?;
        if !quota.allows_another() {
            return Err(AppError::Conflict(format!(
                "workspace '{workspace_id}' reached its application quota ({} of {})",
                quota.used, quota.quota
            )));
        }

        self.applications
            .create_application(application.clone())
            .await?;

        self.audit_repository
            .append_event(AuditEvent {
                workspace_id,
                subject: actor.subject().to_owned(),
                action: AuditAction::ApplicationCreated,
                resource_type: "application".to_owned(),
                resource_id: application.id().to_string(),
                detail: Some(format!(
                    "created application '{}'",
                    application.name().as_str()
                )),
                occurred_at: application.created_at(),
            })
            .await?;

        info!(
            application_id = %application.id(),
            workspace_id = %workspace_id,
            "application created"
        );

        Ok(application)
    }

    /// Returns the quota projection of a workspace for one of its members.
    pub async fn workspace_quota(
        &self,
        actor: &UserIdentity,
        workspace_id: WorkspaceId,
    ) -> AppResult<QuotaInfo> {
        self.authorization_service
            .require(
                actor,
                AccessResource::Workspace { workspace_id },
                AccessAction::ViewWorkspace,
            )
            .await?;

        self.quota_service.workspace_quota_info(workspace_id).await
    }
}
