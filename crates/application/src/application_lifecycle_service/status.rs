use super::*;

impl ApplicationLifecycleService {
    /// Returns the lifecycle projection of an application for any member of
    /// its workspace.
    pub async fn lifecycle_status(
        &self,
        actor: &UserIdentity,
        application_id: ApplicationId,
    ) -> AppResult<ApplicationLifecycle> {
        let application = self.load_application(application_id).await?;
        self.authorize(actor, &application, AccessAction::ViewWorkspace)
            .await?;

        Ok(application.lifecycle_at(self.clock.now()))
    }
}
