use super::*;

impl TopicShareService {
    /// Starts `AccessProvisioningWorkflow` for an approved share and records
    /// the workflow id on it.
    pub(super) async fn start_provisioning(
        &self,
        share: &mut TopicShare,
        topic: &Topic,
    ) -> AppResult<()> {
        let request = AccessProvisioningArguments::for_share(share, topic).into_request()?;
        let execution = self.workflow_engine.start_workflow(request).await?;
        info!(
            share_id = %share.id(),
            workflow_id = %execution.workflow_id,
            "access provisioning started"
        );
        share.record_provisioning_workflow(execution.workflow_id);
        Ok(())
    }

    /// Stores the provisioning workflow id and audits the approval.
    ///
    /// Access is already being granted at this point, so failures are logged
    /// and the share stays approved.
    pub(super) async fn record_approval(&self, subject: &str, share: &TopicShare, detail: String) {
        if let Err(error) = self.shares.update_share(share).await {
            error!(
                %error,
                share_id = %share.id(),
                "failed to store provisioning workflow on approved topic share"
            );
        }
        if let Err(error) = self
            .audit_share(subject, share, AuditAction::TopicShareApproved, detail)
            .await
        {
            error!(%error, share_id = %share.id(), "failed to audit topic share approval");
        }
    }

    /// Writes back the pending snapshot taken before an approval whose
    /// provisioning never started.
    pub(super) async fn restore_pending(&self, pending: &TopicShare) {
        if let Err(error) = self.shares.update_share(pending).await {
            error!(
                %error,
                share_id = %pending.id(),
                "failed to restore topic share to pending after provisioning failure"
            );
        }
    }
}
