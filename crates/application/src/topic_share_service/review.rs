use super::*;

impl TopicShareService {
    /// Approves a pending share and starts access provisioning.
    ///
    /// When provisioning cannot start, the approval is rolled back to pending
    /// and an `Unavailable` error is returned.
    pub async fn approve_share(
        &self,
        actor: &UserIdentity,
        share_id: TopicShareId,
    ) -> AppResult<TopicShare> {
        let pending = self.load_share(share_id).await?;
        self.authorization_service
            .require(
                actor,
                Self::share_resource(&pending),
                AccessAction::ReviewTopicShare,
            )
            .await?;
        let topic = self.load_topic(pending.topic_id()).await?;

        let mut share = pending.clone();
        share.approve(actor.subject(), self.clock.now())?;
        self.shares.update_share(&share).await?;

        if let Err(error) = self.start_provisioning(&mut share, &topic).await {
            self.restore_pending(&pending).await;
            return Err(AppError::Unavailable(format!(
                "access provisioning for topic share '{share_id}' could not be started: {error}"
            )));
        }

        self.record_approval(
            actor.subject(),
            &share,
            format!("approved {} access", share.access_level().as_str()),
        )
        .await;

        Ok(share)
    }

    /// Rejects a pending share.
    pub async fn reject_share(
        &self,
        actor: &UserIdentity,
        share_id: TopicShareId,
        reason: Option<String>,
    ) -> AppResult<TopicShare> {
        let mut share = self.load_share(share_id).await?;
        self.authorization_service
            .require(
                actor,
                Self::share_resource(&share),
                AccessAction::ReviewTopicShare,
            )
            .await?;

        share.reject(actor.subject(), reason, self.clock.now())?;
        self.shares.update_share(&share).await?;
        self.audit_share(
            actor.subject(),
            &share,
            AuditAction::TopicShareRejected,
            share
                .rejection_reason()
                .map_or_else(|| "rejected".to_owned(), |reason| format!("rejected: {reason}")),
        )
        .await?;

        self.notify(WorkspaceNotification {
            workspace_id: share.target_workspace_id(),
            kind: NotificationKind::ShareRequestRejected,
            resource_id: share.id().to_string(),
            title: "Topic access request rejected".to_owned(),
            body: share.rejection_reason().map_or_else(
                || format!("{} rejected the request.", actor.display_name()),
                |reason| format!("{} rejected the request: {reason}", actor.display_name()),
            ),
        })
        .await;

        Ok(share)
    }

    /// Revokes an approved share.
    pub async fn revoke_share(
        &self,
        actor: &UserIdentity,
        share_id: TopicShareId,
    ) -> AppResult<TopicShare> {
        let mut share = self.load_share(share_id).await?;
        self.authorization_service
            .require(
                actor,
                Self::share_resource(&share),
                AccessAction::ReviewTopicShare,
            )
            .await?;

        share.revoke(actor.subject(), self.clock.now())?;
        self.shares.update_share(&share).await?;
        self.audit_share(
            actor.subject(),
            &share,
            AuditAction::TopicShareRevoked,
            "revoked access".to_owned(),
        )
        .await?;

        self.notify(WorkspaceNotification {
            workspace_id: share.target_workspace_id(),
            kind: NotificationKind::ShareRevoked,
            resource_id: share.id().to_string(),
            title: "Topic access revoked".to_owned(),
            body: format!(
                "{} revoked {} access granted by share {}.",
                actor.display_name(),
                share.access_level().as_str(),
                share.id()
            ),
        })
        .await;

        Ok(share)
    }
}
