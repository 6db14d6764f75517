use super::*;

impl TopicShareService {
    /// Requests access to a topic owned by another workspace.
    ///
    /// The share is always stored as pending first. When a policy
    /// auto-approves it, approval and provisioning follow; if provisioning
    /// cannot start the share falls back to manual review.
    pub async fn request_share(
        &self,
        actor: &UserIdentity,
        input: RequestTopicShareInput,
    ) -> AppResult<ShareRequestOutcome> {
        let topic = self.load_topic(input.topic_id).await?;
        let share_id = TopicShareId::new();
        self.authorization_service
            .require(
                actor,
                AccessResource::TopicShare {
                    share_id,
                    owner_workspace_id: topic.workspace_id(),
                    target_workspace_id: input.target_workspace_id,
                },
                AccessAction::RequestTopicShare,
            )
            .await?;

        if topic.status() != TopicStatus::Active {
            return Err(AppError::Conflict(format!(
                "topic '{}' is {} and cannot be shared",
                topic.id(),
                topic.status().as_str()
            )));
        }
        if !topic.visibility().allows_cross_workspace_requests() {
            return Err(AppError::Forbidden(format!(
                "topic '{}' has {} visibility and does not accept access requests",
                topic.id(),
                topic.visibility().as_str()
            )));
        }

        let share = TopicShare::request(
            share_id,
            TopicShareRequest {
                topic_id: topic.id(),
                owner_workspace_id: topic.workspace_id(),
                target_workspace_id: input.target_workspace_id,
                access_level: input.access_level,
                reason: input.reason,
                requested_by: actor.subject().to_owned(),
                requested_at: self.clock.now(),
                expires_at: input.expires_at,
            },
        )?;

        if let Some(existing) = self
            .shares
            .find_open_share(topic.id(), input.target_workspace_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "workspace '{}' already has a {} share '{}' for topic '{}'",
                input.target_workspace_id,
                existing.status().as_str(),
                existing.id(),
                topic.id()
            )));
        }

        self.shares.create_share(share.clone()).await?;
        self.audit_share(
            actor.subject(),
            &share,
            AuditAction::TopicShareRequested,
            format!(
                "requested {} access to topic '{}'",
                share.access_level().as_str(),
                topic.name().as_str()
            ),
        )
        .await?;

        let auto_approve = self
            .policy_evaluator
            .should_auto_approve(
                topic.id(),
                topic.workspace_id(),
                input.target_workspace_id,
                share.access_level(),
            )
            .await?;

        if auto_approve && let Some(approved) = self.auto_approve(&share, &topic).await {
            return Ok(ShareRequestOutcome {
                share: approved,
                auto_approved: true,
            });
        }

        self.notify(WorkspaceNotification {
            workspace_id: share.owner_workspace_id(),
            kind: NotificationKind::ShareRequestPending,
            resource_id: share.id().to_string(),
            title: format!("Access request for topic {}", topic.name().as_str()),
            body: format!(
                "{} requested {} access for workspace {}.",
                actor.display_name(),
                share.access_level().as_str(),
                share.target_workspace_id()
            ),
        })
        .await;

        Ok(ShareRequestOutcome {
            share,
            auto_approved: false,
        })
    }

    /// Approves on behalf of a share policy. Returns `None` when provisioning
    /// never started and the share went back to pending.
    async fn auto_approve(&self, pending: &TopicShare, topic: &Topic) -> Option<TopicShare> {
        let mut share = pending.clone();
        if let Err(error) = self.approve_and_provision(&mut share, topic).await {
            warn!(
                %error,
                share_id = %pending.id(),
                "auto-approved share falls back to manual review"
            );
            self.restore_pending(pending).await;
            return None;
        }

        let detail = "approved by share policy".to_owned();
        self.record_approval(SYSTEM_SUBJECT, &share, detail).await;
        Some(share)
    }

    async fn approve_and_provision(&self, share: &mut TopicShare, topic: &Topic) -> AppResult<()> {
        share.approve(SYSTEM_SUBJECT, self.clock.now())?;
        self.shares.update_share(share).await?;
        self.start_provisioning(share, topic).await
    }
}
