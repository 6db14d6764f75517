use super::*;

impl TopicShareService {
    /// Moves every approved share whose expiry is at or before `now` to
    /// expired and returns the shares that were expired.
    ///
    /// A share that fails to persist is logged and left for the next sweep.
    pub async fn expire_due_shares(&self, now: DateTime<Utc>) -> AppResult<Vec<TopicShare>> {
        let due = self.shares.list_shares_due_for_expiry(now).await?;
        let mut expired = Vec::with_capacity(due.len());

        for mut share in due {
            if let Err(error) = share.expire(now) {
                warn!(%error, share_id = %share.id(), "skipping share that is no longer due");
                continue;
            }
            if let Err(error) = self.shares.update_share(&share).await {
                error!(%error, share_id = %share.id(), "failed to expire topic share");
                continue;
            }

            self.audit_share(
                SYSTEM_SUBJECT,
                &share,
                AuditAction::TopicShareExpired,
                "access expired".to_owned(),
            )
            .await?;
            self.notify(WorkspaceNotification {
                workspace_id: share.target_workspace_id(),
                kind: NotificationKind::ShareExpired,
                resource_id: share.id().to_string(),
                title: "Topic access expired".to_owned(),
                body: format!(
                    "{} access granted by share {} expired.",
                    share.access_level().as_str(),
                    share.id()
                ),
            })
            .await;

            expired.push(share);
        }

        if !expired.is_empty() {
            info!(count = expired.len(), "expired topic shares");
        }

        Ok(expired)
    }
}
