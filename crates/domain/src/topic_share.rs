use std::str::FromStr;

use chrono::{DateTime, Utc};
use orbit_core::{AppError, AppResult, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::{LifecycleStatus, TopicId, TopicShareId};

/// Access granted by a topic share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// Consume only.
    Read,
    /// Produce only.
    Write,
    /// Consume and produce.
    ReadWrite,
}

impl AccessLevel {
    /// Returns a stable storage value, also used as the provisioning permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "read_write",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "read_write" => Ok(Self::ReadWrite),
            _ => Err(AppError::Validation(format!(
                "unknown access level '{value}'"
            ))),
        }
    }
}

/// Lifecycle status of a topic share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicShareStatus {
    /// Waiting for owner review.
    Pending,
    /// Access granted.
    Approved,
    /// Owner declined the request.
    Rejected,
    /// Owner withdrew granted access.
    Revoked,
    /// Granted access reached its expiry.
    Expired,
}

impl TopicShareStatus {
    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "revoked" => Ok(Self::Revoked),
            "expired" => Ok(Self::Expired),
            _ => Err(AppError::Validation(format!(
                "unknown topic share status '{value}'"
            ))),
        }
    }

    /// Returns whether the share blocks a new request for the same topic and workspace.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl LifecycleStatus for TopicShareStatus {
    const RESOURCE: &'static str = "topic share";

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Approved, Self::Rejected],
            Self::Approved => &[Self::Revoked, Self::Expired],
            Self::Rejected | Self::Revoked | Self::Expired => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

/// Input for a new cross-workspace share request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicShareRequest {
    /// Requested topic.
    pub topic_id: TopicId,
    /// Workspace that owns the topic.
    pub owner_workspace_id: WorkspaceId,
    /// Workspace asking for access.
    pub target_workspace_id: WorkspaceId,
    /// Requested access.
    pub access_level: AccessLevel,
    /// Justification supplied by the requester.
    pub reason: Option<String>,
    /// Subject that filed the request.
    pub requested_by: String,
    /// When the request was filed.
    pub requested_at: DateTime<Utc>,
    /// Optional end of the granted access.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Actor and time of a review decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareDecision {
    /// Deciding subject.
    pub decided_by: String,
    /// Decision time.
    pub decided_at: DateTime<Utc>,
}

/// Raw persisted topic share fields used by repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicShareParts {
    /// Share id.
    pub id: TopicShareId,
    /// Request fields.
    pub request: TopicShareRequest,
    /// Status.
    pub status: TopicShareStatus,
    /// Approval decision.
    pub approval: Option<ShareDecision>,
    /// Rejection decision.
    pub rejection: Option<ShareDecision>,
    /// Rejection reason.
    pub rejection_reason: Option<String>,
    /// Revocation decision.
    pub revocation: Option<ShareDecision>,
    /// Expiry time applied by the sweeper.
    pub expired_at: Option<DateTime<Utc>>,
    /// Provisioning workflow id.
    pub provisioning_workflow_id: Option<String>,
}

/// Grant of cross-workspace access to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicShare {
    id: TopicShareId,
    topic_id: TopicId,
    owner_workspace_id: WorkspaceId,
    target_workspace_id: WorkspaceId,
    access_level: AccessLevel,
    status: TopicShareStatus,
    reason: Option<String>,
    requested_by: String,
    requested_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    approval: Option<ShareDecision>,
    rejection: Option<ShareDecision>,
    rejection_reason: Option<String>,
    revocation: Option<ShareDecision>,
    expired_at: Option<DateTime<Utc>>,
    provisioning_workflow_id: Option<String>,
}

impl TopicShare {
    /// Creates a pending share from a validated request.
    pub fn request(id: TopicShareId, request: TopicShareRequest) -> AppResult<Self> {
        if request.owner_workspace_id == request.target_workspace_id {
            return Err(AppError::Validation(
                "a workspace cannot request access to its own topic".to_owned(),
            ));
        }

        if request.requested_by.trim().is_empty() {
            return Err(AppError::Validation(
                "requested_by must not be empty".to_owned(),
            ));
        }

        if let Some(expires_at) = request.expires_at
            && expires_at <= request.requested_at
        {
            return Err(AppError::Validation(
                "expires_at must be in the future".to_owned(),
            ));
        }

        Ok(Self::from_parts(TopicShareParts {
            id,
            request: TopicShareRequest {
                reason: normalize(request.reason.clone()),
                ..request
            },
            status: TopicShareStatus::Pending,
            approval: None,
            rejection: None,
            rejection_reason: None,
            revocation: None,
            expired_at: None,
            provisioning_workflow_id: None,
        }))
    }

    /// Rebuilds a share from persisted fields.
    #[must_use]
    pub fn from_parts(parts: TopicShareParts) -> Self {
        Self {
            id: parts.id,
            topic_id: parts.request.topic_id,
            owner_workspace_id: parts.request.owner_workspace_id,
            target_workspace_id: parts.request.target_workspace_id,
            access_level: parts.request.access_level,
            status: parts.status,
            reason: parts.request.reason,
            requested_by: parts.request.requested_by,
            requested_at: parts.request.requested_at,
            expires_at: parts.request.expires_at,
            approval: parts.approval,
            rejection: parts.rejection,
            rejection_reason: parts.rejection_reason,
            revocation: parts.revocation,
            expired_at: parts.expired_at,
            provisioning_workflow_id: parts.provisioning_workflow_id,
        }
    }

    /// Returns the share id.
    #[must_use]
    pub fn id(&self) -> TopicShareId {
        self.id
    }

    /// Returns the shared topic id.
    #[must_use]
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }

    /// Returns the workspace owning the topic.
    #[must_use]
    pub fn owner_workspace_id(&self) -> WorkspaceId {
        self.owner_workspace_id
    }

    /// Returns the workspace receiving access.
    #[must_use]
    pub fn target_workspace_id(&self) -> WorkspaceId {
        self.target_workspace_id
    }

    /// Returns the access level.
    #[must_use]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> TopicShareStatus {
        self.status
    }

    /// Returns the requester's justification.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the requesting subject.
    #[must_use]
    pub fn requested_by(&self) -> &str {
        self.requested_by.as_str()
    }

    /// Returns when the request was filed.
    #[must_use]
    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Returns when granted access ends.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the approval decision.
    #[must_use]
    pub fn approval(&self) -> Option<&ShareDecision> {
        self.approval.as_ref()
    }

    /// Returns the rejection decision.
    #[must_use]
    pub fn rejection(&self) -> Option<&ShareDecision> {
        self.rejection.as_ref()
    }

    /// Returns the rejection reason.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the revocation decision.
    #[must_use]
    pub fn revocation(&self) -> Option<&ShareDecision> {
        self.revocation.as_ref()
    }

    /// Returns when the sweeper expired the share.
    #[must_use]
    pub fn expired_at(&self) -> Option<DateTime<Utc>> {
        self.expired_at
    }

    /// Returns the provisioning workflow id.
    #[must_use]
    pub fn provisioning_workflow_id(&self) -> Option<&str> {
        self.provisioning_workflow_id.as_deref()
    }

    /// Returns whether an approved share is past its expiry at `now`.
    #[must_use]
    pub fn is_due_for_expiry(&self, now: DateTime<Utc>) -> bool {
        self.status == TopicShareStatus::Approved
            && self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Approves a pending share.
    pub fn approve(&mut self, approved_by: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.require_status(TopicShareStatus::Pending, "approved")?;
        self.status = self.status.transition_to(TopicShareStatus::Approved)?;
        self.approval = Some(ShareDecision {
            decided_by: approved_by.to_owned(),
            decided_at: now,
        });
        Ok(())
    }

    /// Rejects a pending share.
    pub fn reject(
        &mut self,
        rejected_by: &str,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        self.require_status(TopicShareStatus::Pending, "rejected")?;
        self.status = self.status.transition_to(TopicShareStatus::Rejected)?;
        self.rejection = Some(ShareDecision {
            decided_by: rejected_by.to_owned(),
            decided_at: now,
        });
        self.rejection_reason = normalize(reason);
        Ok(())
    }

    /// Revokes an approved share.
    pub fn revoke(&mut self, revoked_by: &str, now: DateTime<Utc>) -> AppResult<()> {
        self.require_status(TopicShareStatus::Approved, "revoked")?;
        self.status = self.status.transition_to(TopicShareStatus::Revoked)?;
        self.revocation = Some(ShareDecision {
            decided_by: revoked_by.to_owned(),
            decided_at: now,
        });
        Ok(())
    }

    /// Expires an approved share whose expiry has passed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> AppResult<()> {
        if !self.is_due_for_expiry(now) {
            return Err(AppError::Conflict(format!(
                "topic share '{}' is not due for expiry",
                self.id
            )));
        }

        self.status = self.status.transition_to(TopicShareStatus::Expired)?;
        self.expired_at = Some(now);
        Ok(())
    }

    /// Records the provisioning workflow started for this share.
    pub fn record_provisioning_workflow(&mut self, workflow_id: impl Into<String>) {
        self.provisioning_workflow_id = Some(workflow_id.into());
    }

    fn require_status(&self, expected: TopicShareStatus, verb: &str) -> AppResult<()> {
        if self.status == expected {
            return Ok(());
        }

        Err(AppError::Conflict(format!(
            "topic share '{}' is {}; only {} shares can be {verb}",
            self.id,
            self.status.as_str(),
            expected.as_str()
        )))
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}
