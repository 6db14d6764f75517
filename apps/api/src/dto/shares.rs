use chrono::{DateTime, Utc};
use orbit_application::{ConnectionDetails, RequestTopicShareInput, ShareRequestOutcome};
use orbit_core::{AppError, AppResult, WorkspaceId};
use orbit_domain::{
    AccessLevel, LifecycleStatus, ServiceAccount, ShareDecision, TopicId, TopicShare,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::applications::timestamp;

/// Access level requested for or granted by a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-level-dto.ts"
)]
pub enum AccessLevelDto {
    Read,
    Write,
    ReadWrite,
}

/// Incoming payload for a cross-workspace share request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/request-topic-share-request.ts"
)]
pub struct RequestTopicShareRequest {
    pub topic_id: String,
    pub target_workspace_id: String,
    pub access_level: AccessLevelDto,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Incoming payload for rejecting a share request.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reject-topic-share-request.ts"
)]
pub struct RejectTopicShareRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// API representation of a review decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-decision-response.ts"
)]
pub struct ShareDecisionResponse {
    pub decided_by: String,
    pub decided_at: String,
}

/// API representation of a topic share.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/topic-share-response.ts"
)]
pub struct TopicShareResponse {
    pub id: String,
    pub topic_id: String,
    pub owner_workspace_id: String,
    pub target_workspace_id: String,
    pub access_level: AccessLevelDto,
    pub status: String,
    pub reason: Option<String>,
    pub requested_by: String,
    pub requested_at: String,
    pub expires_at: Option<String>,
    pub approval: Option<ShareDecisionResponse>,
    pub rejection: Option<ShareDecisionResponse>,
    pub rejection_reason: Option<String>,
    pub revocation: Option<ShareDecisionResponse>,
    pub expired_at: Option<String>,
    pub provisioning_workflow_id: Option<String>,
}

/// API representation of a share request result.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/share-request-outcome-response.ts"
)]
pub struct ShareRequestOutcomeResponse {
    pub share: TopicShareResponse,
    pub auto_approved: bool,
}

/// API representation of a service account credential reference.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/service-account-response.ts"
)]
pub struct ServiceAccountResponse {
    pub id: String,
    pub application_id: String,
    pub username: String,
}

/// API representation of Kafka connection details.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/connection-details-response.ts"
)]
pub struct ConnectionDetailsResponse {
    pub topic_id: String,
    pub topic_name: String,
    pub bootstrap_servers: String,
    pub connection_mode: String,
    pub access_level: Option<AccessLevelDto>,
    pub workspace_id: String,
    pub service_accounts: Vec<ServiceAccountResponse>,
}

impl From<AccessLevel> for AccessLevelDto {
    fn from(value: AccessLevel) -> Self {
        match value {
            AccessLevel::Read => Self::Read,
            AccessLevel::Write => Self::Write,
            AccessLevel::ReadWrite => Self::ReadWrite,
        }
    }
}

impl From<AccessLevelDto> for AccessLevel {
    fn from(value: AccessLevelDto) -> Self {
        match value {
            AccessLevelDto::Read => Self::Read,
            AccessLevelDto::Write => Self::Write,
            AccessLevelDto::ReadWrite => Self::ReadWrite,
        }
    }
}

impl TryFrom<RequestTopicShareRequest> for RequestTopicShareInput {
    type Error = AppError;

    fn try_from(value: RequestTopicShareRequest) -> AppResult<Self> {
        let expires_at = value
            .expires_at
            .filter(|expires_at| !expires_at.trim().is_empty())
            .map(|expires_at| {
                DateTime::parse_from_rfc3339(expires_at.trim())
                    .map(|parsed| parsed.with_timezone(&Utc))
                    .map_err(|error| {
                        AppError::Validation(format!("invalid expires_at '{expires_at}': {error}"))
                    })
            })
            .transpose()?;

        Ok(Self {
            topic_id: value.topic_id.parse::<TopicId>()?,
            target_workspace_id: value.target_workspace_id.parse::<WorkspaceId>()?,
            access_level: value.access_level.into(),
            reason: value.reason,
            expires_at,
        })
    }
}

impl From<&ShareDecision> for ShareDecisionResponse {
    fn from(value: &ShareDecision) -> Self {
        Self {
            decided_by: value.decided_by.clone(),
            decided_at: timestamp(value.decided_at),
        }
    }
}

impl From<TopicShare> for TopicShareResponse {
    fn from(value: TopicShare) -> Self {
        Self {
            id: value.id().to_string(),
            topic_id: value.topic_id().to_string(),
            owner_workspace_id: value.owner_workspace_id().to_string(),
            target_workspace_id: value.target_workspace_id().to_string(),
            access_level: value.access_level().into(),
            status: value.status().as_str().to_owned(),
            reason: value.reason().map(ToOwned::to_owned),
            requested_by: value.requested_by().to_owned(),
            requested_at: timestamp(value.requested_at()),
            expires_at: value.expires_at().map(timestamp),
            approval: value.approval().map(ShareDecisionResponse::from),
            rejection: value.rejection().map(ShareDecisionResponse::from),
            rejection_reason: value.rejection_reason().map(ToOwned::to_owned),
            revocation: value.revocation().map(ShareDecisionResponse::from),
            expired_at: value.expired_at().map(timestamp),
            provisioning_workflow_id: value.provisioning_workflow_id().map(ToOwned::to_owned),
        }
    }
}

impl From<ShareRequestOutcome> for ShareRequestOutcomeResponse {
    fn from(value: ShareRequestOutcome) -> Self {
        Self {
            share: value.share.into(),
            auto_approved: value.auto_approved,
        }
    }
}

impl From<ServiceAccount> for ServiceAccountResponse {
    fn from(value: ServiceAccount) -> Self {
        Self {
            id: value.id.to_string(),
            application_id: value.application_id.to_string(),
            username: value.username,
        }
    }
}

impl From<ConnectionDetails> for ConnectionDetailsResponse {
    fn from(value: ConnectionDetails) -> Self {
        Self {
            topic_id: value.topic_id.to_string(),
            topic_name: value.topic_name,
            bootstrap_servers: value.bootstrap_servers,
            connection_mode: value.connection_mode.as_str().to_owned(),
            access_level: value.access_level.map(AccessLevelDto::from),
            workspace_id: value.workspace_id.to_string(),
            service_accounts: value
                .service_accounts
                .into_iter()
                .map(ServiceAccountResponse::from)
                .collect(),
        }
    }
}
