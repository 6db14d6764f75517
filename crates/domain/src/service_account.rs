use orbit_core::{AppError, AppResult, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, ServiceAccountId};

/// Status of a Kafka service account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAccountStatus {
    /// Credentials are usable.
    Active,
    /// Credentials were revoked.
    Revoked,
}

impl ServiceAccountStatus {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "active" => Ok(Self::Active),
            "revoked" => Ok(Self::Revoked),
            _ => Err(AppError::Validation(format!(
                "unknown service account status '{value}'"
            ))),
        }
    }
}

/// Kafka credentials issued to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccount {
    /// Account id.
    pub id: ServiceAccountId,
    /// Owning application.
    pub application_id: ApplicationId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// SASL username.
    pub username: String,
    /// Credential status.
    pub status: ServiceAccountStatus,
}
