use std::str::FromStr;

use orbit_core::{AppError, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Role a subject holds inside one workspace.
///
/// Variants are declared in ascending privilege order so that the derived
/// ordering doubles as the privilege comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Regular workspace member.
    Member,
    /// Workspace administrator.
    Admin,
    /// Workspace owner.
    Owner,
}

impl WorkspaceRole {
    /// Returns a stable storage value for the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Returns whether this role grants at least the `required` privileges.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self >= required
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for WorkspaceRole {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(AppError::Validation(format!(
                "unknown workspace role '{value}'"
            ))),
        }
    }
}

/// Membership of one subject in one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMembership {
    /// Workspace the subject belongs to.
    pub workspace_id: WorkspaceId,
    /// Identity provider subject.
    pub subject: String,
    /// Role held by the subject.
    pub role: WorkspaceRole,
}
