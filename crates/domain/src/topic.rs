use std::str::FromStr;

use orbit_core::{AppError, AppResult, NonEmptyString, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::{LifecycleStatus, TopicId, VirtualClusterId};

/// Catalog visibility of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicVisibility {
    /// Visible to the owning application only.
    Private,
    /// Visible inside the owning workspace.
    Workspace,
    /// Listed in the catalog; other workspaces may request access.
    Discoverable,
    /// Listed in the catalog for every workspace.
    Public,
}

impl TopicVisibility {
    /// Returns a stable storage value for the visibility.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Workspace => "workspace",
            Self::Discoverable => "discoverable",
            Self::Public => "public",
        }
    }

    /// Returns whether other workspaces may request access to the topic.
    #[must_use]
    pub fn allows_cross_workspace_requests(&self) -> bool {
        matches!(self, Self::Discoverable | Self::Public)
    }
}

impl FromStr for TopicVisibility {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "private" => Ok(Self::Private),
            "workspace" => Ok(Self::Workspace),
            "discoverable" => Ok(Self::Discoverable),
            "public" => Ok(Self::Public),
            _ => Err(AppError::Validation(format!(
                "unknown topic visibility '{value}'"
            ))),
        }
    }
}

/// Lifecycle status of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    /// Topic exists.
    Active,
    /// Topic has been removed.
    Deleted,
}

impl TopicStatus {
    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown topic status '{value}'"
            ))),
        }
    }
}

impl LifecycleStatus for TopicStatus {
    const RESOURCE: &'static str = "topic";

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Active => &[Self::Deleted],
            Self::Deleted => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deleted => "deleted",
        }
    }
}

/// Kafka topic living in a virtual cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    id: TopicId,
    workspace_id: WorkspaceId,
    virtual_cluster_id: VirtualClusterId,
    name: NonEmptyString,
    visibility: TopicVisibility,
    status: TopicStatus,
}

impl Topic {
    /// Creates a validated topic.
    pub fn new(
        id: TopicId,
        workspace_id: WorkspaceId,
        virtual_cluster_id: VirtualClusterId,
        name: impl Into<String>,
        visibility: TopicVisibility,
        status: TopicStatus,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name)?;
        if name.as_str().chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "topic name '{}' must not contain whitespace",
                name.as_str()
            )));
        }

        Ok(Self {
            id,
            workspace_id,
            virtual_cluster_id,
            name,
            visibility,
            status,
        })
    }

    /// Returns the topic id.
    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    /// Returns the owning workspace id.
    #[must_use]
    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the virtual cluster hosting the topic.
    #[must_use]
    pub fn virtual_cluster_id(&self) -> VirtualClusterId {
        self.virtual_cluster_id
    }

    /// Returns the logical topic name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the catalog visibility.
    #[must_use]
    pub fn visibility(&self) -> TopicVisibility {
        self.visibility
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> TopicStatus {
        self.status
    }

    /// Marks the topic deleted.
    pub fn mark_deleted(&mut self) -> AppResult<()> {
        self.status = self.status.transition_to(TopicStatus::Deleted)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use orbit_core::WorkspaceId;

    use super::{Topic, TopicStatus, TopicVisibility};
    use crate::{TopicId, VirtualClusterId};

    #[test]
    fn only_catalog_topics_accept_cross_workspace_requests() {
        assert!(!TopicVisibility::Private.allows_cross_workspace_requests());
        assert!(!TopicVisibility::Workspace.allows_cross_workspace_requests());
        assert!(TopicVisibility::Discoverable.allows_cross_workspace_requests());
        assert!(TopicVisibility::Public.allows_cross_workspace_requests());
    }

    #[test]
    fn topic_name_rejects_whitespace() {
        let topic = Topic::new(
            TopicId::new(),
            WorkspaceId::new(),
            VirtualClusterId::new(),
            "orders created",
            TopicVisibility::Public,
            TopicStatus::Active,
        );
        assert!(topic.is_err());
    }
}
