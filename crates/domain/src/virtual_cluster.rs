use std::str::FromStr;

use orbit_core::{AppError, AppResult, NonEmptyString, WorkspaceId};
use serde::{Deserialize, Serialize};

use crate::{ApplicationId, LifecycleStatus, VirtualClusterId};

/// Deployment environment of a virtual cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterEnvironment {
    /// Development environment.
    Development,
    /// Staging environment.
    Staging,
    /// Production environment.
    Production,
}

impl ClusterEnvironment {
    /// Returns a stable storage value for the environment.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::from_str(value)
    }
}

impl FromStr for ClusterEnvironment {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "development" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            _ => Err(AppError::Validation(format!(
                "unknown cluster environment '{value}'"
            ))),
        }
    }
}

/// Lifecycle status of a virtual cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualClusterStatus {
    /// Cluster resources are being created.
    Provisioning,
    /// Cluster serves reads and writes.
    Active,
    /// Cluster only serves reads while its application is decommissioned.
    ReadOnly,
    /// Physical cleanup is in progress.
    Deleting,
    /// Cluster no longer exists.
    Deleted,
}

impl VirtualClusterStatus {
    /// Parses a storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "provisioning" => Ok(Self::Provisioning),
            "active" => Ok(Self::Active),
            "read_only" => Ok(Self::ReadOnly),
            "deleting" => Ok(Self::Deleting),
            "deleted" => Ok(Self::Deleted),
            _ => Err(AppError::Validation(format!(
                "unknown virtual cluster status '{value}'"
            ))),
        }
    }
}

impl LifecycleStatus for VirtualClusterStatus {
    const RESOURCE: &'static str = "virtual cluster";

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Provisioning => &[Self::Active, Self::Deleted],
            Self::Active => &[Self::ReadOnly, Self::Deleting, Self::Deleted],
            Self::ReadOnly => &[Self::Active, Self::Deleting, Self::Deleted],
            Self::Deleting => &[Self::Deleted],
            Self::Deleted => &[],
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioning => "provisioning",
            Self::Active => "active",
            Self::ReadOnly => "read_only",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
        }
    }
}

/// Logical, access-scoped partition of a physical Kafka cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualCluster {
    id: VirtualClusterId,
    application_id: ApplicationId,
    workspace_id: WorkspaceId,
    name: NonEmptyString,
    environment: ClusterEnvironment,
    status: VirtualClusterStatus,
    bootstrap_servers: NonEmptyString,
    topic_prefix: String,
}

impl VirtualCluster {
    /// Creates a validated virtual cluster.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VirtualClusterId,
        application_id: ApplicationId,
        workspace_id: WorkspaceId,
        name: impl Into<String>,
        environment: ClusterEnvironment,
        status: VirtualClusterStatus,
        bootstrap_servers: impl Into<String>,
        topic_prefix: impl Into<String>,
    ) -> AppResult<Self> {
        let topic_prefix = topic_prefix.into();
        if topic_prefix.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(
                "topic_prefix must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self {
            id,
            application_id,
            workspace_id,
            name: NonEmptyString::new(name)?,
            environment,
            status,
            bootstrap_servers: NonEmptyString::new(bootstrap_servers)?,
            topic_prefix,
        })
    }

    /// Returns the cluster id.
    #[must_use]
    pub fn id(&self) -> VirtualClusterId {
        self.id
    }

    /// Returns the owning application id.
    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the owning workspace id.
    #[must_use]
    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the cluster name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the deployment environment.
    #[must_use]
    pub fn environment(&self) -> ClusterEnvironment {
        self.environment
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub fn status(&self) -> VirtualClusterStatus {
        self.status
    }

    /// Returns the physical bootstrap servers.
    #[must_use]
    pub fn bootstrap_servers(&self) -> &NonEmptyString {
        &self.bootstrap_servers
    }

    /// Returns the physical topic name prefix.
    #[must_use]
    pub fn topic_prefix(&self) -> &str {
        self.topic_prefix.as_str()
    }

    /// Resolves the physical name for a logical topic name.
    #[must_use]
    pub fn physical_topic_name(&self, topic_name: &str) -> String {
        format!("{}{topic_name}", self.topic_prefix)
    }

    /// Moves the cluster to `next` when the transition table allows it.
    pub fn transition_to(&mut self, next: VirtualClusterStatus) -> AppResult<()> {
        self.status = self.status.transition_to(next)?;
        Ok(())
    }
}
