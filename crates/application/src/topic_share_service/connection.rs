use std::str::FromStr;

use super::*;

/// How clients reach Kafka.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Through the governance proxy, using logical topic names.
    Proxy,
    /// Straight to the physical cluster, using prefixed topic names.
    Direct,
}

impl ConnectionMode {
    /// Returns a stable mode label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proxy => "proxy",
            Self::Direct => "direct",
        }
    }
}

impl FromStr for ConnectionMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "proxy" => Ok(Self::Proxy),
            "direct" => Ok(Self::Direct),
            _ => Err(AppError::Validation(format!(
                "unknown connection mode '{value}'"
            ))),
        }
    }
}

/// Connection resolution settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConnectionConfig {
    mode: ConnectionMode,
    proxy_bootstrap: Option<String>,
}

impl KafkaConnectionConfig {
    /// Resolves connections through the proxy at `bootstrap`.
    pub fn proxy(bootstrap: impl Into<String>) -> AppResult<Self> {
        let bootstrap = bootstrap.into();
        if bootstrap.trim().is_empty() {
            return Err(AppError::Validation(
                "proxy bootstrap address must not be empty".to_owned(),
            ));
        }

        Ok(Self {
            mode: ConnectionMode::Proxy,
            proxy_bootstrap: Some(bootstrap),
        })
    }

    /// Resolves connections against each virtual cluster's physical servers.
    #[must_use]
    pub fn direct() -> Self {
        Self {
            mode: ConnectionMode::Direct,
            proxy_bootstrap: None,
        }
    }

    /// Returns the configured mode.
    #[must_use]
    pub fn mode(&self) -> ConnectionMode {
        self.mode
    }

    fn resolve(&self, cluster: &VirtualCluster, topic: &Topic) -> (String, String) {
        match (self.mode, self.proxy_bootstrap.as_deref()) {
            (ConnectionMode::Proxy, Some(bootstrap)) => {
                (bootstrap.to_owned(), topic.name().as_str().to_owned())
            }
            _ => (
                cluster.bootstrap_servers().as_str().to_owned(),
                cluster.physical_topic_name(topic.name().as_str()),
            ),
        }
    }
}

/// Everything a client needs to produce to or consume from a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDetails {
    /// Topic id.
    pub topic_id: TopicId,
    /// Topic name to use on the wire.
    pub topic_name: String,
    /// Bootstrap servers to connect to.
    pub bootstrap_servers: String,
    /// Mode the details were resolved for.
    pub connection_mode: ConnectionMode,
    /// Granted access level; `None` for the owning workspace.
    pub access_level: Option<AccessLevel>,
    /// Workspace whose credentials apply.
    pub workspace_id: WorkspaceId,
    /// Active service accounts of that workspace's active applications.
    pub service_accounts: Vec<ServiceAccount>,
}

impl TopicShareService {
    /// Returns connection details for the target workspace of an approved share.
    pub async fn share_connection_details(
        &self,
        actor: &UserIdentity,
        share_id: TopicShareId,
    ) -> AppResult<ConnectionDetails> {
        let share = self.load_share(share_id).await?;
        self.authorization_service
            .require(
                actor,
                Self::share_resource(&share),
                AccessAction::ViewConnectionDetails,
            )
            .await?;

        if share.status() != TopicShareStatus::Approved {
            return Err(AppError::Conflict(format!(
                "topic share '{share_id}' is {}; connection details exist only for approved shares",
                share.status().as_str()
            )));
        }
        if share.is_due_for_expiry(self.clock.now()) {
            return Err(AppError::Conflict(format!(
                "topic share '{share_id}' has expired; connection details are no longer available"
            )));
        }

        let topic = self.load_topic(share.topic_id()).await?;
        self.connection_details(
            &topic,
            share.target_workspace_id(),
            Some(share.access_level()),
        )
        .await
    }

    /// Returns connection details of a topic for its owning workspace.
    pub async fn topic_connection_details(
        &self,
        actor: &UserIdentity,
        topic_id: TopicId,
    ) -> AppResult<ConnectionDetails> {
        let topic = self.load_topic(topic_id).await?;
        self.authorization_service
            .require(
                actor,
                AccessResource::Topic {
                    topic_id,
                    owner_workspace_id: topic.workspace_id(),
                },
                AccessAction::ViewConnectionDetails,
            )
            .await?;

        self.connection_details(&topic, topic.workspace_id(), None)
            .await
    }

    async fn connection_details(
        &self,
        topic: &Topic,
        workspace_id: WorkspaceId,
        access_level: Option<AccessLevel>,
    ) -> AppResult<ConnectionDetails> {
        if topic.status() != TopicStatus::Active {
            return Err(AppError::Conflict(format!(
                "topic '{}' is {}",
                topic.id(),
                topic.status().as_str()
            )));
        }

        let cluster = self
            .catalog
            .virtual_clusters
            .find_virtual_cluster(topic.virtual_cluster_id())
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "virtual cluster '{}' of topic '{}' does not exist",
                    topic.virtual_cluster_id(),
                    topic.id()
                ))
            })?;

        let (bootstrap_servers, topic_name) = self.connection_config.resolve(&cluster, topic);

        Ok(ConnectionDetails {
            topic_id: topic.id(),
            topic_name,
            bootstrap_servers,
            connection_mode: self.connection_config.mode(),
            access_level,
            workspace_id,
            service_accounts: self.active_service_accounts(workspace_id).await?,
        })
    }

    async fn active_service_accounts(
        &self,
        workspace_id: WorkspaceId,
    ) -> AppResult<Vec<ServiceAccount>> {
        let application_ids: Vec<_> = self
            .catalog
            .applications
            .list_workspace_applications(workspace_id)
            .await?
            .into_iter()
            .filter(|application| application.status() == ApplicationStatus::Active)
            .map(|application| application.id())
            .collect();
        if application_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut accounts: Vec<_> = self
            .catalog
            .service_accounts
            .list_application_service_accounts(&application_ids)
            .await?
            .into_iter()
            .filter(|account| account.status == ServiceAccountStatus::Active)
            .collect();
        accounts.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(accounts)
    }
}
