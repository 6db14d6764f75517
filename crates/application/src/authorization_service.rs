use std::sync::Arc;

use orbit_core::{AppError, AppResult, UserIdentity, WorkspaceId};
use orbit_domain::{AccessAction, AccessResource, WorkspaceRole};
use tracing::debug;

use crate::WorkspaceMembershipRepository;

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    /// Whether the action is allowed.
    pub allowed: bool,
    /// Workspace whose membership governed the decision.
    pub workspace_id: WorkspaceId,
    /// Role the actor holds there, if any.
    pub role: Option<WorkspaceRole>,
    /// Least privileged role that would have been allowed.
    pub required_role: WorkspaceRole,
}

/// Centralized `(actor, resource, action)` policy evaluation backed by
/// workspace memberships.
#[derive(Clone)]
pub struct AuthorizationService {
    memberships: Arc<dyn WorkspaceMembershipRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a membership repository.
    #[must_use]
    pub fn new(memberships: Arc<dyn WorkspaceMembershipRepository>) -> Self {
        Self { memberships }
    }

    /// Evaluates whether the actor may perform `action` on `resource`.
    pub async fn authorize(
        &self,
        actor: &UserIdentity,
        resource: AccessResource,
        action: AccessAction,
    ) -> AppResult<AccessDecision> {
        let workspace_id = resource.governing_workspace(action);
        let required_role = action.minimum_role();
        let role = self
            .memberships
            .find_member_role(workspace_id, actor.subject())
            .await?;

        let decision = AccessDecision {
            allowed: role.is_some_and(|role| role.satisfies(required_role)),
            workspace_id,
            role,
            required_role,
        };

        debug!(
            subject = actor.subject(),
            action = action.as_str(),
            resource = %resource.describe(),
            allowed = decision.allowed,
            "evaluated access policy"
        );

        Ok(decision)
    }

    /// Ensures the actor may perform `action` on `resource` and returns the
    /// role that granted it.
    pub async fn require(
        &self,
        actor: &UserIdentity,
        resource: AccessResource,
        action: AccessAction,
    ) -> AppResult<WorkspaceRole> {
        let decision = self.authorize(actor, resource, action).await?;
        match decision.role {
            Some(role) if decision.allowed => Ok(role),
            Some(role) => Err(AppError::Forbidden(format!(
                "subject '{}' has role '{}' in workspace '{}' but '{}' on {} requires '{}'",
                actor.subject(),
                role.as_str(),
                decision.workspace_id,
                action.as_str(),
                resource.describe(),
                decision.required_role.as_str()
            ))),
            None => Err(AppError::Forbidden(format!(
                "subject '{}' is not a member of workspace '{}'",
                actor.subject(),
                decision.workspace_id
            ))),
        }
    }
}
