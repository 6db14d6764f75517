use std::cmp::Reverse;
use std::sync::Arc;

use orbit_core::{AppResult, WorkspaceId};
use orbit_domain::{AccessLevel, SharePolicy, TopicId};
use tracing::debug;

use crate::SharePolicyRepository;

/// Decides whether a cross-workspace topic access request is auto-approved.
#[derive(Clone)]
pub struct SharePolicyEvaluator {
    policies: Arc<dyn SharePolicyRepository>,
}

impl SharePolicyEvaluator {
    /// Creates a new evaluator.
    #[must_use]
    pub fn new(policies: Arc<dyn SharePolicyRepository>) -> Self {
        Self { policies }
    }

    /// Returns the first policy, in evaluation order, that auto-approves the
    /// request.
    pub async fn matching_policy(
        &self,
        owner_workspace_id: WorkspaceId,
        requesting_workspace_id: WorkspaceId,
        access_level: AccessLevel,
    ) -> AppResult<Option<SharePolicy>> {
        let mut policies = self
            .policies
            .list_enabled_policies(owner_workspace_id)
            .await?;
        policies.retain(|policy| {
            policy
                .workspace_id
                .is_none_or(|workspace_id| workspace_id == owner_workspace_id)
        });
        order_for_evaluation(&mut policies);

        Ok(policies
            .into_iter()
            .find(|policy| policy.auto_approves(requesting_workspace_id, access_level)))
    }

    /// Returns whether the request should skip manual review.
    pub async fn should_auto_approve(
        &self,
        topic_id: TopicId,
        owner_workspace_id: WorkspaceId,
        requesting_workspace_id: WorkspaceId,
        access_level: AccessLevel,
    ) -> AppResult<bool> {
        let policy = self
            .matching_policy(owner_workspace_id, requesting_workspace_id, access_level)
            .await?;

        debug!(
            topic_id = %topic_id,
            requesting_workspace_id = %requesting_workspace_id,
            access_level = access_level.as_str(),
            matched_policy = policy.as_ref().map(|policy| policy.id.to_string()),
            "evaluated share policies"
        );

        Ok(policy.is_some())
    }
}

/// Highest priority first; on equal priority workspace-scoped policies precede
/// platform-wide ones.
fn order_for_evaluation(policies: &mut [SharePolicy]) {
    policies.sort_by_key(|policy| (Reverse(policy.priority), !policy.is_workspace_scoped()));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use orbit_core::WorkspaceId;
    use orbit_domain::{AccessLevel, SharePolicy, SharePolicyId, TopicId};

    use super::SharePolicyEvaluator;
    use crate::test_support::FakeStore;

    fn policy(
        workspace_id: Option<WorkspaceId>,
        priority: i32,
        auto_approve: bool,
        allowed_access_levels: Vec<AccessLevel>,
        auto_approve_workspaces: Vec<WorkspaceId>,
    ) -> SharePolicy {
        SharePolicy {
            id: SharePolicyId::new(),
            workspace_id,
            enabled: true,
            auto_approve,
            allowed_access_levels,
            auto_approve_workspaces,
            priority,
        }
    }

    async fn evaluator_with(policies: Vec<SharePolicy>) -> SharePolicyEvaluator {
        let store = Arc::new(FakeStore::default());
        *store.policies.lock().await = policies;
        SharePolicyEvaluator::new(store)
    }

    #[tokio::test]
    async fn no_policies_means_manual_review() {
        let evaluator = evaluator_with(Vec::new()).await;

        let approved = evaluator
            .should_auto_approve(
                TopicId::new(),
                WorkspaceId::new(),
                WorkspaceId::new(),
                AccessLevel::Read,
            )
            .await;

        assert_eq!(approved.ok(), Some(false));
    }

    #[tokio::test]
    async fn read_only_allow_list_policy_matches_listed_workspace_only() {
        let owner = WorkspaceId::new();
        let listed = WorkspaceId::new();
        let unlisted = WorkspaceId::new();
        let evaluator = evaluator_with(vec![policy(
            Some(owner),
            10,
            true,
            vec![AccessLevel::Read],
            vec![listed],
        )])
        .await;

        let listed_read = evaluator
            .should_auto_approve(TopicId::new(), owner, listed, AccessLevel::Read)
            .await;
        let listed_write = evaluator
            .should_auto_approve(TopicId::new(), owner, listed, AccessLevel::Write)
            .await;
        let unlisted_read = evaluator
            .should_auto_approve(TopicId::new(), owner, unlisted, AccessLevel::Read)
            .await;

        assert_eq!(listed_read.ok(), Some(true));
        assert_eq!(listed_write.ok(), Some(false));
        assert_eq!(unlisted_read.ok(), Some(false));
    }

    #[tokio::test]
    async fn workspace_scoped_policy_wins_priority_tie() {
        let owner = WorkspaceId::new();
        let requester = WorkspaceId::new();
        let platform = policy(None, 5, true, Vec::new(), Vec::new());
        let scoped = policy(Some(owner), 5, true, Vec::new(), Vec::new());
        let scoped_id = scoped.id;
        let evaluator = evaluator_with(vec![platform, scoped]).await;

        let matched = evaluator
            .matching_policy(owner, requester, AccessLevel::ReadWrite)
            .await
            .unwrap_or_else(|error| panic!("evaluation: {error}"));

        assert_eq!(matched.map(|policy| policy.id), Some(scoped_id));
    }

    #[tokio::test]
    async fn higher_priority_match_wins_over_earlier_listed() {
        let owner = WorkspaceId::new();
        let requester = WorkspaceId::new();
        let low = policy(Some(owner), 1, true, Vec::new(), Vec::new());
        let high = policy(None, 50, true, vec![AccessLevel::Read], Vec::new());
        let high_id = high.id;
        let evaluator = evaluator_with(vec![low, high]).await;

        let matched = evaluator
            .matching_policy(owner, requester, AccessLevel::Read)
            .await
            .unwrap_or_else(|error| panic!("evaluation: {error}"));

        assert_eq!(matched.map(|policy| policy.id), Some(high_id));
    }

    #[tokio::test]
    async fn policies_of_other_workspaces_are_ignored() {
        let owner = WorkspaceId::new();
        let elsewhere = WorkspaceId::new();
        let evaluator =
            evaluator_with(vec![policy(Some(elsewhere), 100, true, Vec::new(), Vec::new())]).await;

        let approved = evaluator
            .should_auto_approve(TopicId::new(), owner, WorkspaceId::new(), AccessLevel::Read)
            .await;

        assert_eq!(approved.ok(), Some(false));
    }

    #[tokio::test]
    async fn non_auto_approving_policy_is_skipped() {
        let owner = WorkspaceId::new();
        let evaluator = evaluator_with(vec![
            policy(Some(owner), 100, false, Vec::new(), Vec::new()),
            policy(None, 1, true, Vec::new(), Vec::new()),
        ])
        .await;

        let approved = evaluator
            .should_auto_approve(
                TopicId::new(),
                owner,
                WorkspaceId::new(),
                AccessLevel::Write,
            )
            .await;

        assert_eq!(approved.ok(), Some(true));
    }
}
