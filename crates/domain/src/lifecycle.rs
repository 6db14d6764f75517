use orbit_core::{AppError, AppResult};

/// Status enum governed by an explicit transition table.
pub trait LifecycleStatus: Copy + PartialEq + Sized + 'static {
    /// Resource label used in transition errors.
    const RESOURCE: &'static str;

    /// Returns the statuses reachable from `self` in one step.
    fn allowed_transitions(&self) -> &'static [Self];

    /// Returns a stable storage value for the status.
    fn as_str(&self) -> &'static str;

    /// Returns whether `next` is reachable from `self` in one step.
    fn can_transition_to(&self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Validates a transition against the table and returns the next status.
    fn transition_to(&self, next: Self) -> AppResult<Self> {
        if self.can_transition_to(next) {
            return Ok(next);
        }

        Err(AppError::Conflict(format!(
            "{} cannot transition from '{}' to '{}'",
            Self::RESOURCE,
            self.as_str(),
            next.as_str()
        )))
    }
}
