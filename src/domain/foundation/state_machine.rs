//! State machine trait for lifecycle status enums.

use super::{DomainError, ErrorCode};

/// Trait for status enums that represent state machines.
///
/// Implementors define the legal edges; callers get a checked
/// `transition_to` and a terminal-state query for free.
///
/// ```ignore
/// let closed = SessionStatus::Open.transition_to(SessionStatus::Submitted)?;
/// assert!(closed.is_terminal());
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
