//! SessionStatus enum for tracking the lifecycle of a wizard session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a wizard session.
///
/// A session starts `Open` and ends either `Submitted` (payload handed to the
/// persistence collaborator) or `Cancelled` (discarded, nothing emitted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Open,
    Submitted,
    Cancelled,
}

impl SessionStatus {
    /// Returns true if the session can still be edited.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::Open)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (Open, Submitted) | (Open, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Open => vec![Submitted, Cancelled],
            Submitted | Cancelled => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Open => "open",
            SessionStatus::Submitted => "submitted",
            SessionStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_open() {
        assert_eq!(SessionStatus::default(), SessionStatus::Open);
    }

    #[test]
    fn only_open_is_mutable() {
        assert!(SessionStatus::Open.is_mutable());
        assert!(!SessionStatus::Submitted.is_mutable());
        assert!(!SessionStatus::Cancelled.is_mutable());
    }

    #[test]
    fn open_can_be_submitted_or_cancelled() {
        assert!(SessionStatus::Open.can_transition_to(&SessionStatus::Submitted));
        assert!(SessionStatus::Open.can_transition_to(&SessionStatus::Cancelled));
    }

    #[test]
    fn closed_states_are_terminal() {
        assert!(SessionStatus::Submitted.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
        assert!(SessionStatus::Submitted
            .transition_to(SessionStatus::Open)
            .is_err());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [
            SessionStatus::Open,
            SessionStatus::Submitted,
            SessionStatus::Cancelled,
        ] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(format!("{}", SessionStatus::Submitted), "submitted");
    }
}
