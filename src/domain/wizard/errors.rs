//! Wizard error types.

use thiserror::Error;

use super::WizardStep;
use crate::domain::foundation::{DomainError, ErrorCode, SessionStatus, ValidationError};

/// Errors raised by wizard transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    /// The step's validation gate failed; the step did not change.
    #[error("Step '{step}' is incomplete ({} issue(s))", errors.len())]
    StepIncomplete {
        step: WizardStep,
        errors: Vec<ValidationError>,
    },

    /// Submission was attempted before reaching the final step.
    #[error("Submission is only possible from the last step, currently at '{current}'")]
    NotAtFinalStep { current: WizardStep },

    /// The session was already submitted or cancelled.
    #[error("Wizard session is {status}")]
    SessionClosed { status: SessionStatus },
}

impl WizardError {
    /// Validation errors to render inline, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            WizardError::StepIncomplete { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<WizardError> for DomainError {
    fn from(err: WizardError) -> Self {
        let code = match &err {
            WizardError::StepIncomplete { .. } => ErrorCode::ValidationFailed,
            WizardError::NotAtFinalStep { .. } => ErrorCode::InvalidStateTransition,
            WizardError::SessionClosed { .. } => ErrorCode::SessionClosed,
        };
        DomainError::new(code, err.to_string())
    }
}
