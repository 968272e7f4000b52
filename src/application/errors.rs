//! Application-level errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};
use crate::domain::wizard::WizardError;
use crate::ports::SubmitError;

/// Errors returned by [`super::FormOrchestrator`] operations.
#[derive(Debug, Clone, Error)]
pub enum OrchestratorError {
    /// No session is open (never opened, submitted, or cancelled).
    #[error("no active wizard session")]
    NoActiveSession,

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ValidationError> for OrchestratorError {
    fn from(err: ValidationError) -> Self {
        OrchestratorError::Domain(err.into())
    }
}

impl OrchestratorError {
    /// Validation errors to render inline, if any.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        match self {
            OrchestratorError::Wizard(err) => err.validation_errors().to_vec(),
            _ => Vec::new(),
        }
    }
}
