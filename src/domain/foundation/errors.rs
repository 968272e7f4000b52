//! Error types for the domain layer.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Local, synchronous validation failures.
///
/// These block a step transition or a submission and are shown next to the
/// offending field. They never leave the wizard boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("End date {end} must be after start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("At least one bi-week must be selected")]
    EmptySlotSelection,

    #[error("At least one resource must be selected")]
    EmptySelection,

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Bi-week '{slot_id}' is not in the loaded calendar")]
    UnknownSlot { slot_id: String },
}

impl ValidationError {
    /// Creates a missing field validation error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        ValidationError::MissingField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown slot validation error.
    pub fn unknown_slot(slot_id: impl fmt::Display) -> Self {
        ValidationError::UnknownSlot {
            slot_id: slot_id.to_string(),
        }
    }

    /// The logical field this error should be rendered next to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::InvalidRange { .. } => "end_date",
            ValidationError::EmptySlotSelection | ValidationError::UnknownSlot { .. } => {
                "bi_week_ids"
            }
            ValidationError::EmptySelection => "resource_ids",
        }
    }

    /// Maps the error onto the shared error code vocabulary.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingField { .. } => ErrorCode::MissingField,
            ValidationError::InvalidRange { .. } => ErrorCode::InvalidRange,
            ValidationError::EmptySlotSelection => ErrorCode::EmptySlotSelection,
            ValidationError::EmptySelection => ErrorCode::EmptySelection,
            ValidationError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            ValidationError::UnknownSlot { .. } => ErrorCode::UnknownSlot,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    MissingField,
    InvalidRange,
    EmptySlotSelection,
    EmptySelection,
    InvalidFormat,
    UnknownSlot,

    // State errors
    InvalidStateTransition,
    SessionClosed,

    // Collaborator errors
    FetchFailed,
    SubmissionRejected,

    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::InvalidRange => "INVALID_RANGE",
            ErrorCode::EmptySlotSelection => "EMPTY_SLOT_SELECTION",
            ErrorCode::EmptySelection => "EMPTY_SELECTION",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::UnknownSlot => "UNKNOWN_SLOT",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::SessionClosed => "SESSION_CLOSED",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::SubmissionRejected => "SUBMISSION_REJECTED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::new(err.code(), err.to_string()).with_detail("field", field)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
