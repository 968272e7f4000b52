//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, lifecycle status, and error types
//! that form the vocabulary of the booking domain.

mod errors;
mod ids;
mod percentage;
mod session_status;
mod state_machine;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, ClientId, RegionId, ResourceId, SessionId};
pub use percentage::Percentage;
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
