//! Wizard - step-gated booking flow.
//!
//! - `step` - Step enum and ordering
//! - `machine` - Navigation state machine and the `StepGate` seam
//! - `session` - Draft data, edit-mode seeding, and submission
//! - `payload` - The submission contract

mod errors;
mod fields;
mod machine;
mod payload;
mod session;
mod step;

pub use errors::WizardError;
pub use fields::{ClientFields, ValueFields};
pub use machine::{StepGate, WizardStateMachine};
pub use payload::BookingPayload;
pub use session::{BookingDraft, InitialBooking, WizardSession};
pub use step::{StepSequence, WizardStep};
