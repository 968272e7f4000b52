//! Application layer - orchestration of the booking wizard.
//!
//! - `FormOrchestrator` - Session, catalog, availability, and navigation
//! - `Debouncer` - Quiet-period trigger for text-filter edits

mod debounce;
mod errors;
mod form_orchestrator;

pub use debounce::Debouncer;
pub use errors::OrchestratorError;
pub use form_orchestrator::{
    FormOrchestrator, OrchestratorEvent, OrchestratorPorts, OrchestratorSettings,
};
