//! WizardSession - the mutable state of one booking wizard run.

use serde::Deserialize;

use super::{
    BookingPayload, ClientFields, StepGate, ValueFields, WizardError, WizardStateMachine,
    WizardStep,
};
use crate::domain::foundation::{BookingId, ResourceId, SessionId, SessionStatus, ValidationError};
use crate::domain::period::{LegacyPeriod, Period};
use crate::domain::selection::SelectionSet;

/// Everything the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub period: Period,
    pub selection: SelectionSet,
    pub client: ClientFields,
    pub values: ValueFields,
}

impl StepGate for BookingDraft {
    fn check(&self, step: WizardStep) -> Vec<ValidationError> {
        match step {
            WizardStep::ClientPeriod => {
                let mut errors = self.client.validate();
                if let Err(err) = self.period.validate() {
                    errors.push(err);
                }
                errors
            }
            WizardStep::Resources => {
                if self.selection.is_empty() {
                    vec![ValidationError::EmptySelection]
                } else {
                    Vec::new()
                }
            }
            WizardStep::Values => self.values.validate(),
        }
    }
}

/// Data an existing booking is opened with (edit mode).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialBooking {
    pub booking_id: Option<BookingId>,
    #[serde(flatten)]
    pub client: ClientFields,
    #[serde(flatten)]
    pub values: ValueFields,
    #[serde(flatten)]
    pub period: LegacyPeriod,
    #[serde(default)]
    pub resource_ids: Vec<ResourceId>,
}

/// One run of the wizard from open to submit or cancel.
#[derive(Debug, Clone)]
pub struct WizardSession {
    id: SessionId,
    machine: WizardStateMachine,
    draft: BookingDraft,
    editing: Option<BookingId>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    /// A fresh session for a new booking.
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            machine: WizardStateMachine::new(),
            draft: BookingDraft::default(),
            editing: None,
        }
    }

    /// A session pre-seeded from an existing booking.
    pub fn from_initial(initial: &InitialBooking) -> Self {
        Self {
            id: SessionId::new(),
            machine: WizardStateMachine::new(),
            draft: BookingDraft {
                period: Period::from_legacy(&initial.period),
                selection: SelectionSet::with_ids(initial.resource_ids.iter().cloned()),
                client: initial.client.clone(),
                values: initial.values.clone(),
            },
            editing: initial.booking_id.clone(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn current_step(&self) -> WizardStep {
        self.machine.current()
    }

    pub fn status(&self) -> SessionStatus {
        self.machine.status()
    }

    /// The booking being edited, if any.
    pub fn editing(&self) -> Option<&BookingId> {
        self.editing.as_ref()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    /// Mutable access to the draft while the session is open.
    pub fn draft_mut(&mut self) -> Result<&mut BookingDraft, WizardError> {
        if !self.machine.status().is_mutable() {
            return Err(WizardError::SessionClosed {
                status: self.machine.status(),
            });
        }
        Ok(&mut self.draft)
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.machine.next(&self.draft)
    }

    pub fn prev(&mut self) -> WizardStep {
        self.machine.prev()
    }

    /// Validation failures of a single step, for inline display.
    pub fn step_errors(&self, step: WizardStep) -> Vec<ValidationError> {
        self.draft.check(step)
    }

    /// Builds the payload if the session can be submitted.
    pub fn prepare_submission(&self) -> Result<BookingPayload, WizardError> {
        self.machine.ensure_submittable(&self.draft)?;
        BookingPayload::assemble(
            &self.draft.period,
            &self.draft.selection,
            &self.draft.client,
            &self.draft.values,
        )
        .map_err(|err| WizardError::StepIncomplete {
            step: self.machine.current(),
            errors: vec![err],
        })
    }

    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        self.machine.mark_submitted()
    }

    pub fn cancel(&mut self) -> Result<(), WizardError> {
        self.machine.cancel()
    }
}
