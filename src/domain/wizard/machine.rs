//! WizardStateMachine - step navigation gated by per-step validation.

use super::{StepSequence, WizardError, WizardStep};
use crate::domain::foundation::{SessionStatus, StateMachine, ValidationError};

/// Source of the required-field checks for each step.
pub trait StepGate {
    /// Returns every validation failure for `step`; empty means the step passes.
    fn check(&self, step: WizardStep) -> Vec<ValidationError>;
}

/// Current step plus lifecycle status of a wizard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStateMachine {
    current: WizardStep,
    status: SessionStatus,
}

impl Default for WizardStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardStateMachine {
    /// Starts at the first step with an open session.
    pub fn new() -> Self {
        Self {
            current: StepSequence::first(),
            status: SessionStatus::Open,
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_final_step(&self) -> bool {
        StepSequence::is_last(self.current)
    }

    /// Advances one step if the current step's gate passes.
    ///
    /// On failure the step is unchanged. At the last step a passing gate
    /// leaves the step where it is.
    pub fn next(&mut self, gate: &impl StepGate) -> Result<WizardStep, WizardError> {
        self.ensure_open()?;
        let errors = gate.check(self.current);
        if !errors.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.current,
                errors,
            });
        }
        if let Some(next) = StepSequence::next(self.current) {
            self.current = next;
        }
        Ok(self.current)
    }

    /// Goes back one step, never past the first. Always allowed.
    pub fn prev(&mut self) -> WizardStep {
        if let Some(previous) = StepSequence::previous(self.current) {
            self.current = previous;
        }
        self.current
    }

    /// Checks that the session may be submitted now.
    ///
    /// Requires the final step and re-runs every step's gate in order,
    /// reporting the first step that fails.
    pub fn ensure_submittable(&self, gate: &impl StepGate) -> Result<(), WizardError> {
        self.ensure_open()?;
        if !self.is_final_step() {
            return Err(WizardError::NotAtFinalStep {
                current: self.current,
            });
        }
        for step in StepSequence::all() {
            let errors = gate.check(*step);
            if !errors.is_empty() {
                return Err(WizardError::StepIncomplete {
                    step: *step,
                    errors,
                });
            }
        }
        Ok(())
    }

    /// Marks the session submitted.
    pub fn mark_submitted(&mut self) -> Result<(), WizardError> {
        self.close(SessionStatus::Submitted)
    }

    /// Marks the session cancelled.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        self.close(SessionStatus::Cancelled)
    }

    fn close(&mut self, target: SessionStatus) -> Result<(), WizardError> {
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| WizardError::SessionClosed {
                status: self.status,
            })?;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(WizardError::SessionClosed {
                status: self.status,
            })
        }
    }
}
