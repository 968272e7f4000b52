//! WizardStep and StepSequence - ordering of the booking wizard.
//!
//! # Step Order
//!
//! 1. ClientPeriod → 2. Resources → 3. Values
//!
//! ```ignore
//! let next = StepSequence::next(WizardStep::ClientPeriod); // Some(Resources)
//! let prev = StepSequence::previous(WizardStep::ClientPeriod); // None
//! assert!(StepSequence::is_last(WizardStep::Values));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of the booking wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Client details and the booking window.
    ClientPeriod,
    /// Picking resources from the availability partition.
    Resources,
    /// Pricing and closing notes.
    Values,
}

impl WizardStep {
    /// 1-based step number as shown in the UI.
    pub fn number(&self) -> usize {
        StepSequence::order_index(*self) + 1
    }

    /// Looks a step up by its 1-based number.
    pub fn from_number(number: usize) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| StepSequence::ORDER.get(idx).copied())
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::ClientPeriod => "Client & Period",
            WizardStep::Resources => "Resources",
            WizardStep::Values => "Values",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Central location for step ordering logic.
pub struct StepSequence;

impl StepSequence {
    /// The canonical order of wizard steps.
    pub const ORDER: [WizardStep; 3] = [
        WizardStep::ClientPeriod,
        WizardStep::Resources,
        WizardStep::Values,
    ];

    pub fn all() -> &'static [WizardStep; 3] {
        &Self::ORDER
    }

    pub fn len() -> usize {
        Self::ORDER.len()
    }

    /// Returns the 0-based index of a step.
    #[inline]
    pub fn order_index(step: WizardStep) -> usize {
        match step {
            WizardStep::ClientPeriod => 0,
            WizardStep::Resources => 1,
            WizardStep::Values => 2,
        }
    }

    /// Returns the next step, or None at the end.
    pub fn next(step: WizardStep) -> Option<WizardStep> {
        Self::ORDER.get(Self::order_index(step) + 1).copied()
    }

    /// Returns the previous step, or None at the start.
    pub fn previous(step: WizardStep) -> Option<WizardStep> {
        Self::order_index(step)
            .checked_sub(1)
            .and_then(|idx| Self::ORDER.get(idx).copied())
    }

    /// Returns all steps up to and including `step`.
    pub fn steps_up_to(step: WizardStep) -> &'static [WizardStep] {
        &Self::ORDER[..=Self::order_index(step)]
    }

    pub fn first() -> WizardStep {
        Self::ORDER[0]
    }

    pub fn last() -> WizardStep {
        Self::ORDER[Self::ORDER.len() - 1]
    }

    pub fn is_first(step: WizardStep) -> bool {
        step == Self::first()
    }

    pub fn is_last(step: WizardStep) -> bool {
        step == Self::last()
    }
}
