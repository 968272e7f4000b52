//! Booking wizard behaviour configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Wizard tuning
#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    /// Quiet period after a text-filter edit before availability is refetched
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Year whose bi-week calendar is loaded when a session opens.
    /// Defaults to the current year.
    pub calendar_year: Option<i32>,
}

impl WizardConfig {
    /// Get the debounce delay as Duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Validate wizard configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(50..=5000).contains(&self.debounce_ms) {
            return Err(ValidationError::InvalidDebounce);
        }
        if let Some(year) = self.calendar_year {
            if !(2000..=2100).contains(&year) {
                return Err(ValidationError::InvalidCalendarYear);
            }
        }
        Ok(())
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            calendar_year: None,
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}
