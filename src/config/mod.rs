//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLACEMENT_BOOKING` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use placement_booking::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Booking API at {}", config.api.base_url);
//! ```

mod api;
mod error;
mod logging;
mod wizard;

pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use wizard::WizardConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote booking API (availability, catalog, calendar, submission)
    pub api: ApiConfig,

    /// Wizard tuning (debounce, calendar year)
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLACEMENT_BOOKING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLACEMENT_BOOKING__API__BASE_URL=...` -> `api.base_url = ...`
    /// - `PLACEMENT_BOOKING__WIZARD__DEBOUNCE_MS=250` -> `wizard.debounce_ms = 250`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLACEMENT_BOOKING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.api.validate()?;
        self.wizard.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
