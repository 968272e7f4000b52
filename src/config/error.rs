//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid API base URL format")]
    InvalidApiUrl,

    #[error("Invalid request timeout (must be 1..=300 seconds)")]
    InvalidTimeout,

    #[error("Invalid debounce delay (must be 50..=5000 ms)")]
    InvalidDebounce,

    #[error("Invalid calendar year")]
    InvalidCalendarYear,

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}
