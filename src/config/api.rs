//! Booking API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Remote booking API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the booking REST API (no trailing slash needed)
    pub base_url: String,

    /// Bearer token sent with every request
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API_BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidApiUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
