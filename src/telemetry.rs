//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Builds the log filter: `RUST_LOG` wins over the configured directive.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed (e.g. by a test
/// harness or the embedding application); that is not an error.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);
    let result = match config.format {
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
    };
    result.is_ok()
}
