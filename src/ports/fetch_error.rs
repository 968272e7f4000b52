//! Errors shared by the remote data ports.

/// Failure of a remote read (availability, catalog, or calendar).
///
/// Every variant is recoverable: callers surface it once and keep their
/// previous state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The server answered with a non-success status.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },

    /// The server refused the credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The response body could not be decoded into domain types.
    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Returns true if retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network(_) | FetchError::Timeout { .. } => true,
            FetchError::Server { status, .. } => *status >= 500,
            FetchError::Unauthorized | FetchError::Decode(_) => false,
        }
    }
}

/// Failure of a booking submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The server validated the payload and refused it.
    #[error("booking rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Transport-level failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
