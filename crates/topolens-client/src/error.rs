//! Client error types.
//!
//! [`ClientError`] is the single error type returned by every fallible
//! operation against an external subsystem. The two upstream variants map
//! directly onto the backend's error taxonomy: `Unavailable` for
//! transport-level failures (including timeouts) and `Rejected` for non-2xx
//! or error-bearing responses.

/// Error type for all subsystem client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The subsystem could not be reached (connect error, timeout, TLS).
    #[error("subsystem unreachable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The subsystem answered with a non-2xx status or an error payload.
    #[error("subsystem rejected request (status {status}): {message}")]
    Rejected {
        /// HTTP status (or the error code embedded in a 200 body).
        status: u16,
        /// Upstream error message or response body.
        message: String,
    },

    /// A 2xx response body was missing required fields.
    #[error("malformed subsystem response: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Malformed(e.to_string())
    }
}

impl ClientError {
    /// The upstream HTTP status, when one was observed.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
