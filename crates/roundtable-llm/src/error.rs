//! Error types for roundtable-llm

use thiserror::Error;

/// Provider adapter error type
#[derive(Debug, Error)]
pub enum Error {
    /// Connection, DNS or body-read failure
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx status from the provider
    #[error("api returned status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// Body was not the JSON shape the provider kind promises
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Shape parsed but carried no usable text
    #[error("empty response: {0}")]
    EmptyResponse(&'static str),

    /// Deadline exceeded
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// Every candidate endpoint was tried and none produced content
    #[error("all endpoints failed: {0}")]
    AllEndpointsFailed(String),

    /// HTTP client could not be constructed
    #[error("client error: {0}")]
    Client(String),
}

impl Error {
    /// Whether this error came from a deadline rather than the provider
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, deadline_ms: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout(deadline_ms)
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
