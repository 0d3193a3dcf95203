//! Error types for roundtable-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Participant id did not resolve
    #[error("agent not found: {0}")]
    AgentNotFound(i64),

    /// Moderator id did not resolve
    #[error("moderator not found: {0}")]
    ModeratorNotFound(i64),

    /// Discussion id did not resolve
    #[error("discussion not found: {0}")]
    DiscussionNotFound(i64),

    /// Operation requires a running discussion
    #[error("discussion {0} is not running")]
    NotRunning(i64),

    /// A debate task is already live for this discussion
    #[error("discussion {0} is already running")]
    AlreadyRunning(i64),

    /// Rejected request parameters
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Persistence failure
    #[error("store error: {0}")]
    Store(String),

    /// Provider adapter error
    #[error("llm error: {0}")]
    Llm(#[from] roundtable_llm::Error),

    /// Internal error (task join, serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error refers to a missing entity
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AgentNotFound(_) | Self::ModeratorNotFound(_) | Self::DiscussionNotFound(_)
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
