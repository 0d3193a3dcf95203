//! The provider-agnostic adapter contract

use crate::error::Result;
use crate::target::ProviderTarget;
use serde::{Deserialize, Serialize};

/// Result of one adapter call.
///
/// Failures are values, not errors: the debate engine records them and
/// moves on to the next turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    /// Whether usable content was produced
    pub success: bool,
    /// Response text, empty on failure
    pub content: String,
    /// Human-readable failure reason
    pub error_detail: Option<String>,
    /// Wall-clock time around the network exchange
    pub latency_ms: u64,
    /// Set when the per-call deadline fired
    pub timed_out: bool,
}

impl CallOutcome {
    /// Successful call
    #[must_use]
    pub fn success(content: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            success: true,
            content: content.into(),
            error_detail: None,
            latency_ms,
            timed_out: false,
        }
    }

    /// Failed call
    #[must_use]
    pub fn failure(detail: impl Into<String>, latency_ms: u64, timed_out: bool) -> Self {
        Self {
            success: false,
            content: String::new(),
            error_detail: Some(detail.into()),
            latency_ms,
            timed_out,
        }
    }

    /// Failure detail, or an empty string
    #[must_use]
    pub fn detail(&self) -> &str {
        self.error_detail.as_deref().unwrap_or_default()
    }
}

/// Asks an agent a question, whatever API sits behind it.
#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send `prompt` with prior transcript `context` (may be empty)
    async fn call(&self, target: &ProviderTarget, prompt: &str, context: &str) -> CallOutcome;

    /// Cheap reachability probe
    async fn ping(&self, target: &ProviderTarget) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ok = CallOutcome::success("hi", 12);
        assert!(ok.success);
        assert_eq!(ok.detail(), "");

        let failed = CallOutcome::failure("boom", 40, true);
        assert!(!failed.success);
        assert!(failed.timed_out);
        assert!(failed.content.is_empty());
        assert_eq!(failed.detail(), "boom");
    }
}
