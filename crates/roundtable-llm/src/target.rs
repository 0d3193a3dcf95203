//! The per-agent view the adapter needs to reach a provider

use crate::client::DEADLINE_BUFFER;
use crate::kind::ProviderKind;
use crate::util::mask_api_key;
use std::fmt;
use std::time::Duration;

/// Everything needed to call one agent's provider.
#[derive(Clone)]
pub struct ProviderTarget {
    /// Display name, used in logs
    pub name: String,
    /// Explicitly configured kind, `None` for legacy records
    pub kind: Option<ProviderKind>,
    /// Base endpoint as configured
    pub base_url: String,
    /// Credential, omitted from headers when absent or blank
    pub api_token: Option<String>,
    /// Model identifier sent in the request body
    pub model: String,
    /// Configured response deadline in seconds
    pub timeout_secs: u64,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for ProviderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTarget")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_deref().map(mask_api_key))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderTarget {
    /// Create a target with no credential and a 30 second deadline
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: None,
            base_url: base_url.into(),
            api_token: None,
            model: model.into(),
            timeout_secs: 30,
        }
    }

    /// Set the provider kind explicitly
    #[must_use]
    pub fn with_kind(mut self, kind: ProviderKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the credential
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the response deadline
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Effective provider kind
    #[must_use]
    pub fn resolved_kind(&self) -> ProviderKind {
        ProviderKind::resolve(self.kind, &self.base_url)
    }

    /// Base URL without surrounding whitespace or a trailing slash
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Non-blank credential, if any
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Per-call deadline: the configured timeout plus the fixed buffer
    #[must_use]
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs) + DEADLINE_BUFFER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_includes_buffer() {
        let target = ProviderTarget::new("a", "http://x", "m").with_timeout_secs(20);
        assert_eq!(target.deadline(), Duration::from_secs(30));
    }

    #[test]
    fn test_blank_token_is_absent() {
        let target = ProviderTarget::new("a", "http://x", "m").with_token("   ");
        assert!(target.token().is_none());
        let target = target.with_token(" sk-abc ");
        assert_eq!(target.token(), Some("sk-abc"));
    }

    #[test]
    fn test_base_trims_slash() {
        let target = ProviderTarget::new("a", " http://host:8000/v1/ ", "m");
        assert_eq!(target.base(), "http://host:8000/v1");
    }

    #[test]
    fn test_debug_masks_token() {
        let target =
            ProviderTarget::new("a", "http://x", "m").with_token("sk-1234567890abcdefghij");
        let debug = format!("{:?}", target);
        assert!(!debug.contains("567890"));
        assert!(debug.contains("sk-1...ghij"));
    }
}
