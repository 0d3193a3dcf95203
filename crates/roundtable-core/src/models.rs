//! Data model: agents, discussions and their turn logs

use chrono::{DateTime, Utc};
use roundtable_llm::util::mask_api_key;
use roundtable_llm::{ProviderKind, ProviderTarget};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-agent response timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of rounds when none is requested
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// Default response language
pub const DEFAULT_LANGUAGE: &str = "English";

/// Default response length cap in characters
pub const DEFAULT_MAX_CHAR_LIMIT: usize = 2000;

// ============================================================================
// Agent
// ============================================================================

/// A configured responder behind some provider API.
#[derive(Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Store-assigned id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Configured provider kind, `None` for legacy records
    pub provider_type: Option<ProviderKind>,
    /// Base endpoint
    pub provider_url: String,
    /// Credential
    pub api_token: Option<String>,
    /// Model identifier
    pub model_name: String,
    /// Response deadline before the fixed buffer is added
    pub timeout_seconds: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

// SECURITY: Custom Debug implementation to mask API key
impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("provider_type", &self.provider_type)
            .field("provider_url", &self.provider_url)
            .field("api_token", &self.api_token.as_deref().map(mask_api_key))
            .field("model_name", &self.model_name)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// New, not yet stored agent
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        provider_url: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            provider_type: None,
            provider_url: provider_url.into(),
            api_token: None,
            model_name: model_name.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the provider kind
    #[must_use]
    pub fn with_kind(mut self, kind: ProviderKind) -> Self {
        self.provider_type = Some(kind);
        self
    }

    /// Set the credential
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the response timeout
    #[must_use]
    pub fn with_timeout_seconds(mut self, secs: u64) -> Self {
        self.timeout_seconds = secs;
        self
    }

    /// Effective provider kind
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        ProviderKind::resolve(self.provider_type, &self.provider_url)
    }

    /// What the adapter needs to reach this agent
    #[must_use]
    pub fn target(&self) -> ProviderTarget {
        let mut target = ProviderTarget::new(&self.name, &self.provider_url, &self.model_name)
            .with_timeout_secs(self.timeout_seconds);
        target.kind = self.provider_type;
        target.api_token = self.api_token.clone();
        target
    }

    /// Unsaved copy named `"<name> - Copy"`
    #[must_use]
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: format!("{} - Copy", self.name),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

// ============================================================================
// Discussion
// ============================================================================

/// Lifecycle state of a discussion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscussionStatus {
    /// Debate task is live
    Running,
    /// Finished normally or stopped
    Completed,
    /// Aborted by a runtime fault
    Failed,
}

impl DiscussionStatus {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Check if the status is terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Status only moves forward: running to a terminal state. Staying put is
    /// allowed so other fields can be updated.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        *self == next || (*self == Self::Running && next.is_terminal())
    }
}

impl fmt::Display for DiscussionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DiscussionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("unknown discussion status: {s}")),
        }
    }
}

/// A debate session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discussion {
    /// Store-assigned id
    pub id: i64,
    /// What is being debated
    pub topic: String,
    /// Participants in speaking order; duplicates speak twice
    pub agent_ids: Vec<i64>,
    /// Optional moderator
    pub moderator_id: Option<i64>,
    /// Lifecycle state
    pub status: DiscussionStatus,
    /// Round cap
    pub max_rounds: u32,
    /// Response language tag
    pub language: String,
    /// Response length cap in characters
    pub max_char_limit: usize,
    /// Filled in when the debate finishes
    pub final_summary: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Discussion {
    /// New running discussion with default parameters
    #[must_use]
    pub fn new(topic: impl Into<String>, agent_ids: Vec<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            topic: topic.into(),
            agent_ids,
            moderator_id: None,
            status: DiscussionStatus::Running,
            max_rounds: DEFAULT_MAX_ROUNDS,
            language: DEFAULT_LANGUAGE.to_string(),
            max_char_limit: DEFAULT_MAX_CHAR_LIMIT,
            final_summary: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the debate is still live
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == DiscussionStatus::Running
    }
}

// ============================================================================
// Turn log
// ============================================================================

/// Outcome of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    /// Usable content was produced
    Success,
    /// Call failed
    Error,
    /// Call exceeded its deadline
    Timeout,
}

impl LogStatus {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "timeout" => Ok(Self::Timeout),
            _ => Err(format!("unknown log status: {s}")),
        }
    }
}

/// One turn's record. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionLog {
    /// Store-assigned id
    pub id: i64,
    /// Owning discussion
    pub discussion_id: i64,
    /// Speaker
    pub agent_id: i64,
    /// Response text (possibly truncated) or failure description
    pub content: String,
    /// Turn outcome
    pub status: LogStatus,
    /// Adapter-reported latency
    pub response_time_ms: u64,
    /// Whether the speaker acted as moderator
    pub is_moderator: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl DiscussionLog {
    /// New, not yet stored participant entry
    #[must_use]
    pub fn new(
        discussion_id: i64,
        agent_id: i64,
        status: LogStatus,
        content: impl Into<String>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            id: 0,
            discussion_id,
            agent_id,
            content: content.into(),
            status,
            response_time_ms,
            is_moderator: false,
            created_at: Utc::now(),
        }
    }

    /// Mark the entry as a moderator interjection
    #[must_use]
    pub fn as_moderator(mut self) -> Self {
        self.is_moderator = true;
        self
    }

    /// Whether the turn produced usable content
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == LogStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use DiscussionStatus::*;
        assert!(Running.can_transition_to(Completed));
        assert!(Running.can_transition_to(Failed));
        assert!(Completed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Running));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Completed));
    }

    #[test]
    fn test_status_strings() {
        for status in [
            DiscussionStatus::Running,
            DiscussionStatus::Completed,
            DiscussionStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<DiscussionStatus>().unwrap(), status);
        }
        assert!("paused".parse::<DiscussionStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&LogStatus::Timeout).unwrap(),
            "\"timeout\""
        );
    }

    #[test]
    fn test_agent_target() {
        let agent = Agent::new("Skeptic", "https://api.openai.com/v1", "gpt-4o")
            .with_token("sk-test")
            .with_timeout_seconds(45);
        let target = agent.target();
        assert_eq!(target.name, "Skeptic");
        assert_eq!(target.resolved_kind(), ProviderKind::OpenAi);
        assert_eq!(target.token(), Some("sk-test"));
        assert_eq!(target.timeout_secs, 45);
    }

    #[test]
    fn test_agent_duplicate() {
        let mut agent = Agent::new("Skeptic", "http://h", "m").with_kind(ProviderKind::Custom);
        agent.id = 7;
        let copy = agent.duplicate();
        assert_eq!(copy.id, 0);
        assert_eq!(copy.name, "Skeptic - Copy");
        assert_eq!(copy.provider_type, Some(ProviderKind::Custom));
    }

    #[test]
    fn test_agent_debug_masks_token() {
        let agent = Agent::new("a", "http://h", "m").with_token("sk-1234567890abcdefghij");
        assert!(!format!("{:?}", agent).contains("567890abc"));
    }
}
