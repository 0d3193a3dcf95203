//! Engine configuration
//!
//! Contains configuration types for the debate engine:
//! - `EngineConfig` for engine-wide defaults
//! - `DebateRequest` for starting one debate

use crate::error::{Error, Result};
use crate::models::{Discussion, DEFAULT_LANGUAGE, DEFAULT_MAX_CHAR_LIMIT, DEFAULT_MAX_ROUNDS};
use serde::{Deserialize, Serialize};

/// Parameters for a new debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateRequest {
    /// What is being debated
    pub topic: String,
    /// Participants in speaking order
    pub agent_ids: Vec<i64>,
    /// Optional moderator
    #[serde(default)]
    pub moderator_id: Option<i64>,
    /// Round cap; zero or absent means the engine default
    #[serde(default)]
    pub max_rounds: Option<u32>,
    /// Response language; blank or absent means the engine default
    #[serde(default)]
    pub language: Option<String>,
    /// Response length cap; zero or absent means the engine default
    #[serde(default)]
    pub max_char_limit: Option<usize>,
}

impl DebateRequest {
    /// Create a request with engine defaults for everything optional
    #[must_use]
    pub fn new(topic: impl Into<String>, agent_ids: Vec<i64>) -> Self {
        Self {
            topic: topic.into(),
            agent_ids,
            moderator_id: None,
            max_rounds: None,
            language: None,
            max_char_limit: None,
        }
    }

    /// Set the moderator
    #[must_use]
    pub fn with_moderator(mut self, moderator_id: i64) -> Self {
        self.moderator_id = Some(moderator_id);
        self
    }

    /// Set the round cap
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Set the response language
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set the response length cap
    #[must_use]
    pub fn with_max_char_limit(mut self, limit: usize) -> Self {
        self.max_char_limit = Some(limit);
        self
    }

    /// Check the request shape (ids are resolved separately)
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidRequest("topic is required".to_string()));
        }
        if self.agent_ids.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one agent is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the running discussion record, filling in defaults
    pub(crate) fn into_discussion(self, config: &EngineConfig) -> Discussion {
        let mut discussion = Discussion::new(self.topic.trim(), self.agent_ids);
        discussion.moderator_id = self.moderator_id;
        discussion.max_rounds = self
            .max_rounds
            .filter(|r| *r > 0)
            .unwrap_or(config.default_rounds);
        discussion.language = self
            .language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| config.default_language.clone());
        discussion.max_char_limit = self
            .max_char_limit
            .filter(|l| *l > 0)
            .unwrap_or(config.default_max_char_limit);
        discussion
    }
}

/// Engine-wide defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rounds when a request does not say
    pub default_rounds: u32,
    /// Language when a request does not say
    pub default_language: String,
    /// Length cap when a request does not say
    pub default_max_char_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_rounds: DEFAULT_MAX_ROUNDS,
            default_language: DEFAULT_LANGUAGE.to_string(),
            default_max_char_limit: DEFAULT_MAX_CHAR_LIMIT,
        }
    }

    /// Set the default round count (zero keeps the built-in default)
    #[must_use]
    pub fn with_default_rounds(mut self, rounds: u32) -> Self {
        if rounds > 0 {
            self.default_rounds = rounds;
        }
        self
    }

    /// Set the default language
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Set the default length cap (zero keeps the built-in default)
    #[must_use]
    pub fn with_default_max_char_limit(mut self, limit: usize) -> Self {
        if limit > 0 {
            self.default_max_char_limit = limit;
        }
        self
    }
}
