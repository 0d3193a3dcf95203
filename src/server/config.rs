//! Server configuration types
//!
//! Contains all configuration structures for the Roundtable server.

use roundtable_core::{store, EngineConfig};
use roundtable_llm::client::CLIENT_TIMEOUT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub engine: EngineAppConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file; empty means the default data directory
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    /// Resolved database file
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.trim().is_empty() {
            store::default_db_path()
        } else {
            PathBuf::from(self.path.trim())
        }
    }
}

/// Engine configuration (exposed to TOML)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineAppConfig {
    /// Rounds when a debate request does not say
    #[serde(default = "default_rounds")]
    pub default_rounds: u32,
    /// Language when a debate request does not say
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Length cap when a debate request does not say
    #[serde(default = "default_max_char_limit")]
    pub default_max_char_limit: usize,
    /// Per-listener buffer for live updates
    #[serde(default = "default_listener_buffer")]
    pub listener_buffer: usize,
    /// Outer HTTP client timeout; per-agent deadlines are usually shorter
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for EngineAppConfig {
    fn default() -> Self {
        Self {
            default_rounds: default_rounds(),
            default_language: default_language(),
            default_max_char_limit: default_max_char_limit(),
            listener_buffer: default_listener_buffer(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl EngineAppConfig {
    /// Engine defaults for the core crate
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_default_rounds(self.default_rounds)
            .with_default_language(self.default_language.clone())
            .with_default_max_char_limit(self.default_max_char_limit)
    }
}

fn default_rounds() -> u32 {
    roundtable_core::models::DEFAULT_MAX_ROUNDS
}
fn default_language() -> String {
    roundtable_core::models::DEFAULT_LANGUAGE.to_string()
}
fn default_max_char_limit() -> usize {
    roundtable_core::models::DEFAULT_MAX_CHAR_LIMIT
}
fn default_listener_buffer() -> usize {
    roundtable_core::event_bus::DEFAULT_LISTENER_BUFFER
}
fn default_http_timeout_secs() -> u64 {
    CLIENT_TIMEOUT.as_secs()
}
