//! Roundtable Core - Debate Orchestration Engine
//!
//! This crate provides the core of Roundtable:
//! - Engine: round-robin turn scheduling with an optional moderator
//! - Transcript: the running context shown to each speaker
//! - Event bus: per-discussion live broadcast
//! - Store: persistence of agents, discussions and turn logs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod event_bus;
pub mod models;
pub mod store;
pub mod transcript;

pub use engine::{DebateEngine, DebateRequest, EngineConfig, ModeratorCue};
pub use error::{Error, Result};
pub use event_bus::{DiscussionBroadcaster, DiscussionEvent, Subscription};
pub use models::{Agent, Discussion, DiscussionLog, DiscussionStatus, LogStatus};
pub use store::{DebateStore, InMemoryStore, SqliteStore};
pub use transcript::{truncate_chars, Transcript};
