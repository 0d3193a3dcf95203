//! Engine - the debate turn scheduler
//!
//! This module runs each debate on its own task: participants speak in a
//! fixed round-robin order, every outcome is persisted then broadcast, and an
//! optional moderator interjects around and between turns.
//!
//! # Module Structure
//!
//! - `config`: Configuration types (EngineConfig, DebateRequest)
//! - `core`: DebateEngine struct and the live task registry
//! - `operations`: Entry points (start, stop, retry, ping, status)
//! - `process`: The debate task loop
//! - `moderator`: Moderator cues and their prompts
//! - `prompts`: Participant prompts
//! - `summary`: Final summary text
//! - `helpers`: Utility methods (emit, record, finish)

mod config;
mod core;
mod helpers;
mod moderator;
mod operations;
mod process;
mod prompts;
mod summary;


// Re-export public types
pub use config::{DebateRequest, EngineConfig};
pub use core::DebateEngine;
pub use moderator::ModeratorCue;
pub use prompts::{opening_prompt, round_prompt};
pub use summary::{final_summary, EMPTY_SUMMARY};
