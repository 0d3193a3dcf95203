//! Server module for Roundtable
//!
//! Contains the main server initialization and runtime logic.
//!
//! # Module Structure
//!
//! - `config`: Configuration structures
//! - `loader`: Configuration loading from files and environment
//! - `init`: Engine wiring and the HTTP run loop

pub mod config;
mod init;
mod loader;

// Re-export public API
pub use init::{app, build_engine, run};
pub use loader::load_config;
