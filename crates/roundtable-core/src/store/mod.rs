//! Store - persistence gateway for agents, discussions and turn logs
//!
//! The engine only sees [`DebateStore`]. Two backends are provided:
//! SQLite through sqlx for real deployments, and an in-memory map for tests
//! and throwaway runs.

mod helpers;
mod memory;
mod sqlite;
mod traits;

#[cfg(test)]
mod tests;

pub use helpers::{default_data_dir, default_db_path};
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::DebateStore;
