//! Event broadcaster - per-discussion fan-out of live debate updates.
//!
//! The debate task publishes every stored log entry and the final discussion
//! record; SSE streams and other viewers subscribe per discussion id.

/// Listener registry and fan-out.
pub mod bus;
/// Event type definitions.
pub mod types;

pub use bus::{DiscussionBroadcaster, Subscription, DEFAULT_LISTENER_BUFFER};
pub use types::DiscussionEvent;

#[cfg(test)]
mod tests;
