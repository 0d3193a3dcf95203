//! Trait for debate storage backends

use crate::error::Result;
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus};

/// Trait for debate storage backends
///
/// Every write is durable once the future resolves, and logs for one
/// discussion come back in insertion order.
#[async_trait::async_trait]
pub trait DebateStore: Send + Sync {
    /// Fetch one agent
    async fn get_agent(&self, id: i64) -> Result<Agent>;

    /// All agents, newest first
    async fn list_agents(&self) -> Result<Vec<Agent>>;

    /// Store a new agent; the returned copy carries its id
    async fn insert_agent(&self, agent: Agent) -> Result<Agent>;

    /// Replace an agent's settings
    async fn update_agent(&self, agent: &Agent) -> Result<Agent>;

    /// Remove an agent together with its log entries
    async fn delete_agent(&self, id: i64) -> Result<()>;

    /// Store a new discussion; the returned copy carries its id
    async fn insert_discussion(&self, discussion: Discussion) -> Result<Discussion>;

    /// Persist a discussion's mutable fields.
    ///
    /// Refuses to move a terminal status anywhere else.
    async fn update_discussion(&self, discussion: &Discussion) -> Result<Discussion>;

    /// Move a running discussion to a terminal status in one step.
    ///
    /// Fails with `NotRunning` when the discussion already left `running`,
    /// so of two concurrent callers only one succeeds.
    async fn close_discussion(&self, id: i64, status: DiscussionStatus) -> Result<Discussion>;

    /// Fetch one discussion
    async fn get_discussion(&self, id: i64) -> Result<Discussion>;

    /// All discussions, newest first
    async fn list_discussions(&self) -> Result<Vec<Discussion>>;

    /// Remove a discussion together with its log entries
    async fn delete_discussion(&self, id: i64) -> Result<()>;

    /// Append a turn log entry; the returned copy carries its id
    async fn insert_discussion_log(&self, log: DiscussionLog) -> Result<DiscussionLog>;

    /// A discussion's log entries in insertion order
    async fn list_discussion_logs(&self, discussion_id: i64) -> Result<Vec<DiscussionLog>>;

    /// Backend name (for logging)
    fn name(&self) -> &str;
}
