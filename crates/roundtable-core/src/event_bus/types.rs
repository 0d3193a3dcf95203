use crate::models::{Discussion, DiscussionLog};
use serde::{Deserialize, Serialize};

/// A live update about one discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscussionEvent {
    /// A turn log entry was stored
    Log(DiscussionLog),
    /// The discussion record changed (stop, completion, failure)
    Discussion(Discussion),
}

impl DiscussionEvent {
    /// Discussion the event belongs to
    #[must_use]
    pub fn discussion_id(&self) -> i64 {
        match self {
            Self::Log(log) => log.discussion_id,
            Self::Discussion(discussion) => discussion.id,
        }
    }

    /// Short name, used as the SSE event name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Log(_) => "log",
            Self::Discussion(_) => "discussion",
        }
    }

    /// Whether this event announces the end of the debate
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Discussion(d) if d.status.is_terminal())
    }
}
