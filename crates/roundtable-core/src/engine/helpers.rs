//! Engine helper methods
//!
//! Contains utility methods for the DebateEngine:
//! - Event emission
//! - Persist-then-broadcast of log entries
//! - Terminal discussion updates

use crate::error::{Error, Result};
use crate::event_bus::DiscussionEvent;
use crate::models::{Discussion, DiscussionLog, DiscussionStatus};
use chrono::Utc;
use tracing::{debug, warn};

use super::core::DebateEngine;

impl DebateEngine {
    /// Publish an event to every listener of its discussion.
    pub(crate) async fn emit(&self, event: DiscussionEvent) {
        let discussion_id = event.discussion_id();
        let kind = event.name();
        let delivered = self.broadcaster.broadcast(event).await;
        debug!(discussion_id, kind, delivered, "event broadcast");
    }

    /// Store a log entry, then broadcast the stored record.
    ///
    /// A failed write is logged and nothing is broadcast; the debate carries on.
    pub(crate) async fn record(&self, log: DiscussionLog) -> Option<DiscussionLog> {
        let discussion_id = log.discussion_id;
        match self.store.insert_discussion_log(log).await {
            Ok(stored) => {
                self.emit(DiscussionEvent::Log(stored.clone())).await;
                Some(stored)
            }
            Err(e) => {
                warn!(discussion_id, error = %e, "Failed to save discussion log");
                None
            }
        }
    }

    /// Write the terminal state of a debate and broadcast it.
    ///
    /// A discussion that already left `running` (stopped from outside) keeps
    /// its status; only the summary is filled in.
    pub(crate) async fn finish(
        &self,
        discussion_id: i64,
        status: DiscussionStatus,
        summary: Option<String>,
    ) -> Result<Discussion> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut discussion = self.store.get_discussion(discussion_id).await?;
            if discussion.is_running() {
                discussion.status = status;
            }
            if let Some(summary) = &summary {
                discussion.final_summary.clone_from(summary);
            }
            discussion.updated_at = Utc::now();

            match self.store.update_discussion(&discussion).await {
                Ok(updated) => {
                    self.emit(DiscussionEvent::Discussion(updated.clone())).await;
                    return Ok(updated);
                }
                // Stopped between the read and the write: re-read once
                Err(Error::InvalidRequest(_)) if attempts < 2 => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
