use super::types::DiscussionEvent;
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Per-listener buffer used when none is configured.
pub const DEFAULT_LISTENER_BUFFER: usize = 10;

struct Listener {
    id: Uuid,
    sender: mpsc::Sender<DiscussionEvent>,
}

/// Handle returned by [`DiscussionBroadcaster::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    /// Listener id, used to unsubscribe
    pub id: Uuid,
    /// Discussion being followed
    pub discussion_id: i64,
    /// Incoming events
    pub receiver: mpsc::Receiver<DiscussionEvent>,
}

/// Registry of live listeners, keyed by discussion id.
///
/// Fan-out holds the read lock and never waits: each listener has a bounded
/// buffer, and an event that does not fit is dropped for that listener only.
/// Subscribe and unsubscribe take the write lock.
pub struct DiscussionBroadcaster {
    listeners: RwLock<HashMap<i64, Vec<Listener>>>,
    buffer: usize,
}

impl DiscussionBroadcaster {
    /// Create a broadcaster with the given per-listener buffer (minimum 1).
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            buffer: buffer.max(1),
        }
    }

    /// Per-listener buffer size
    #[must_use]
    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Start following a discussion.
    ///
    /// Listeners whose receivers were dropped are pruned here.
    pub async fn subscribe(&self, discussion_id: i64) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();

        let mut listeners = self.listeners.write().await;
        let entry = listeners.entry(discussion_id).or_default();
        entry.retain(|l| !l.sender.is_closed());
        entry.push(Listener { id, sender });
        debug!(discussion_id, listener_id = %id, total = entry.len(), "listener subscribed");

        Subscription {
            id,
            discussion_id,
            receiver,
        }
    }

    /// Stop following a discussion. Returns whether the listener was found.
    pub async fn unsubscribe(&self, discussion_id: i64, listener_id: Uuid) -> bool {
        let mut listeners = self.listeners.write().await;
        let Some(entry) = listeners.get_mut(&discussion_id) else {
            return false;
        };

        let before = entry.len();
        entry.retain(|l| l.id != listener_id);
        let removed = entry.len() < before;
        if entry.is_empty() {
            listeners.remove(&discussion_id);
        }

        if removed {
            debug!(discussion_id, %listener_id, "listener unsubscribed");
        }
        removed
    }

    /// Deliver an event to every listener of its discussion.
    ///
    /// Returns the number of listeners that accepted it.
    pub async fn broadcast(&self, event: DiscussionEvent) -> usize {
        let discussion_id = event.discussion_id();
        let listeners = self.listeners.read().await;
        let Some(entry) = listeners.get(&discussion_id) else {
            return 0;
        };

        let mut delivered = 0;
        for listener in entry {
            match listener.sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!(discussion_id, listener_id = %listener.id, "listener buffer full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Number of registered listeners for a discussion
    pub async fn listener_count(&self, discussion_id: i64) -> usize {
        self.listeners
            .read()
            .await
            .get(&discussion_id)
            .map_or(0, Vec::len)
    }
}

impl Default for DiscussionBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_LISTENER_BUFFER)
    }
}
