//! Engine core structure
//!
//! Contains the `DebateEngine` struct and the registry of live debate tasks.

use crate::error::{Error, Result};
use crate::event_bus::DiscussionBroadcaster;
use crate::store::DebateStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use roundtable_llm::ProviderAdapter;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::config::EngineConfig;

/// A debate task that is still live.
#[derive(Debug)]
pub(crate) struct ActiveDebate {
    pub(crate) handle: JoinHandle<()>,
    pub(crate) cancel: CancellationToken,
}

/// Drives debates: validates requests, runs one task per debate, and
/// answers stop/retry/ping/status calls.
///
/// Cloning is cheap; every clone shares the same store, adapter,
/// broadcaster and task registry.
#[derive(Clone)]
pub struct DebateEngine {
    pub(crate) store: Arc<dyn DebateStore>,
    pub(crate) adapter: Arc<dyn ProviderAdapter>,
    pub(crate) broadcaster: Arc<DiscussionBroadcaster>,
    pub(crate) config: EngineConfig,
    /// Live debate tasks keyed by discussion id
    pub(crate) active: Arc<DashMap<i64, ActiveDebate>>,
}

impl DebateEngine {
    /// Create a new engine
    #[must_use]
    pub fn new(
        store: Arc<dyn DebateStore>,
        adapter: Arc<dyn ProviderAdapter>,
        broadcaster: Arc<DiscussionBroadcaster>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            adapter,
            broadcaster,
            config,
            active: Arc::new(DashMap::new()),
        }
    }

    /// Persistence gateway
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DebateStore> {
        &self.store
    }

    /// Live update fan-out
    #[must_use]
    pub fn broadcaster(&self) -> &Arc<DiscussionBroadcaster> {
        &self.broadcaster
    }

    /// Engine defaults
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether a debate task is live for this discussion
    #[must_use]
    pub fn is_active(&self, discussion_id: i64) -> bool {
        self.active.contains_key(&discussion_id)
    }

    /// Number of live debate tasks
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Record a freshly spawned debate task. A second task for the same
    /// discussion is refused and aborted.
    pub(crate) fn register(&self, discussion_id: i64, debate: ActiveDebate) -> Result<()> {
        match self.active.entry(discussion_id) {
            Entry::Occupied(_) => {
                debate.cancel.cancel();
                debate.handle.abort();
                Err(Error::AlreadyRunning(discussion_id))
            }
            Entry::Vacant(slot) => {
                slot.insert(debate);
                Ok(())
            }
        }
    }

    /// Forget a finished debate task
    pub(crate) fn deregister(&self, discussion_id: i64) {
        self.active.remove(&discussion_id);
    }

    /// Ask a live debate task to stop after its in-flight turn
    pub(crate) fn cancel(&self, discussion_id: i64) {
        if let Some(debate) = self.active.get(&discussion_id) {
            debate.cancel.cancel();
        }
    }

    /// Cancel every live debate and wait for the tasks to wind down.
    pub async fn shutdown(&self) {
        let ids: Vec<i64> = self.active.iter().map(|e| *e.key()).collect();
        let mut handles = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some((_, debate)) = self.active.remove(&id) {
                debate.cancel.cancel();
                handles.push(debate.handle);
            }
        }
        for handle in handles {
            let _ = handle.await;
        }
    }
}

impl std::fmt::Debug for DebateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebateEngine")
            .field("store", &self.store.name())
            .field("config", &self.config)
            .field("active", &self.active.len())
            .finish_non_exhaustive()
    }
}
