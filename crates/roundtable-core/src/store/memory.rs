//! InMemoryStore - map-backed debate storage
//!
//! Mirrors the SQLite backend's referential behaviour: deleting an agent
//! drops its log entries and clears it as moderator, deleting a discussion
//! drops its log entries.

use super::traits::DebateStore;
use crate::error::{Error, Result};
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus};
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    agents: BTreeMap<i64, Agent>,
    discussions: BTreeMap<i64, Discussion>,
    logs: Vec<DiscussionLog>,
    next_agent_id: i64,
    next_discussion_id: i64,
    next_log_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Debate store kept entirely in process memory
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DebateStore for InMemoryStore {
    async fn get_agent(&self, id: i64) -> Result<Agent> {
        self.state
            .read()
            .await
            .agents
            .get(&id)
            .cloned()
            .ok_or(Error::AgentNotFound(id))
    }

    async fn list_agents(&self) -> Result<Vec<Agent>> {
        let state = self.state.read().await;
        let mut agents: Vec<Agent> = state.agents.values().cloned().collect();
        agents.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(agents)
    }

    async fn insert_agent(&self, agent: Agent) -> Result<Agent> {
        let mut state = self.state.write().await;
        let stored = Agent {
            id: next_id(&mut state.next_agent_id),
            ..agent
        };
        state.agents.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_agent(&self, agent: &Agent) -> Result<Agent> {
        let mut state = self.state.write().await;
        let existing = state
            .agents
            .get_mut(&agent.id)
            .ok_or(Error::AgentNotFound(agent.id))?;
        *existing = Agent {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..agent.clone()
        };
        Ok(existing.clone())
    }

    async fn delete_agent(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        if state.agents.remove(&id).is_none() {
            return Err(Error::AgentNotFound(id));
        }
        state.logs.retain(|log| log.agent_id != id);
        for discussion in state.discussions.values_mut() {
            if discussion.moderator_id == Some(id) {
                discussion.moderator_id = None;
            }
        }
        Ok(())
    }

    async fn insert_discussion(&self, discussion: Discussion) -> Result<Discussion> {
        let mut state = self.state.write().await;
        let stored = Discussion {
            id: next_id(&mut state.next_discussion_id),
            ..discussion
        };
        state.discussions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_discussion(&self, discussion: &Discussion) -> Result<Discussion> {
        let mut state = self.state.write().await;
        let existing = state
            .discussions
            .get_mut(&discussion.id)
            .ok_or(Error::DiscussionNotFound(discussion.id))?;

        if !existing.status.can_transition_to(discussion.status) {
            return Err(Error::InvalidRequest(format!(
                "discussion {} cannot move from {} to {}",
                discussion.id, existing.status, discussion.status
            )));
        }

        *existing = Discussion {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..discussion.clone()
        };
        Ok(existing.clone())
    }

    async fn close_discussion(&self, id: i64, status: DiscussionStatus) -> Result<Discussion> {
        let mut state = self.state.write().await;
        let existing = state
            .discussions
            .get_mut(&id)
            .ok_or(Error::DiscussionNotFound(id))?;

        if !existing.is_running() {
            return Err(Error::NotRunning(id));
        }
        existing.status = status;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn get_discussion(&self, id: i64) -> Result<Discussion> {
        self.state
            .read()
            .await
            .discussions
            .get(&id)
            .cloned()
            .ok_or(Error::DiscussionNotFound(id))
    }

    async fn list_discussions(&self) -> Result<Vec<Discussion>> {
        let state = self.state.read().await;
        let mut discussions: Vec<Discussion> = state.discussions.values().cloned().collect();
        discussions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(discussions)
    }

    async fn delete_discussion(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        if state.discussions.remove(&id).is_none() {
            return Err(Error::DiscussionNotFound(id));
        }
        state.logs.retain(|log| log.discussion_id != id);
        Ok(())
    }

    async fn insert_discussion_log(&self, log: DiscussionLog) -> Result<DiscussionLog> {
        let mut state = self.state.write().await;
        if !state.discussions.contains_key(&log.discussion_id) {
            return Err(Error::DiscussionNotFound(log.discussion_id));
        }
        if !state.agents.contains_key(&log.agent_id) {
            return Err(Error::AgentNotFound(log.agent_id));
        }
        let stored = DiscussionLog {
            id: next_id(&mut state.next_log_id),
            ..log
        };
        state.logs.push(stored.clone());
        Ok(stored)
    }

    async fn list_discussion_logs(&self, discussion_id: i64) -> Result<Vec<DiscussionLog>> {
        Ok(self
            .state
            .read()
            .await
            .logs
            .iter()
            .filter(|log| log.discussion_id == discussion_id)
            .cloned()
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
