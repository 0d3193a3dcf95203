//! Engine entry points
//!
//! Everything the HTTP shell and CLI call: start, stop, retry, ping and
//! status. Precondition and validation failures are returned synchronously.

use crate::error::{Error, Result};
use crate::event_bus::DiscussionEvent;
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus, LogStatus};
use crate::transcript::truncate_chars;
use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::config::DebateRequest;
use super::core::DebateEngine;
use super::process::DebateRun;
use super::prompts::opening_prompt;

impl DebateEngine {
    /// Validate a request, persist a running discussion and start its task.
    ///
    /// Unknown participant or moderator ids are rejected before anything is
    /// written.
    pub async fn start_debate(&self, request: DebateRequest) -> Result<Discussion> {
        request.validate()?;

        let participants = self.resolve_participants(&request.agent_ids).await?;
        let moderator = match request.moderator_id {
            Some(id) => Some(self.store.get_agent(id).await.map_err(|e| match e {
                Error::AgentNotFound(_) => Error::ModeratorNotFound(id),
                other => other,
            })?),
            None => None,
        };

        let discussion = self
            .store
            .insert_discussion(request.into_discussion(&self.config))
            .await?;
        info!(
            discussion_id = discussion.id,
            topic = %discussion.topic,
            participants = participants.len(),
            "Discussion created"
        );

        self.spawn_debate(DebateRun {
            discussion: discussion.clone(),
            participants,
            moderator,
            cancel: CancellationToken::new(),
        })?;

        Ok(discussion)
    }

    /// Look up every participant concurrently, keeping request order.
    async fn resolve_participants(&self, ids: &[i64]) -> Result<Vec<Agent>> {
        try_join_all(ids.iter().map(|id| self.store.get_agent(*id))).await
    }

    /// Mark a running debate completed. The task finishes its in-flight turn
    /// and then stops.
    pub async fn stop_debate(&self, discussion_id: i64) -> Result<Discussion> {
        let updated = self
            .store
            .close_discussion(discussion_id, DiscussionStatus::Completed)
            .await?;

        self.cancel(discussion_id);
        self.emit(DiscussionEvent::Discussion(updated.clone())).await;
        info!(discussion_id, "Discussion stopped");
        Ok(updated)
    }

    /// Ask one participant again, with every successful entry so far as
    /// context, and append the result as a new log entry.
    pub async fn retry_participant(
        &self,
        discussion_id: i64,
        agent_id: i64,
    ) -> Result<DiscussionLog> {
        let discussion = self.store.get_discussion(discussion_id).await?;
        if !discussion.is_running() {
            return Err(Error::NotRunning(discussion_id));
        }
        let agent = self.store.get_agent(agent_id).await?;

        let context = self
            .store
            .list_discussion_logs(discussion_id)
            .await?
            .into_iter()
            .filter(DiscussionLog::is_success)
            .map(|log| log.content)
            .collect::<Vec<_>>()
            .join("\n\n");

        let outcome = self
            .adapter
            .call(&agent.target(), &opening_prompt(&discussion), &context)
            .await;

        let log = if outcome.success {
            DiscussionLog::new(
                discussion_id,
                agent_id,
                LogStatus::Success,
                truncate_chars(&outcome.content, discussion.max_char_limit),
                outcome.latency_ms,
            )
        } else {
            warn!(discussion_id, agent = %agent.name, error = %outcome.detail(), "Retry failed");
            let status = if outcome.timed_out {
                LogStatus::Timeout
            } else {
                LogStatus::Error
            };
            DiscussionLog::new(
                discussion_id,
                agent_id,
                status,
                format!("Retry failed: {}", outcome.detail()),
                outcome.latency_ms,
            )
        };

        let stored = self.store.insert_discussion_log(log).await?;
        self.emit(DiscussionEvent::Log(stored.clone())).await;
        Ok(stored)
    }

    /// Check that an agent's provider is reachable.
    pub async fn ping_participant(&self, agent_id: i64) -> Result<()> {
        let agent = self.store.get_agent(agent_id).await?;
        self.adapter.ping(&agent.target()).await?;
        Ok(())
    }

    /// Current discussion record and its log entries in insertion order.
    pub async fn get_status(&self, discussion_id: i64) -> Result<(Discussion, Vec<DiscussionLog>)> {
        let discussion = self.store.get_discussion(discussion_id).await?;
        let logs = self.store.list_discussion_logs(discussion_id).await?;
        Ok((discussion, logs))
    }

    /// Stop any live task for the discussion, then delete it with its logs.
    pub async fn delete_debate(&self, discussion_id: i64) -> Result<()> {
        self.cancel(discussion_id);
        self.store.delete_discussion(discussion_id).await?;
        info!(discussion_id, "Discussion deleted");
        Ok(())
    }
}
