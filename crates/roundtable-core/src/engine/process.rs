//! Debate task
//!
//! Contains the round-robin loop that runs on its own task:
//! - Task spawning and the failure boundary
//! - Participant turns
//! - Moderator interjections

use crate::error::Result;
use crate::models::{Agent, Discussion, DiscussionLog, DiscussionStatus, LogStatus};
use crate::transcript::{truncate_chars, Transcript};
use roundtable_llm::CallOutcome;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::core::{ActiveDebate, DebateEngine};
use super::moderator::ModeratorCue;
use super::prompts::turn_prompt;
use super::summary::final_summary;

/// Everything a debate task needs, resolved before it starts.
pub(crate) struct DebateRun {
    pub(crate) discussion: Discussion,
    pub(crate) participants: Vec<Agent>,
    pub(crate) moderator: Option<Agent>,
    pub(crate) cancel: CancellationToken,
}

impl DebateEngine {
    /// Spawn the debate task and record it in the live registry.
    ///
    /// The task waits until it is registered, so it can never deregister
    /// before the registry knows about it.
    pub(crate) fn spawn_debate(&self, run: DebateRun) -> Result<()> {
        let discussion_id = run.discussion.id;
        let cancel = run.cancel.clone();
        let (ready_tx, ready_rx) = oneshot::channel::<()>();

        let engine = self.clone();
        let handle = tokio::spawn(async move {
            if ready_rx.await.is_err() {
                return;
            }
            engine.supervise(run).await;
            engine.deregister(discussion_id);
        });

        self.register(discussion_id, ActiveDebate { handle, cancel })?;
        let _ = ready_tx.send(());
        Ok(())
    }

    /// Run the debate on an inner task and mark it failed if that task
    /// errors or panics.
    async fn supervise(&self, run: DebateRun) {
        let discussion_id = run.discussion.id;
        let engine = self.clone();
        let joined = tokio::spawn(async move { engine.run_debate(run).await }).await;

        let fault = match joined {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e.to_string(),
            Err(e) => format!("debate task panicked: {e}"),
        };

        error!(discussion_id, error = %fault, "Debate aborted");
        if let Err(e) = self
            .finish(discussion_id, DiscussionStatus::Failed, None)
            .await
        {
            warn!(discussion_id, error = %e, "Failed to mark debate as failed");
        }
    }

    /// The round-robin protocol.
    async fn run_debate(&self, run: DebateRun) -> Result<()> {
        let DebateRun {
            discussion,
            participants,
            moderator,
            cancel,
        } = run;

        let rounds = if discussion.max_rounds == 0 {
            self.config.default_rounds
        } else {
            discussion.max_rounds
        };
        let total = participants.len();
        let mut transcript = Transcript::new();

        info!(
            discussion_id = discussion.id,
            participants = total,
            moderator = moderator.as_ref().map(|m| m.name.as_str()),
            rounds,
            language = %discussion.language,
            max_chars = discussion.max_char_limit,
            "Starting debate"
        );

        if let Some(m) = &moderator {
            self.interject(&discussion, m, ModeratorCue::Opening, &mut transcript)
                .await;
        }

        'rounds: for round in 1..=rounds {
            debug!(discussion_id = discussion.id, round, "Starting round");
            let mut round_active = false;

            for (index, agent) in participants.iter().enumerate() {
                if cancel.is_cancelled() {
                    break 'rounds;
                }

                let outcome = self
                    .run_turn(&discussion, agent, round, index + 1, total, &mut transcript)
                    .await;
                round_active |= outcome.success;

                if let Some(m) = &moderator {
                    if index + 1 < total && !cancel.is_cancelled() {
                        let cue = ModeratorCue::Interim(outcome.content);
                        self.interject(&discussion, m, cue, &mut transcript).await;
                    }
                }
            }

            if cancel.is_cancelled() {
                break;
            }

            if let Some(m) = &moderator {
                self.interject(&discussion, m, ModeratorCue::RoundSummary(round), &mut transcript)
                    .await;
            }

            if !round_active {
                info!(discussion_id = discussion.id, round, "No successful responses in round, ending debate");
                break;
            }
        }

        if cancel.is_cancelled() {
            info!(discussion_id = discussion.id, "Debate stopped");
        } else if let Some(m) = &moderator {
            self.interject(&discussion, m, ModeratorCue::Closing, &mut transcript)
                .await;
        }

        let summary = final_summary(&discussion.topic, transcript.as_str());
        self.finish(discussion.id, DiscussionStatus::Completed, Some(summary))
            .await?;

        info!(discussion_id = discussion.id, "Debate completed");
        Ok(())
    }

    /// One participant turn. Returns the raw adapter outcome.
    async fn run_turn(
        &self,
        discussion: &Discussion,
        agent: &Agent,
        round: u32,
        position: usize,
        total: usize,
        transcript: &mut Transcript,
    ) -> CallOutcome {
        let prompt = turn_prompt(discussion, round, position, total);
        let outcome = self
            .adapter
            .call(&agent.target(), &prompt, transcript.as_str())
            .await;

        let log = if outcome.success {
            debug!(agent = %agent.name, latency_ms = outcome.latency_ms, "Agent responded");
            let content = truncate_chars(&outcome.content, discussion.max_char_limit);
            transcript.push_turn(round, &agent.name, agent.id, &content);
            DiscussionLog::new(
                discussion.id,
                agent.id,
                LogStatus::Success,
                content,
                outcome.latency_ms,
            )
        } else {
            let status = if outcome.timed_out {
                LogStatus::Timeout
            } else {
                LogStatus::Error
            };
            warn!(agent = %agent.name, %status, error = %outcome.detail(), "Agent turn failed");
            DiscussionLog::new(
                discussion.id,
                agent.id,
                status,
                format!("Error: {}", outcome.detail()),
                outcome.latency_ms,
            )
        };

        self.record(log).await;
        outcome
    }

    /// One moderator interjection. Failures are logged, never fatal.
    async fn interject(
        &self,
        discussion: &Discussion,
        moderator: &Agent,
        cue: ModeratorCue,
        transcript: &mut Transcript,
    ) {
        let outcome = self
            .adapter
            .call(&moderator.target(), &cue.prompt(discussion), "")
            .await;

        let log = if outcome.success {
            transcript.push_moderator(&moderator.name, moderator.id, cue.role(), &outcome.content);
            DiscussionLog::new(
                discussion.id,
                moderator.id,
                LogStatus::Success,
                cue.tag(&outcome.content),
                outcome.latency_ms,
            )
        } else {
            warn!(moderator = %moderator.name, %cue, error = %outcome.detail(), "Moderator interjection failed");
            DiscussionLog::new(
                discussion.id,
                moderator.id,
                LogStatus::Error,
                format!("Moderator Error: {}", outcome.detail()),
                outcome.latency_ms,
            )
        };

        self.record(log.as_moderator()).await;
    }
}
