//! Live discussion updates over server-sent events
//!
//! A new listener first receives the current `discussion` record and the
//! stored `logs`, then every live `log` / `discussion` event until the debate
//! reaches a terminal state or the client goes away.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Extension;
use futures::stream::{self, Stream, StreamExt};
use roundtable_core::{DebateEngine, DiscussionBroadcaster, DiscussionEvent, Subscription};
use serde::Serialize;
use tracing::{debug, warn};

use super::ApiError;

/// Render one named SSE frame
fn frame<T: Serialize>(name: &str, data: &T) -> Event {
    match Event::default().event(name).json_data(data) {
        Ok(event) => event,
        Err(e) => {
            warn!(event = name, error = %e, "Failed to serialize SSE payload");
            Event::default().event("error").data(e.to_string())
        }
    }
}

/// Owns a subscription and releases it however the stream ends.
struct Listener {
    subscription: Subscription,
    broadcaster: Arc<DiscussionBroadcaster>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let broadcaster = self.broadcaster.clone();
        let discussion_id = self.subscription.discussion_id;
        let listener_id = self.subscription.id;
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                broadcaster.unsubscribe(discussion_id, listener_id).await;
            });
        }
    }
}

/// How long a quiet stream waits before re-reading the discussion
const STALL_CHECK: Duration = Duration::from_secs(15);

/// Live frames until a terminal event arrives.
///
/// A full listener buffer can drop the terminal event, so a stream that stays
/// quiet for `stall_check` re-reads the discussion and closes itself once it
/// is no longer running.
fn live_events(
    listener: Listener,
    engine: DebateEngine,
    stall_check: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(Some((listener, engine)), move |state| async move {
        let (mut listener, engine) = state?;
        let discussion_id = listener.subscription.discussion_id;
        loop {
            let received =
                tokio::time::timeout(stall_check, listener.subscription.receiver.recv()).await;
            match received {
                Ok(Some(event)) => {
                    let sse = match &event {
                        DiscussionEvent::Log(log) => frame(event.name(), log),
                        DiscussionEvent::Discussion(discussion) => frame(event.name(), discussion),
                    };
                    if event.is_terminal() {
                        debug!(discussion_id, "Stream reached terminal state");
                        return Some((Ok(sse), None));
                    }
                    return Some((Ok(sse), Some((listener, engine))));
                }
                Ok(None) => return None,
                Err(_) => match engine.get_status(discussion_id).await {
                    Ok((discussion, _)) if !discussion.is_running() => {
                        debug!(discussion_id, "Missed terminal event, closing stream");
                        return Some((Ok(frame("discussion", &discussion)), None));
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        warn!(discussion_id, error = %e, "Stream status check failed");
                        return None;
                    }
                },
            }
        }
    })
}

/// Stream a discussion's updates
pub async fn stream_discussion(
    Extension(engine): Extension<DebateEngine>,
    Path(id): Path<i64>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let broadcaster = engine.broadcaster().clone();
    // Subscribe before the snapshot so nothing falls between the two
    let subscription = broadcaster.subscribe(id).await;
    let listener = Listener {
        subscription,
        broadcaster,
    };

    let (discussion, logs) = engine.get_status(id).await?;
    let finished = !discussion.is_running();

    let initial = stream::iter(vec![
        Ok(frame("discussion", &discussion)),
        Ok(frame("logs", &logs)),
    ]);

    let live = if finished {
        drop(listener);
        stream::empty::<Result<Event, Infallible>>().boxed()
    } else {
        live_events(listener, engine, STALL_CHECK).boxed()
    };

    Ok(Sse::new(initial.chain(live))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_core::{
        DebateStore, Discussion, DiscussionLog, DiscussionStatus, EngineConfig, InMemoryStore,
        LogStatus,
    };
    use roundtable_llm::MockAdapter;

    #[tokio::test]
    async fn test_stream_closes_after_dropped_terminal_event() {
        let store = Arc::new(InMemoryStore::new());
        let broadcaster = Arc::new(DiscussionBroadcaster::new(1));
        let engine = DebateEngine::new(
            store.clone(),
            Arc::new(MockAdapter::new()),
            broadcaster.clone(),
            EngineConfig::new(),
        );
        let discussion = store
            .insert_discussion(Discussion::new("topic", vec![1]))
            .await
            .unwrap();

        let listener = Listener {
            subscription: broadcaster.subscribe(discussion.id).await,
            broadcaster: broadcaster.clone(),
        };

        // The log fills the one-slot buffer, so the terminal update is dropped
        let log = DiscussionLog::new(discussion.id, 1, LogStatus::Success, "hi".to_string(), 5);
        assert_eq!(broadcaster.broadcast(DiscussionEvent::Log(log)).await, 1);
        let closed = store
            .close_discussion(discussion.id, DiscussionStatus::Completed)
            .await
            .unwrap();
        assert_eq!(
            broadcaster
                .broadcast(DiscussionEvent::Discussion(closed))
                .await,
            0
        );

        let frames: Vec<_> = tokio::time::timeout(
            Duration::from_secs(5),
            live_events(listener, engine, Duration::from_millis(20)).collect(),
        )
        .await
        .expect("stream stayed open");
        assert_eq!(frames.len(), 2);
    }
}
