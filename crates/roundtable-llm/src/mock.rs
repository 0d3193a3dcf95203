//! Mock adapter for testing
//!
//! Replies are scripted per target name and consumed in order. An empty
//! script answers with `"mock response"`.

use crate::adapter::{CallOutcome, ProviderAdapter};
use crate::error::{Error, Result};
use crate::target::ProviderTarget;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Succeed with this content
    Content(String),
    /// Fail with this detail
    Fail(String),
    /// Report a deadline expiry
    Timeout,
    /// Sleep, then succeed with this content
    Delayed(Duration, String),
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Target name
    pub target: String,
    /// Prompt as sent
    pub prompt: String,
    /// Prior context as sent
    pub context: String,
}

/// A scripted [`ProviderAdapter`].
#[derive(Clone, Default)]
pub struct MockAdapter {
    replies: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    unreachable: Arc<Mutex<HashSet<String>>>,
}

impl MockAdapter {
    /// Create a mock with no scripted replies
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the target with this name
    pub fn push(&self, target: impl Into<String>, reply: MockReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(target.into())
            .or_default()
            .push_back(reply);
    }

    /// Queue a successful reply
    pub fn push_content(&self, target: impl Into<String>, content: impl Into<String>) {
        self.push(target, MockReply::Content(content.into()));
    }

    /// Make pings to this target fail
    pub fn set_unreachable(&self, target: impl Into<String>) {
        self.unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(target.into());
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Calls received by one target
    #[must_use]
    pub fn calls_for(&self, target: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.target == target)
            .collect()
    }

    fn next_reply(&self, target: &str) -> Option<MockReply> {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_mut(target)
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for MockAdapter {
    async fn call(&self, target: &ProviderTarget, prompt: &str, context: &str) -> CallOutcome {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                target: target.name.clone(),
                prompt: prompt.to_string(),
                context: context.to_string(),
            });

        match self.next_reply(&target.name) {
            None => CallOutcome::success("mock response", 1),
            Some(MockReply::Content(content)) => CallOutcome::success(content, 1),
            Some(MockReply::Fail(detail)) => CallOutcome::failure(detail, 1, false),
            Some(MockReply::Timeout) => {
                let ms = u64::try_from(target.deadline().as_millis()).unwrap_or(u64::MAX);
                CallOutcome::failure(Error::Timeout(ms).to_string(), ms, true)
            }
            Some(MockReply::Delayed(delay, content)) => {
                tokio::time::sleep(delay).await;
                let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                CallOutcome::success(content, ms)
            }
        }
    }

    async fn ping(&self, target: &ProviderTarget) -> Result<()> {
        let unreachable = self
            .unreachable
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&target.name);
        if unreachable {
            Err(Error::Network(format!("{} is unreachable", target.name)))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies_in_order() {
        let mock = MockAdapter::new();
        mock.push_content("a", "one");
        mock.push("a", MockReply::Fail("down".to_string()));
        let target = ProviderTarget::new("a", "http://x", "m");

        assert_eq!(mock.call(&target, "p", "").await.content, "one");
        let failed = mock.call(&target, "p", "ctx").await;
        assert!(!failed.success);
        assert_eq!(failed.detail(), "down");
        assert_eq!(mock.call(&target, "p", "").await.content, "mock response");

        let calls = mock.calls_for("a");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].context, "ctx");
    }

    #[tokio::test]
    async fn test_timeout_reply() {
        let mock = MockAdapter::new();
        mock.push("a", MockReply::Timeout);
        let outcome = mock
            .call(&ProviderTarget::new("a", "http://x", "m"), "p", "")
            .await;
        assert!(outcome.timed_out);
        assert!(!outcome.success);
    }

    #[tokio::test]
    async fn test_ping() {
        let mock = MockAdapter::new();
        mock.set_unreachable("b");
        assert!(mock.ping(&ProviderTarget::new("a", "http://x", "m")).await.is_ok());
        assert!(mock.ping(&ProviderTarget::new("b", "http://x", "m")).await.is_err());
    }
}
