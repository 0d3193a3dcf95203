//! HTTP implementation of [`ProviderAdapter`]
//!
//! One `reqwest::Client` is shared by every agent. Each call is bounded by
//! the agent's own deadline; the client-wide timeout is only a backstop.

use crate::adapter::{CallOutcome, ProviderAdapter};
use crate::auth;
use crate::endpoint;
use crate::error::{Error, Result};
use crate::extract::extract_content;
use crate::framing::frame_prompt;
use crate::kind::ProviderKind;
use crate::target::ProviderTarget;
use crate::util::clip_body;
use crate::{anthropic, gemini, ollama, openai};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Added to every agent's configured timeout to form the per-call deadline
pub const DEADLINE_BUFFER: Duration = Duration::from_secs(10);

/// Fixed deadline for reachability probes
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound applied by the underlying HTTP client
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(180);

/// Talks to agents over HTTP.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
}

impl AgentClient {
    /// Create a client with the default backstop timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(CLIENT_TIMEOUT)
    }

    /// Create a client with a custom backstop timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// POST a JSON body and return the response text of a 2xx reply
    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        target: &ProviderTarget,
        body: &T,
    ) -> Result<String> {
        let deadline_ms = millis(target.deadline());
        let request = self.client.post(url).json(body);
        let response = auth::apply(request, target)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, deadline_ms))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::from_reqwest(e, deadline_ms))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: clip_body(&text),
            });
        }

        Ok(text)
    }

    /// GET a URL under the ping deadline and return its status
    async fn probe_get(&self, url: &str, target: &ProviderTarget) -> Result<StatusCode> {
        let request = self.client.get(url).timeout(PING_TIMEOUT);
        let response = auth::apply(request, target)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, millis(PING_TIMEOUT)))?;
        Ok(response.status())
    }

    /// POST a JSON body under the ping deadline and return its status
    async fn probe_post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        target: &ProviderTarget,
        body: &T,
    ) -> Result<StatusCode> {
        let request = self.client.post(url).json(body).timeout(PING_TIMEOUT);
        let response = auth::apply(request, target)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(e, millis(PING_TIMEOUT)))?;
        Ok(response.status())
    }

    // ========================================================================
    // Per-kind calls
    // ========================================================================

    async fn generate(&self, target: &ProviderTarget, prompt: &str, context: &str) -> Result<String> {
        let base = target.base();
        match target.resolved_kind() {
            ProviderKind::Ollama => {
                let body = ollama::build_request(&target.model, prompt, context);
                let text = self
                    .post_json(&endpoint::ollama_generate(base), target, &body)
                    .await?;
                ollama::parse_response(&text)
            }
            ProviderKind::OpenAi => self.call_chat(target, prompt, context).await,
            ProviderKind::Anthropic => {
                let body = anthropic::build_request(&target.model, prompt, context);
                let text = self
                    .post_json(&endpoint::anthropic_messages(base), target, &body)
                    .await?;
                anthropic::parse_response(&text)
            }
            ProviderKind::Google => {
                let body = gemini::build_request(prompt, context);
                let url = endpoint::gemini_generate(base, &target.model);
                let text = self.post_json(&url, target, &body).await?;
                gemini::parse_response(&text)
            }
            ProviderKind::Custom => self.call_custom(target, prompt, context).await,
        }
    }

    /// Chat-completion shape across candidate endpoints; first parseable
    /// 2xx wins
    async fn call_chat(&self, target: &ProviderTarget, prompt: &str, context: &str) -> Result<String> {
        let body = openai::build_request(&target.model, prompt, context);
        let mut last_err = None;

        for url in endpoint::chat_candidates(target.base()) {
            let attempt = match self.post_json(&url, target, &body).await {
                Ok(text) => openai::parse_response(&text),
                Err(e) => Err(e),
            };
            match attempt {
                Ok(content) => {
                    debug!(endpoint = %url, "chat endpoint answered");
                    return Ok(content);
                }
                Err(e) if e.is_timeout() => return Err(e),
                Err(e) => {
                    debug!(endpoint = %url, error = %e, "chat endpoint failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::AllEndpointsFailed("no chat endpoints".to_string())))
    }

    /// Chat shape first, then a generic single-prompt body read by the
    /// extraction rules
    async fn call_custom(&self, target: &ProviderTarget, prompt: &str, context: &str) -> Result<String> {
        match self.call_chat(target, prompt, context).await {
            Ok(content) => return Ok(content),
            Err(e) if e.is_timeout() => return Err(e),
            Err(e) => debug!(error = %e, "chat shape failed, trying generic completion"),
        }

        let body = serde_json::json!({
            "prompt": frame_prompt(prompt, context),
            "model": target.model,
            "stream": false,
        });

        for url in endpoint::chat_candidates(target.base()) {
            match self.post_json(&url, target, &body).await {
                Ok(text) => {
                    let Ok(doc) = serde_json::from_str::<serde_json::Value>(&text) else {
                        debug!(endpoint = %url, "generic response is not JSON");
                        continue;
                    };
                    if let Some((rule, content)) = extract_content(&doc) {
                        debug!(endpoint = %url, rule, "extracted generic content");
                        return Ok(content);
                    }
                    debug!(endpoint = %url, "no extraction rule matched");
                }
                Err(e) if e.is_timeout() => return Err(e),
                Err(e) => debug!(endpoint = %url, error = %e, "generic endpoint failed"),
            }
        }

        Err(Error::AllEndpointsFailed(format!(
            "custom provider {} did not answer on any endpoint",
            target.name
        )))
    }

    // ========================================================================
    // Per-kind pings
    // ========================================================================

    async fn probe(&self, target: &ProviderTarget) -> Result<()> {
        let base = target.base();
        match target.resolved_kind() {
            ProviderKind::Ollama => {
                expect_ok(self.probe_get(&endpoint::ollama_tags(base), target).await?)
            }
            ProviderKind::OpenAi => {
                expect_ok(self.probe_get(&endpoint::openai_models(base), target).await?)
            }
            ProviderKind::Google => {
                expect_ok(self.probe_get(&endpoint::gemini_models(base), target).await?)
            }
            ProviderKind::Anthropic => {
                let body = anthropic::ping_request(&target.model);
                let status = self
                    .probe_post(&endpoint::anthropic_messages(base), target, &body)
                    .await?;
                // 400 means the key was accepted but the probe itself was rejected
                if status == StatusCode::OK || status == StatusCode::BAD_REQUEST {
                    Ok(())
                } else {
                    Err(Error::Api {
                        status: status.as_u16(),
                        body: "anthropic ping rejected".to_string(),
                    })
                }
            }
            ProviderKind::Custom => {
                let body = serde_json::json!({ "prompt": "hi", "model": target.model });
                for url in endpoint::chat_candidates(base) {
                    match self.probe_post(&url, target, &body).await {
                        Ok(status) if status.is_success() => {
                            debug!(endpoint = %url, "ping answered");
                            return Ok(());
                        }
                        Ok(status) => debug!(endpoint = %url, %status, "ping rejected"),
                        Err(e) => debug!(endpoint = %url, error = %e, "ping failed"),
                    }
                }
                Err(Error::AllEndpointsFailed(
                    "custom provider ping failed on every endpoint".to_string(),
                ))
            }
        }
    }
}

#[async_trait::async_trait]
impl ProviderAdapter for AgentClient {
    #[instrument(skip(self, target, prompt, context), fields(agent = %target.name, kind = %target.resolved_kind()))]
    async fn call(&self, target: &ProviderTarget, prompt: &str, context: &str) -> CallOutcome {
        let deadline = target.deadline();
        debug!(deadline_secs = deadline.as_secs(), "calling agent");

        let started = Instant::now();
        let result = tokio::time::timeout(deadline, self.generate(target, prompt, context)).await;
        let latency_ms = millis(started.elapsed());

        match result {
            Ok(Ok(content)) => CallOutcome::success(content, latency_ms),
            Ok(Err(e)) => {
                warn!(error = %e, latency_ms, "agent call failed");
                CallOutcome::failure(e.to_string(), latency_ms, e.is_timeout())
            }
            Err(_) => {
                warn!(latency_ms, "agent call exceeded deadline");
                let e = Error::Timeout(millis(deadline));
                CallOutcome::failure(e.to_string(), latency_ms, true)
            }
        }
    }

    #[instrument(skip(self, target), fields(agent = %target.name, kind = %target.resolved_kind()))]
    async fn ping(&self, target: &ProviderTarget) -> Result<()> {
        match tokio::time::timeout(PING_TIMEOUT, self.probe(target)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(millis(PING_TIMEOUT))),
        }
    }
}

fn expect_ok(status: StatusCode) -> Result<()> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(Error::Api {
            status: status.as_u16(),
            body: "ping rejected".to_string(),
        })
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(DEADLINE_BUFFER, Duration::from_secs(10));
        assert_eq!(PING_TIMEOUT, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_failed_outcome() {
        let client = AgentClient::with_timeout(Duration::from_secs(2)).unwrap();
        // Port 9 (discard) on loopback is almost never listening
        let target = ProviderTarget::new("nobody", "http://127.0.0.1:9", "m")
            .with_kind(ProviderKind::Ollama)
            .with_timeout_secs(1);

        let outcome = client.call(&target, "hi", "").await;
        assert!(!outcome.success);
        assert!(outcome.error_detail.is_some());
    }
}
