//! Roundtable LLM - Provider Adapter
//!
//! This crate maps one canonical "ask an agent, given a prompt and prior
//! context" operation onto the wire shapes of the supported providers:
//! - Ollama: single-prompt `/api/generate` body
//! - OpenAI: role-tagged chat-completion message list
//! - Anthropic: messages API with a separate system field
//! - Google: Gemini `generateContent` with system instruction and parts
//! - Custom: OpenAI-compatible probing, then generic JSON extraction rules

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod anthropic;
pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod framing;
pub mod gemini;
pub mod kind;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod target;
pub mod util;

pub use adapter::{CallOutcome, ProviderAdapter};
pub use client::{AgentClient, CLIENT_TIMEOUT, DEADLINE_BUFFER, PING_TIMEOUT};
pub use error::{Error, Result};
pub use kind::ProviderKind;
pub use mock::{MockAdapter, MockReply, RecordedCall};
pub use target::ProviderTarget;
