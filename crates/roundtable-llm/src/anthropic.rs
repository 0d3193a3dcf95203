//! Anthropic - messages API
//!
//! The system instruction travels in its own field; the framed prompt is the
//! single user message.

use crate::error::{Error, Result};
use crate::framing::{frame_prompt, system_instruction};
use serde::{Deserialize, Serialize};

/// Token cap for debate turns
const MAX_TOKENS: u32 = 4000;

/// Sampling temperature for debate turns
const TEMPERATURE: f32 = 0.7;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Build a debate turn request
pub(crate) fn build_request(model: &str, prompt: &str, context: &str) -> MessagesRequest {
    MessagesRequest {
        model: model.to_string(),
        max_tokens: MAX_TOKENS,
        temperature: Some(TEMPERATURE),
        system: Some(system_instruction(context)),
        messages: vec![AnthropicMessage {
            role: "user",
            content: frame_prompt(prompt, context),
        }],
    }
}

/// Minimal one-token probe used by ping
pub(crate) fn ping_request(model: &str) -> MessagesRequest {
    MessagesRequest {
        model: model.to_string(),
        max_tokens: 1,
        temperature: None,
        system: None,
        messages: vec![AnthropicMessage {
            role: "user",
            content: "test".to_string(),
        }],
    }
}

/// Text of the first `text` block
pub(crate) fn parse_response(body: &str) -> Result<String> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    if parsed.content.is_empty() {
        return Err(Error::EmptyResponse("no content blocks in response"));
    }

    parsed
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .find_map(|block| block.text.filter(|t| !t.is_empty()))
        .ok_or(Error::EmptyResponse("no text content in response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = build_request("claude-sonnet-4-5", "Argue.", "");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Argue.");
        assert!(json["system"].as_str().unwrap().contains("multi-agent debate"));
    }

    #[test]
    fn test_ping_request_is_minimal() {
        let json = serde_json::to_value(ping_request("claude")).unwrap();
        assert_eq!(json["max_tokens"], 1);
        assert!(json.get("system").is_none());
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_first_text_block() {
        let body = r#"{"content":[
            {"type":"tool_use","id":"t","name":"x","input":{}},
            {"type":"text","text":"answer"},
            {"type":"text","text":"later"}
        ]}"#;
        assert_eq!(parse_response(body).unwrap(), "answer");
    }

    #[test]
    fn test_empty_content() {
        assert!(matches!(
            parse_response(r#"{"content":[]}"#).unwrap_err(),
            Error::EmptyResponse(_)
        ));
        assert!(matches!(
            parse_response(r#"{"content":[{"type":"tool_use"}]}"#).unwrap_err(),
            Error::EmptyResponse(_)
        ));
    }
}
