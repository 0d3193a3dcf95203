//! OpenAI-compatible chat completions
//!
//! Also the first shape tried for custom providers.

use crate::error::{Error, Result};
use crate::framing::{frame_prompt, system_instruction};
use serde::{Deserialize, Serialize};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
struct Choice {
    #[serde(default)]
    index: u32,
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Build a system + user message list with the context framed into the user message
pub(crate) fn build_request(model: &str, prompt: &str, context: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: Some(system_instruction(context)),
            },
            ChatMessage {
                role: "user".to_string(),
                content: Some(frame_prompt(prompt, context)),
            },
        ],
        stream: false,
    }
}

/// First choice's message content
pub(crate) fn parse_response(body: &str) -> Result<String> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(Error::EmptyResponse("no choices in response"))?;

    choice
        .message
        .content
        .ok_or(Error::EmptyResponse("first choice has no content"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_roles() {
        let req = build_request("gpt-4o", "Argue.", "");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Argue.");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_context_is_framed_into_user_message() {
        let req = build_request("gpt-4o", "Argue.", "Round 1 - A (1):\nYes");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json["messages"][1]["content"],
            "Previous context from other agents:\nRound 1 - A (1):\nYes\n\nYour task:\nArgue."
        );
        let system = json["messages"][0]["content"].as_str().unwrap();
        assert!(!system.contains("Round 1 - A (1)"));
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"id":"x","choices":[
            {"index":0,"message":{"role":"assistant","content":"first"},"finish_reason":"stop"},
            {"index":1,"message":{"role":"assistant","content":"second"}}
        ]}"#;
        assert_eq!(parse_response(body).unwrap(), "first");
    }

    #[test]
    fn test_zero_choices_is_structured_error() {
        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(_)));
        let err = parse_response("not json").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
