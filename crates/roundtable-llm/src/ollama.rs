//! Ollama - single-prompt generation API
//!
//! Ollama takes one flattened prompt, so prior context is framed into it.

use crate::error::{Error, Result};
use crate::framing::frame_prompt;
use serde::{Deserialize, Serialize};

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)] // Fields used by serde for JSON deserialization
struct GenerateResponse {
    response: String,
    #[serde(default)]
    done: bool,
}

// ============================================================================
// Conversion
// ============================================================================

/// Build the `/api/generate` body
pub(crate) fn build_request(model: &str, prompt: &str, context: &str) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        prompt: frame_prompt(prompt, context),
        stream: false,
    }
}

/// Pull the generated text out of a response body
pub(crate) fn parse_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;
    Ok(parsed.response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let req = build_request("llama3.2", "Argue.", "Round 1 - A (1):\nYes");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        let prompt = json["prompt"].as_str().unwrap();
        assert!(prompt.starts_with("Previous context from other agents:"));
        assert!(prompt.ends_with("Your task:\nArgue."));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"model":"llama3.2","response":"I disagree.","done":true}"#;
        assert_eq!(parse_response(body).unwrap(), "I disagree.");
    }

    #[test]
    fn test_parse_missing_field() {
        let err = parse_response(r#"{"done":true}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
