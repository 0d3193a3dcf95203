//! Gemini - `generateContent` API

use crate::error::{Error, Result};
use crate::framing::{frame_prompt, system_instruction};
use serde::{Deserialize, Serialize};

const MAX_OUTPUT_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Build a system instruction + user content request
pub(crate) fn build_request(prompt: &str, context: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: frame_prompt(prompt, context),
            }],
        }],
        system_instruction: SystemInstruction {
            parts: vec![Part {
                text: system_instruction(context),
            }],
        },
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}

/// First text part of the first candidate
pub(crate) fn parse_response(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| Error::InvalidResponse(e.to_string()))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or(Error::EmptyResponse("no candidates in response"))?;

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(Error::EmptyResponse("no content parts in first candidate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_camel_case() {
        let json = serde_json::to_value(build_request("Argue.", "")).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 4000);
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "Argue.");
    }

    #[test]
    fn test_parse_first_part() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"one"},{"text":"two"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "one");
    }

    #[test]
    fn test_zero_candidates() {
        assert!(matches!(
            parse_response(r#"{"candidates":[]}"#).unwrap_err(),
            Error::EmptyResponse(_)
        ));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap_err(),
            Error::EmptyResponse(_)
        ));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap_err(),
            Error::EmptyResponse(_)
        ));
    }
}
