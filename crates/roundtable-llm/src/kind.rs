//! Provider kinds and URL-based fallback detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The wire family an agent speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server (`/api/generate`)
    Ollama,
    /// OpenAI chat completions
    OpenAi,
    /// Anthropic messages API
    Anthropic,
    /// Google Gemini `generateContent`
    Google,
    /// Anything else, probed as OpenAI-compatible then generic JSON
    Custom,
}

impl ProviderKind {
    /// All kinds, in display order
    pub const ALL: [ProviderKind; 5] = [
        Self::Ollama,
        Self::OpenAi,
        Self::Anthropic,
        Self::Google,
        Self::Custom,
    ];

    /// Stable lowercase name used in storage and JSON
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Custom => "custom",
        }
    }

    /// Guess the kind from a base URL.
    ///
    /// Only used for records created before the kind was stored explicitly.
    #[must_use]
    pub fn detect(url: &str) -> Self {
        let url = url.to_lowercase();
        if url.contains("ollama") || url.contains("localhost:11434") {
            Self::Ollama
        } else if url.contains("openai.com") {
            Self::OpenAi
        } else if url.contains("anthropic.com") {
            Self::Anthropic
        } else if url.contains("googleapis.com") {
            Self::Google
        } else {
            Self::Custom
        }
    }

    /// Use the configured kind when present, otherwise sniff the URL.
    #[must_use]
    pub fn resolve(configured: Option<Self>, url: &str) -> Self {
        configured.unwrap_or_else(|| Self::detect(url))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "google" | "gemini" => Ok(Self::Google),
            "custom" => Ok(Self::Custom),
            other => Err(format!("unknown provider type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_url() {
        assert_eq!(
            ProviderKind::detect("http://localhost:11434"),
            ProviderKind::Ollama
        );
        assert_eq!(
            ProviderKind::detect("http://my-ollama-box:8080"),
            ProviderKind::Ollama
        );
        assert_eq!(
            ProviderKind::detect("https://api.openai.com/v1"),
            ProviderKind::OpenAi
        );
        assert_eq!(
            ProviderKind::detect("https://api.anthropic.com"),
            ProviderKind::Anthropic
        );
        assert_eq!(
            ProviderKind::detect("https://generativelanguage.googleapis.com/v1beta"),
            ProviderKind::Google
        );
        assert_eq!(
            ProviderKind::detect("https://llm.internal.example/v1"),
            ProviderKind::Custom
        );
    }

    #[test]
    fn test_configured_kind_wins() {
        // An explicit kind is never re-detected from the URL
        assert_eq!(
            ProviderKind::resolve(Some(ProviderKind::Custom), "https://api.openai.com/v1"),
            ProviderKind::Custom
        );
        assert_eq!(
            ProviderKind::resolve(None, "https://api.openai.com/v1"),
            ProviderKind::OpenAi
        );
    }

    #[test]
    fn test_parse_and_display() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
        assert_eq!(
            " Gemini ".parse::<ProviderKind>().unwrap(),
            ProviderKind::Google
        );
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            "\"openai\""
        );
        let kind: ProviderKind = serde_json::from_str("\"anthropic\"").unwrap();
        assert_eq!(kind, ProviderKind::Anthropic);
    }
}
