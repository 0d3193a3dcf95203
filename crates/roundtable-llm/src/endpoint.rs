//! Endpoint resolution from a configured base URL
//!
//! All functions expect a base already trimmed of a trailing slash
//! (see [`ProviderTarget::base`](crate::ProviderTarget::base)).

/// Public Gemini host; other hosts get the proxy-style path
const GOOGLE_PUBLIC_HOST: &str = "generativelanguage.googleapis.com";

/// Chat-completion endpoints to try, in priority order.
///
/// A base that already names a complete endpoint is used verbatim.
#[must_use]
pub fn chat_candidates(base: &str) -> Vec<String> {
    if base.contains("/chat/completions") || base.contains("/generate") {
        return vec![base.to_string()];
    }

    if base.ends_with("/v1") {
        return vec![format!("{base}/chat/completions")];
    }

    vec![
        format!("{base}/chat/completions"),
        format!("{base}/v1/chat/completions"),
        base.to_string(),
    ]
}

/// Ollama single-prompt generation endpoint
#[must_use]
pub fn ollama_generate(base: &str) -> String {
    format!("{base}/api/generate")
}

/// Ollama model listing, used for ping
#[must_use]
pub fn ollama_tags(base: &str) -> String {
    format!("{base}/api/tags")
}

/// OpenAI model listing, used for ping
#[must_use]
pub fn openai_models(base: &str) -> String {
    if base.contains("/v1") {
        format!("{base}/models")
    } else {
        format!("{base}/v1/models")
    }
}

/// Anthropic messages endpoint
#[must_use]
pub fn anthropic_messages(base: &str) -> String {
    if base.contains("/v1") {
        format!("{base}/messages")
    } else {
        format!("{base}/v1/messages")
    }
}

/// Gemini content generation endpoint
#[must_use]
pub fn gemini_generate(base: &str, model: &str) -> String {
    if base.contains(GOOGLE_PUBLIC_HOST) {
        format!("{base}/models/{model}:generateContent")
    } else {
        format!("{base}/v1beta/generateContent")
    }
}

/// Gemini model listing, used for ping
#[must_use]
pub fn gemini_models(base: &str) -> String {
    if base.contains(GOOGLE_PUBLIC_HOST) {
        format!("{base}/models")
    } else {
        format!("{base}/v1beta/models")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_endpoint_used_verbatim() {
        assert_eq!(
            chat_candidates("http://h/v1/chat/completions"),
            vec!["http://h/v1/chat/completions"]
        );
        assert_eq!(
            chat_candidates("http://h/api/generate"),
            vec!["http://h/api/generate"]
        );
    }

    #[test]
    fn test_v1_base() {
        assert_eq!(
            chat_candidates("http://h:8000/v1"),
            vec!["http://h:8000/v1/chat/completions"]
        );
    }

    #[test]
    fn test_generic_priority() {
        assert_eq!(
            chat_candidates("http://h:8000"),
            vec![
                "http://h:8000/chat/completions",
                "http://h:8000/v1/chat/completions",
                "http://h:8000",
            ]
        );
    }

    #[test]
    fn test_anthropic_paths() {
        assert_eq!(
            anthropic_messages("https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            anthropic_messages("https://api.anthropic.com/v1"),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn test_gemini_paths() {
        assert_eq!(
            gemini_generate(
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.0-flash"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            gemini_generate("http://proxy:9000", "gemini-2.0-flash"),
            "http://proxy:9000/v1beta/generateContent"
        );
        assert_eq!(gemini_models("http://proxy:9000"), "http://proxy:9000/v1beta/models");
    }

    #[test]
    fn test_openai_models() {
        assert_eq!(
            openai_models("https://api.openai.com/v1"),
            "https://api.openai.com/v1/models"
        );
        assert_eq!(openai_models("http://h"), "http://h/v1/models");
    }
}
