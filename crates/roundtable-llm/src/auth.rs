//! Kind-specific authentication headers

use crate::kind::ProviderKind;
use crate::target::ProviderTarget;
use reqwest::RequestBuilder;

/// Anthropic API version header value
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Headers carrying the credential for a provider kind.
///
/// Returns nothing when there is no credential; headers are never defaulted.
#[must_use]
pub fn auth_headers(kind: ProviderKind, token: Option<&str>) -> Vec<(&'static str, String)> {
    let Some(token) = token else {
        return Vec::new();
    };

    match kind {
        ProviderKind::Anthropic => vec![
            ("x-api-key", token.to_string()),
            ("anthropic-version", ANTHROPIC_VERSION.to_string()),
        ],
        ProviderKind::Google => vec![("x-goog-api-key", token.to_string())],
        ProviderKind::OpenAi | ProviderKind::Ollama | ProviderKind::Custom => {
            vec![("Authorization", format!("Bearer {token}"))]
        }
    }
}

/// Attach the target's auth headers to a request
pub(crate) fn apply(builder: RequestBuilder, target: &ProviderTarget) -> RequestBuilder {
    auth_headers(target.resolved_kind(), target.token())
        .into_iter()
        .fold(builder, |b, (name, value)| b.header(name, value))
}
