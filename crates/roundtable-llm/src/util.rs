//! Common utilities for provider adapters

/// Minimum key length to display partial key
const MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY: usize = 8;

/// Number of characters to show at start/end of masked key
const KEY_MASK_VISIBLE_CHARS: usize = 4;

/// Longest provider error body kept in an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Mask an API key for safe display in logs
///
/// Shows first 4 and last 4 characters for keys longer than 8 characters,
/// otherwise shows "****".
///
/// # Examples
/// ```
/// use roundtable_llm::util::mask_api_key;
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= MIN_KEY_LENGTH_FOR_PARTIAL_DISPLAY {
        return "****".to_string();
    }
    let head: String = chars[..KEY_MASK_VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - KEY_MASK_VISIBLE_CHARS..].iter().collect();
    format!("{head}...{tail}")
}

/// Clip a provider error body so one bad endpoint cannot flood the log.
#[must_use]
pub fn clip_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let clipped: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{clipped}...(truncated)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_api_key_long() {
        let key = "sk-1234567890abcdefghij";
        let masked = mask_api_key(key);
        assert_eq!(masked, "sk-1...ghij");
        assert!(!masked.contains("567890"));
    }

    #[test]
    fn test_mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "****");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
    }

    #[test]
    fn test_clip_body() {
        assert_eq!(clip_body("bad request"), "bad request");
        let long = "x".repeat(600);
        let clipped = clip_body(&long);
        assert!(clipped.ends_with("...(truncated)"));
        assert_eq!(clipped.chars().filter(|c| *c == 'x').count(), 500);
    }
}
