//! Content extraction for responses of unknown shape
//!
//! Custom providers answer in whatever JSON they like. Each rule looks at the
//! parsed document and either yields text or declines; rules run in fixed
//! priority and the first non-empty yield wins.

use serde_json::Value;

/// One way of finding the response text inside a JSON document.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    /// Short name for logs
    pub name: &'static str,
    apply: fn(&Value) -> Option<&str>,
}

impl ExtractionRule {
    /// Run this rule against a document
    #[must_use]
    pub fn extract<'a>(&self, doc: &'a Value) -> Option<&'a str> {
        (self.apply)(doc).filter(|s| !s.is_empty())
    }
}

fn top_level_text(doc: &Value) -> Option<&str> {
    doc.get("text")?.as_str()
}

fn top_level_response(doc: &Value) -> Option<&str> {
    doc.get("response")?.as_str()
}

fn first_choice_message(doc: &Value) -> Option<&str> {
    doc.get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()
}

/// Rules in priority order
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "text",
        apply: top_level_text,
    },
    ExtractionRule {
        name: "response",
        apply: top_level_response,
    },
    ExtractionRule {
        name: "choices[0].message.content",
        apply: first_choice_message,
    },
];

/// Apply [`EXTRACTION_RULES`] in order, returning the first match and the
/// name of the rule that produced it.
#[must_use]
pub fn extract_content(doc: &Value) -> Option<(&'static str, String)> {
    EXTRACTION_RULES
        .iter()
        .find_map(|rule| rule.extract(doc).map(|text| (rule.name, text.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_field() {
        let doc = json!({"text": "hello"});
        assert_eq!(extract_content(&doc), Some(("text", "hello".to_string())));
    }

    #[test]
    fn test_priority_order() {
        // "text" beats "response" beats choices
        let doc = json!({
            "response": "from response",
            "text": "from text",
            "choices": [{"message": {"content": "from choices"}}]
        });
        assert_eq!(extract_content(&doc).unwrap().1, "from text");

        let doc = json!({
            "response": "from response",
            "choices": [{"message": {"content": "from choices"}}]
        });
        assert_eq!(extract_content(&doc).unwrap().1, "from response");
    }

    #[test]
    fn test_nested_choices() {
        let doc = json!({"choices": [{"message": {"role": "assistant", "content": "deep"}}]});
        assert_eq!(
            extract_content(&doc),
            Some(("choices[0].message.content", "deep".to_string()))
        );
    }

    #[test]
    fn test_rules_decline() {
        assert!(extract_content(&json!({"choices": []})).is_none());
        assert!(extract_content(&json!({"text": 42})).is_none());
        assert!(extract_content(&json!({"text": ""})).is_none());
        assert!(extract_content(&json!(["text"])).is_none());
    }

    #[test]
    fn test_empty_falls_through() {
        let doc = json!({"text": "", "response": "fallback"});
        assert_eq!(extract_content(&doc).unwrap().1, "fallback");
    }
}
