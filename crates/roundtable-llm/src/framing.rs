//! How prior transcript context is presented to an agent

/// Base system instruction for every debate call
pub const DEBATE_SYSTEM_PROMPT: &str =
    "You are participating in a multi-agent debate. Please provide thoughtful responses to the given topic.";

/// Appended to the system instruction when prior context exists
const CONTEXT_SYSTEM_SUFFIX: &str =
    " Consider the context from previous agents and provide your perspective or critique.";

/// Prepend prior context to the instruction with a fixed framing sentence.
///
/// With no context the prompt is returned unchanged.
#[must_use]
pub fn frame_prompt(prompt: &str, context: &str) -> String {
    if context.is_empty() {
        prompt.to_string()
    } else {
        format!("Previous context from other agents:\n{context}\n\nYour task:\n{prompt}")
    }
}

/// System instruction for providers that take one separately
#[must_use]
pub fn system_instruction(context: &str) -> String {
    if context.is_empty() {
        DEBATE_SYSTEM_PROMPT.to_string()
    } else {
        format!("{DEBATE_SYSTEM_PROMPT}{CONTEXT_SYSTEM_SUFFIX}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context_passthrough() {
        assert_eq!(frame_prompt("Argue.", ""), "Argue.");
        assert_eq!(system_instruction(""), DEBATE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_context_framing() {
        let framed = frame_prompt("Argue.", "Round 1 - A (1):\nYes");
        assert_eq!(
            framed,
            "Previous context from other agents:\nRound 1 - A (1):\nYes\n\nYour task:\nArgue."
        );
        assert!(system_instruction("x").ends_with("perspective or critique."));
    }
}
