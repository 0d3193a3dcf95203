//! Participant prompt text
//!
//! Both framings restate the length cap and language as upper-case hard
//! instructions at the end.

use crate::models::Discussion;
use std::fmt::Write;

/// Round-one prompt: ask for an initial perspective.
#[must_use]
pub fn opening_prompt(discussion: &Discussion) -> String {
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "You are an agent in a multi-agent debate about: \"{}\"\n\n",
        discussion.topic
    );
    push_parameters(&mut prompt, discussion);
    prompt.push_str(
        "This is the first round. Please provide your initial perspective on this topic.\n\n",
    );
    prompt.push_str("Guidelines:\n");
    prompt.push_str("- Provide a clear, thoughtful response\n");
    prompt.push_str("- Consider multiple perspectives\n");
    prompt.push_str("- Be specific and provide reasoning\n");
    push_hard_limits(&mut prompt, discussion);
    prompt
}

/// Later-round prompt for the `position`-th of `total` participants (1-based).
#[must_use]
pub fn round_prompt(discussion: &Discussion, round: u32, position: usize, total: usize) -> String {
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "This is Round {round} of the debate about: \"{}\"\n\n",
        discussion.topic
    );
    push_parameters(&mut prompt, discussion);
    let _ = write!(
        prompt,
        "You are Agent #{position} of {total}. Please respond to the previous arguments from other agents.\n\n"
    );
    prompt.push_str("Guidelines:\n");
    prompt.push_str("- Address specific points made by other agents\n");
    prompt.push_str("- Defend or modify your position based on new information\n");
    prompt.push_str("- Find common ground where possible\n");
    prompt.push_str("- Move the discussion toward resolution\n");
    push_hard_limits(&mut prompt, discussion);
    prompt
}

/// Pick the framing for a turn.
#[must_use]
pub fn turn_prompt(discussion: &Discussion, round: u32, position: usize, total: usize) -> String {
    if round <= 1 {
        opening_prompt(discussion)
    } else {
        round_prompt(discussion, round, position, total)
    }
}

fn push_parameters(prompt: &mut String, discussion: &Discussion) {
    let _ = writeln!(prompt, "Language of discussion: {}", discussion.language);
    let _ = write!(
        prompt,
        "Maximum response length: {} characters\n\n",
        discussion.max_char_limit
    );
}

fn push_hard_limits(prompt: &mut String, discussion: &Discussion) {
    let _ = writeln!(
        prompt,
        "- DO NOT EXCEED {} CHARACTERS",
        discussion.max_char_limit
    );
    let _ = writeln!(
        prompt,
        "- RESPOND ONLY IN {}",
        discussion.language.to_uppercase()
    );
}
