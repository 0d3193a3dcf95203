//! Transcript - the running text shown to each speaker as prior context
//!
//! Only successful turns enter the transcript. Entries are separated by a
//! blank line.

/// Hard-truncate to at most `max_chars` characters, on a codepoint boundary.
#[must_use]
pub fn truncate_chars(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => content[..byte_idx].to_string(),
        None => content.to_string(),
    }
}

/// Append-only debate transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    /// Empty transcript
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push_entry(&mut self, header: &str, content: &str) {
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(header);
        self.text.push('\n');
        self.text.push_str(content);
    }

    /// Record a participant's successful turn
    pub fn push_turn(&mut self, round: u32, name: &str, agent_id: i64, content: &str) {
        self.push_entry(&format!("Round {round} - {name} ({agent_id}):"), content);
    }

    /// Record a moderator's successful interjection
    pub fn push_moderator(&mut self, name: &str, agent_id: i64, role: &str, content: &str) {
        self.push_entry(&format!("Moderator {name} ({agent_id}) - {role}:"), content);
    }

    /// Full transcript text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_codepoint_safe() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 5), "hello");
        assert_eq!(truncate_chars("hello", 50), "hello");
        assert_eq!(truncate_chars("안녕하세요", 2), "안녕");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_entries_are_separated() {
        let mut t = Transcript::new();
        assert!(t.is_empty());
        t.push_turn(1, "Alice", 1, "A");
        t.push_turn(1, "Bob", 2, "B");
        assert_eq!(t.as_str(), "Round 1 - Alice (1):\nA\n\nRound 1 - Bob (2):\nB");
    }

    #[test]
    fn test_moderator_entry() {
        let mut t = Transcript::new();
        t.push_moderator("Judge", 9, "Opening Remarks", "Welcome.");
        t.push_turn(1, "Alice", 1, "A");
        assert!(t
            .as_str()
            .starts_with("Moderator Judge (9) - Opening Remarks:\nWelcome.\n\n"));
    }
}
