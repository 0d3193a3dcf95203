//! Deterministic final summary

/// Text stored when no turn produced usable content
pub const EMPTY_SUMMARY: &str = "No responses were generated during this debate.";

const PREVIEW_LINES: usize = 5;

/// Build the closing summary from the topic and the final transcript text.
#[must_use]
pub fn final_summary(topic: &str, transcript: &str) -> String {
    if transcript.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let mut summary = format!("Debate Summary for: {topic}\n\n");
    summary.push_str("The debate involved multiple AI agents discussing this topic. ");
    summary.push_str("Each agent provided their perspective and responded to others' arguments. ");
    summary.push_str("For detailed discussion, please review the individual agent responses.\n\n");

    let mut lines = transcript.lines().map(str::trim).filter(|l| !l.is_empty());
    let preview: Vec<&str> = lines.by_ref().take(PREVIEW_LINES).collect();
    if !preview.is_empty() {
        summary.push_str("Key points discussed:\n");
        for line in preview {
            summary.push_str("- ");
            summary.push_str(line);
            summary.push('\n');
        }
        if lines.next().is_some() {
            summary.push_str("... (see full discussion for more details)");
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript() {
        assert_eq!(final_summary("anything", ""), EMPTY_SUMMARY);
    }

    #[test]
    fn test_short_transcript_is_previewed_in_full() {
        let summary = final_summary("Tabs", "Round 1 - A (1):\nTabs win.");
        assert!(summary.starts_with("Debate Summary for: Tabs\n\n"));
        assert!(summary.ends_with("Key points discussed:\n- Round 1 - A (1):\n- Tabs win.\n"));
        assert!(!summary.contains("see full discussion"));
    }

    #[test]
    fn test_preview_takes_five_non_blank_lines() {
        let transcript = "Round 1 - A (1):\nA\n\nRound 1 - B (2):\nB\n\nRound 1 - C (3):\nC";
        let summary = final_summary("Tabs", transcript);
        assert!(summary.contains(
            "Key points discussed:\n- Round 1 - A (1):\n- A\n- Round 1 - B (2):\n- B\n- Round 1 - C (3):\n... (see full discussion for more details)"
        ));
        assert!(!summary.contains("- C\n"));
    }

    #[test]
    fn test_exactly_five_lines_has_no_notice() {
        let summary = final_summary("Tabs", "a\n\nb\nc\nd\ne\n");
        assert!(summary.ends_with("- a\n- b\n- c\n- d\n- e\n"));
    }
}
