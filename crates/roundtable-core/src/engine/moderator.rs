//! Moderator interjections
//!
//! A moderator never takes ordinary turns. It is called with an empty
//! context and a self-contained prompt for one of four cues.

use crate::models::Discussion;
use std::fmt;

/// Which interjection the moderator is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeratorCue {
    /// Before the first participant turn
    Opening,
    /// Between two participant turns, carrying the raw previous response
    Interim(String),
    /// After every participant has spoken in a round
    RoundSummary(u32),
    /// After the last round
    Closing,
}

impl ModeratorCue {
    /// Role label embedded in the stored content
    #[must_use]
    pub fn role(&self) -> &'static str {
        match self {
            Self::Opening => "Opening Remarks",
            Self::Interim(_) => "Interim Moderation",
            Self::RoundSummary(_) => "Round Summary",
            Self::Closing => "Closing Remarks",
        }
    }

    /// Full prompt for this cue
    #[must_use]
    pub fn prompt(&self, discussion: &Discussion) -> String {
        let limit = discussion.max_char_limit;
        let mut prompt = format!(
            "You are the moderator for a multi-agent debate on: \"{}\"\nLanguage: {}\nMax length: {} characters\n\n",
            discussion.topic, discussion.language, limit
        );

        match self {
            Self::Opening => prompt.push_str(
                "Your role is to:\n\
                 1. Welcome participants and set the tone\n\
                 2. Briefly explain the debate format and rules\n\
                 3. Remind agents to be respectful and constructive\n\
                 4. Introduce the topic and initial considerations\n\n\
                 Please provide a concise opening statement (2-3 paragraphs).\n",
            ),
            Self::Interim(raw) => {
                prompt.push_str("An agent just responded with:\n\n\"");
                prompt.push_str(raw);
                prompt.push_str(
                    "\"\n\n\
                     Your role is to:\n\
                     1. Briefly acknowledge the key points made\n\
                     2. Keep the discussion focused and on track\n\
                     3. Encourage the next agent to build upon or challenge these points\n\
                     4. Maintain a respectful and constructive tone\n\n\
                     Please provide a brief moderation comment (1-2 paragraphs).\n",
                );
            }
            Self::RoundSummary(round) => {
                prompt.push_str(&format!("Round {round} completed.\n\n"));
                prompt.push_str(
                    "Your role is to:\n\
                     1. Summarize the key arguments and perspectives from this round\n\
                     2. Highlight areas of agreement and disagreement\n\
                     3. Point out any logical fallacies or particularly strong arguments\n\
                     4. Set up the next round of discussion\n\n\
                     Please provide a concise round summary (2-3 paragraphs).\n",
                );
            }
            Self::Closing => prompt.push_str(
                "The debate has concluded. Your role is to:\n\
                 1. Provide a balanced summary of all positions presented\n\
                 2. Identify the strongest arguments and key insights\n\
                 3. Highlight areas of consensus and remaining disagreement\n\
                 4. Offer final thoughts on the topic and the quality of the discussion\n\n\
                 Please provide a comprehensive closing statement (3-4 paragraphs).\n",
            ),
        }

        prompt.push_str(&format!(
            "RESPOND ONLY IN {}. DO NOT EXCEED {} CHARACTERS.",
            discussion.language.to_uppercase(),
            limit
        ));
        prompt
    }

    /// Stored content for a successful interjection
    #[must_use]
    pub fn tag(&self, content: &str) -> String {
        format!("[Moderator - {}]\n{}", self.role(), content)
    }
}

impl fmt::Display for ModeratorCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Opening => "opening",
            Self::Interim(_) => "interim",
            Self::RoundSummary(_) => "round_summary",
            Self::Closing => "closing",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(ModeratorCue::Opening.role(), "Opening Remarks");
        assert_eq!(ModeratorCue::Interim(String::new()).role(), "Interim Moderation");
        assert_eq!(ModeratorCue::RoundSummary(2).role(), "Round Summary");
        assert_eq!(ModeratorCue::Closing.role(), "Closing Remarks");
        assert_eq!(ModeratorCue::RoundSummary(1).to_string(), "round_summary");
    }

    #[test]
    fn test_prompts() {
        let mut d = Discussion::new("Cats vs dogs", vec![1]);
        d.language = "French".to_string();
        d.max_char_limit = 300;

        let opening = ModeratorCue::Opening.prompt(&d);
        assert!(opening.starts_with("You are the moderator for a multi-agent debate on: \"Cats vs dogs\"\nLanguage: French\nMax length: 300 characters\n\n"));
        assert!(opening.contains("opening statement"));
        assert!(opening.ends_with("RESPOND ONLY IN FRENCH. DO NOT EXCEED 300 CHARACTERS."));

        let interim = ModeratorCue::Interim("Dogs are loyal.".to_string()).prompt(&d);
        assert!(interim.contains("An agent just responded with:\n\n\"Dogs are loyal.\""));

        let summary = ModeratorCue::RoundSummary(2).prompt(&d);
        assert!(summary.contains("Round 2 completed."));

        assert!(ModeratorCue::Closing.prompt(&d).contains("The debate has concluded."));
    }

    #[test]
    fn test_tag() {
        assert_eq!(
            ModeratorCue::Closing.tag("Thanks all."),
            "[Moderator - Closing Remarks]\nThanks all."
        );
    }
}
