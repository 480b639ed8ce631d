/*!
 * Prompt construction for tone-aware translation.
 *
 * One system prompt per request: a base translator instruction rendered with
 * the language pair, plus a tone clause selected from fixed templates.
 */

use crate::types::Tone;

/// Sentinel for "let the model figure out the source language"
pub const AUTO_SOURCE: &str = "auto";

const BASE_TEMPLATE: &str = "You are a professional translator. Translate the user's message from {source_language} into {target_language}. {tone_instruction} Preserve the meaning faithfully. Reply with the translation only - no quotes, no notes, no commentary.";

const BASE_TEMPLATE_AUTO: &str = "You are a professional translator. Detect the language of the user's message and translate it into {target_language}. {tone_instruction} Preserve the meaning faithfully. Reply with the translation only - no quotes, no notes, no commentary.";

fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Natural => "Use a natural, neutral register, the way a fluent speaker would phrase it in everyday conversation.",
        Tone::Gentle => "Use a gentle, warm and considerate register, softening direct statements where the language allows.",
        Tone::Cute => "Use a playful, cute register with light, endearing phrasing, while keeping the content intact.",
        Tone::Depressed => "Use a subdued, melancholic register, muted word choices and a downcast mood.",
        Tone::Angry => "Use a blunt, irritated register with sharp phrasing, without adding insults that are not in the original.",
    }
}

/// Render the system prompt for a translation request
pub fn system_prompt(tone: Tone, source_language: &str, target_language: &str) -> String {
    let template = if source_language == AUTO_SOURCE {
        BASE_TEMPLATE_AUTO
    } else {
        BASE_TEMPLATE
    };

    template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{tone_instruction}", tone_instruction(tone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_languages() {
        let prompt = system_prompt(Tone::Natural, "ja", "en");
        assert!(prompt.contains("from ja into en"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn auto_source_switches_to_detection() {
        let prompt = system_prompt(Tone::Natural, AUTO_SOURCE, "en");
        assert!(prompt.contains("Detect the language"));
        assert!(!prompt.contains("auto"));
    }

    #[test]
    fn each_tone_produces_a_distinct_instruction() {
        let mut seen = std::collections::HashSet::new();
        for tone in Tone::ALL {
            assert!(seen.insert(system_prompt(tone, "en", "ja")));
        }
    }
}
