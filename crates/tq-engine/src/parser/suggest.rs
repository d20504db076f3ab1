//! Verb suggestions for mistyped commands.

use strsim::jaro_winkler;

use super::command::VERBS;

/// Minimum similarity score for a suggestion (0.0-1.0).
const SUGGEST_THRESHOLD: f64 = 0.75;

/// Suggest the closest known verb to `input`, if any is close enough.
pub fn suggest_verb(input: &str) -> Option<&'static str> {
    let input_lower = input.to_lowercase();
    VERBS
        .iter()
        .map(|verb| (*verb, jaro_winkler(&input_lower, verb)))
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(verb, _)| verb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typo_suggests_verb() {
        assert_eq!(suggest_verb("fihgt"), Some("fight"));
        assert_eq!(suggest_verb("tkae"), Some("take"));
    }

    #[test]
    fn unrelated_word_has_no_suggestion() {
        assert_eq!(suggest_verb("xyzzy"), None);
    }
}
