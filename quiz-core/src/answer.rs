/// Lowercase and strip everything outside `[a-z0-9]`, so punctuation,
/// spacing, and case differences never fail a guess ("Mr. Mime" matches
/// "mr-mime").
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Whether a guess names the target. Both sides go through the same
/// normalization before comparison. A guess that normalizes to nothing is
/// always rejected, even against a target that also normalizes to nothing,
/// so submitting blank or pure-punctuation input can never score.
pub fn is_match(guess: &str, target: &str) -> bool {
    let guess = normalize(guess);
    !guess.is_empty() && guess == normalize(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_strips() {
        assert_eq!(normalize("Pikachu"), "pikachu");
        assert_eq!(normalize("Mr. Mime"), "mrmime");
        assert_eq!(normalize("  Porygon-Z  "), "porygonz");
        assert_eq!(normalize("Nidoran♀"), "nidoran");
    }

    #[test]
    fn match_ignores_case_and_punctuation() {
        assert!(is_match("PIKACHU", "pikachu"));
        assert!(is_match("mr mime", "mr-mime"));
        assert!(is_match("farfetch'd", "farfetchd"));
        assert!(!is_match("raichu", "pikachu"));
    }

    #[test]
    fn empty_normalized_guess_never_matches() {
        assert!(!is_match("", "pikachu"));
        assert!(!is_match("!!!", "pikachu"));
        // Even a target with no normalizable characters stays unmatchable.
        assert!(!is_match("!!!", "???"));
        assert!(!is_match("", ""));
    }
}
