//! Minimal suffix stemming.
//!
//! A deliberately small stemmer: it strips one of a fixed set of trailing
//! suffixes, longest match first, and nothing else. This matches the
//! substring-scan retrieval model — the stem only needs to line up with the
//! stems produced for document text, not be linguistically correct.

/// Suffixes stripped by [`stem_word`], longest first so that e.g. "walking"
/// loses "ing" rather than just "g...s" variants.
const SUFFIXES: &[&str] = &["ing", "est", "ed", "es", "er", "s"];

/// Stem a single lowercase word by stripping the longest matching suffix.
///
/// A suffix is only stripped when more than two characters remain, so
/// short words like "ring" or "best" pass through unchanged.
///
/// # Examples
///
/// ```
/// use ferret::analysis::stem::stem_word;
///
/// assert_eq!(stem_word("searching"), "search");
/// assert_eq!(stem_word("tables"), "tabl");
/// assert_eq!(stem_word("joomla"), "joomla");
/// ```
pub fn stem_word(word: &str) -> &str {
    for suffix in SUFFIXES {
        if word.len() > suffix.len() + 2 && word.ends_with(suffix) {
            return &word[..word.len() - suffix.len()];
        }
    }
    word
}

/// Stem every whitespace-separated word of a phrase.
///
/// Used when matching a stemmed query term against document text: the text
/// is stemmed the same way the term was.
pub fn stem_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(stem_word)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_stripping() {
        assert_eq!(stem_word("searching"), "search");
        assert_eq!(stem_word("searched"), "search");
        assert_eq!(stem_word("searches"), "search");
        assert_eq!(stem_word("builders"), "builder");
        assert_eq!(stem_word("greatest"), "great");
    }

    #[test]
    fn test_longest_match_first() {
        // "ing" wins over "s"-style endings
        assert_eq!(stem_word("testing"), "test");
        // "es" wins over "s"
        assert_eq!(stem_word("branches"), "branch");
    }

    #[test]
    fn test_short_words_untouched() {
        assert_eq!(stem_word("as"), "as");
        assert_eq!(stem_word("test"), "test");
        assert_eq!(stem_word("red"), "red");
        assert_eq!(stem_word("ring"), "ring");
    }

    #[test]
    fn test_stem_phrase() {
        assert_eq!(stem_phrase("searching the tables"), "search the tabl");
        assert_eq!(stem_phrase(""), "");
    }
}
