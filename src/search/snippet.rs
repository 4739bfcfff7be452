//! Highlighted snippet generation.
//!
//! Splits the item's text into sentence-like segments, scores each by the
//! terms it contains (with a bonus for a term near the segment start), and
//! presents the best one. When no segment scores, the fallback is a window
//! centered on the earliest term occurrence, elided with `...` at cut
//! boundaries. All matched terms are wrapped in the highlight tag,
//! case-insensitively, longest term first so shorter terms never split a
//! longer match.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::SnippetConfig;
use crate::document::extractor::strip_tags;

/// Sentence-ish boundaries.
static SEGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("static pattern"));

/// Generates highlighted excerpts.
#[derive(Debug, Clone)]
pub struct SnippetGenerator {
    config: SnippetConfig,
}

impl SnippetGenerator {
    /// Create a generator with the given configuration.
    pub fn new(config: SnippetConfig) -> Self {
        SnippetGenerator { config }
    }

    /// Produce a highlighted snippet of `text` for the given terms.
    pub fn generate(&self, text: &str, terms: &[String]) -> String {
        let text = strip_tags(text);
        let text = text.trim();
        if text.is_empty() {
            return String::new();
        }

        let snippet = match self.best_segment(text, terms) {
            Some(segment) => self.truncate(segment),
            None => self.window_around_first_match(text, terms),
        };

        self.highlight(&snippet, terms)
    }

    /// Pick the sentence-like segment containing the most terms.
    fn best_segment<'a>(&self, text: &'a str, terms: &[String]) -> Option<&'a str> {
        let mut best: Option<&str> = None;
        let mut best_score = 0u32;

        for segment in SEGMENT_SPLIT.split(text) {
            let segment = segment.trim();
            if segment.len() < self.config.min_segment_length {
                continue;
            }

            let lowered = segment.to_lowercase();
            let mut score = 0u32;
            for term in terms {
                if let Some(pos) = lowered.find(term.as_str()) {
                    score += 10;
                    if pos < 10 {
                        score += 5;
                    }
                }
            }

            if score > best_score {
                best_score = score;
                best = Some(segment);
            }
        }

        best
    }

    /// Fallback: a window centered on the earliest occurrence of any term,
    /// starting at the text head when nothing matches.
    fn window_around_first_match(&self, text: &str, terms: &[String]) -> String {
        let lowered = text.to_lowercase();
        let first_match = terms
            .iter()
            .filter_map(|term| lowered.find(term.as_str()))
            .min()
            .unwrap_or(0);

        let length = self.config.length;
        let start = floor_char_boundary(text, first_match.saturating_sub(length / 2));
        let end = floor_char_boundary(text, (start + length).min(text.len()));

        let mut snippet = text[start..end].trim().to_string();
        if start > 0 {
            snippet = format!("...{snippet}");
        }
        if end < text.len() {
            snippet = format!("{snippet}...");
        }
        snippet
    }

    /// Truncate an over-long segment at a character boundary.
    fn truncate(&self, segment: &str) -> String {
        if segment.len() <= self.config.length {
            return segment.to_string();
        }
        let end = floor_char_boundary(segment, self.config.length);
        format!("{}...", segment[..end].trim_end())
    }

    /// Wrap every term occurrence in the highlight tag. A single
    /// alternation ordered longest-first keeps shorter terms from breaking
    /// up a longer match.
    fn highlight(&self, snippet: &str, terms: &[String]) -> String {
        let mut sorted: Vec<&String> = terms.iter().filter(|t| !t.is_empty()).collect();
        if sorted.is_empty() {
            return snippet.to_string();
        }
        sorted.sort_by_key(|term| std::cmp::Reverse(term.len()));

        let alternation = sorted
            .iter()
            .map(|term| regex::escape(term))
            .collect::<Vec<_>>()
            .join("|");
        let Ok(pattern) = Regex::new(&format!("(?i){alternation}")) else {
            return snippet.to_string();
        };

        let opening = self.config.opening_tag();
        let closing = self.config.closing_tag();
        pattern
            .replace_all(snippet, |caps: &regex::Captures| {
                format!("{opening}{}{closing}", &caps[0])
            })
            .into_owned()
    }
}

impl Default for SnippetGenerator {
    fn default() -> Self {
        Self::new(SnippetConfig::default())
    }
}

/// Largest index `<= at` that lands on a char boundary.
fn floor_char_boundary(text: &str, at: usize) -> usize {
    if at >= text.len() {
        return text.len();
    }
    let mut at = at;
    while at > 0 && !text.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> SnippetGenerator {
        SnippetGenerator::default()
    }

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_best_segment_chosen_and_highlighted() {
        let text = "Intro sentence about nothing much at all. \
                    Joomla search works through several sources together. \
                    A closing sentence.";

        let snippet = generator().generate(text, &terms(&["joomla", "search"]));

        assert!(snippet.contains("<mark>Joomla</mark>"));
        assert!(snippet.contains("<mark>search</mark>"));
        assert!(!snippet.contains("closing"));
    }

    #[test]
    fn test_highlight_is_case_insensitive() {
        let snippet = generator().generate(
            "SEARCH tools and Search tips make searching easier today.",
            &terms(&["search"]),
        );

        assert!(snippet.contains("<mark>SEARCH</mark>"));
        assert!(snippet.contains("<mark>Search</mark>"));
        // "searching" contains the term too
        assert!(snippet.contains("<mark>search</mark>ing"));
    }

    #[test]
    fn test_longest_term_highlighted_first() {
        let snippet = generator().generate(
            "The searching never stops around here, truly never.",
            &terms(&["search", "searching"]),
        );

        assert!(snippet.contains("<mark>searching</mark>"));
        assert!(!snippet.contains("<mark><mark>"));
    }

    #[test]
    fn test_window_fallback_with_ellipses() {
        // The only matching segment is too short to qualify, so no segment
        // scores and the window fallback centers on the first occurrence
        let padding = "word ".repeat(80);
        let text = format!("{padding}. ferret den. {padding}");

        let snippet = generator().generate(&text, &terms(&["ferret"]));

        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("<mark>ferret</mark>"));
    }

    #[test]
    fn test_no_match_returns_text_head() {
        let text = "Short unrelated text without the query.";
        let snippet = generator().generate(text, &terms(&["zebra"]));

        assert!(snippet.contains("Short unrelated"));
        assert!(!snippet.contains("<mark>"));
    }

    #[test]
    fn test_tags_stripped_before_snippeting() {
        let snippet = generator().generate(
            "<p>The <b>ferret</b> is a lively animal that enjoys tunnels.</p>",
            &terms(&["ferret"]),
        );

        assert!(!snippet.contains("<p>"));
        assert!(!snippet.contains("<b>"));
        assert!(snippet.contains("<mark>ferret</mark>"));
    }

    #[test]
    fn test_long_segment_truncated() {
        let long_sentence = format!("ferret {}", "detail ".repeat(100));
        let config = SnippetConfig {
            length: 50,
            ..Default::default()
        };
        let snippet = SnippetGenerator::new(config).generate(&long_sentence, &terms(&["ferret"]));

        assert!(snippet.ends_with("..."));
        assert!(snippet.len() < 80);
    }

    #[test]
    fn test_empty_text_yields_empty_snippet() {
        assert_eq!(generator().generate("", &terms(&["x"])), "");
        assert_eq!(generator().generate("   ", &terms(&["x"])), "");
    }

    #[test]
    fn test_both_terms_highlighted_in_phrase_segment() {
        let text = "Joomla Search Functionality explained. \
                    This article walks through joomla search configuration in detail.";

        let snippet = generator().generate(text, &terms(&["joomla", "search"]));

        assert!(snippet.to_lowercase().contains("<mark>joomla</mark>"));
        assert!(snippet.to_lowercase().contains("<mark>search</mark>"));
    }
}
