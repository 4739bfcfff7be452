//! Query term extraction and validation.
//!
//! The [`TermProcessor`] is the first stage of every search: it rejects
//! queries carrying SQL metacharacter patterns (the source adapters build
//! substring scans from the terms, so suspicious input is a hard validation
//! failure), then normalizes the query into an ordered, duplicate-free term
//! list.
//!
//! # Examples
//!
//! ```
//! use ferret::analysis::terms::TermProcessor;
//!
//! let processor = TermProcessor::new(2);
//! let terms = processor.extract("The Searching Tables").unwrap();
//! assert_eq!(terms, vec!["search", "tabl"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::analysis::stem::stem_word;
use crate::analysis::stop::StopWords;
use crate::error::{FerretError, Result};

/// Patterns that mark a query as a SQL-injection probe. The first match
/// rejects the query outright.
static SQL_METACHARACTER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(?:union|select|insert|update|delete|drop|create|alter)\b",
        r"--",
        r"#",
        r"/\*",
        r"\*/",
        r";",
        r#"(?i)\b(?:or|and)\b\s+\d+\s*=\s*\d+"#,
        r#"(?i)\b(?:or|and)\b\s+['"]\s*=\s*['"]"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static pattern"))
    .collect()
});

/// Collapses runs of whitespace during normalization.
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static pattern"));

/// Normalizes a raw query string into search terms.
///
/// The pipeline is: lowercase → collapse whitespace → split → drop stop
/// words → drop terms shorter than the minimum → stem → deduplicate
/// preserving first-seen order.
#[derive(Clone, Debug)]
pub struct TermProcessor {
    stop_words: StopWords,
    min_term_length: usize,
}

impl TermProcessor {
    /// Create a processor with the default English stop words.
    pub fn new(min_term_length: usize) -> Self {
        TermProcessor {
            stop_words: StopWords::new(),
            min_term_length,
        }
    }

    /// Create a processor with a custom stop word set.
    pub fn with_stop_words(min_term_length: usize, stop_words: StopWords) -> Self {
        TermProcessor {
            stop_words,
            min_term_length,
        }
    }

    /// Validate a raw query without extracting terms.
    ///
    /// Only SQL metacharacter patterns are a hard failure. A query that is
    /// too short to produce any terms is valid; it simply normalizes to an
    /// empty term list.
    pub fn validate(&self, raw: &str) -> Result<()> {
        if contains_sql_pattern(raw.trim()) {
            return Err(FerretError::validation(
                "query contains disallowed characters",
            ));
        }

        Ok(())
    }

    /// Validate and normalize a raw query into terms.
    ///
    /// An empty result is not an error: a query made entirely of stop
    /// words or sub-minimum-length words is valid and simply matches
    /// nothing.
    pub fn extract(&self, raw: &str) -> Result<Vec<String>> {
        self.validate(raw)?;
        Ok(self.normalize(raw))
    }

    /// Normalize without validating. Used for snippet/suggestion inputs
    /// that were validated upstream.
    pub fn normalize(&self, raw: &str) -> Vec<String> {
        let lowered = raw.trim().to_lowercase();
        let collapsed = WHITESPACE.replace_all(&lowered, " ");

        let mut terms: Vec<String> = Vec::new();
        for word in collapsed.split(' ') {
            if word.is_empty() || self.stop_words.contains(word) {
                continue;
            }
            if word.chars().count() < self.min_term_length {
                continue;
            }
            let stemmed = stem_word(word).to_string();
            if !terms.contains(&stemmed) {
                terms.push(stemmed);
            }
        }

        terms
    }

    /// The configured minimum term length.
    pub fn min_term_length(&self) -> usize {
        self.min_term_length
    }

    /// Access the stop word set.
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }
}

impl Default for TermProcessor {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Check whether a string contains a SQL metacharacter pattern.
pub fn contains_sql_pattern(input: &str) -> bool {
    SQL_METACHARACTER_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extraction() {
        let processor = TermProcessor::new(2);
        let terms = processor.extract("joomla search").unwrap();

        assert_eq!(terms, vec!["joomla", "search"]);
    }

    #[test]
    fn test_stop_words_and_short_terms_dropped() {
        let processor = TermProcessor::new(2);
        let terms = processor.extract("the quick and the dead").unwrap();

        // "the" and "and" are stop words; "quick"/"dead" survive stemming
        assert_eq!(terms, vec!["quick", "dead"]);
    }

    #[test]
    fn test_whitespace_collapsed_and_lowercased() {
        let processor = TermProcessor::new(2);
        let terms = processor.extract("  Joomla\t\tSEARCH  ").unwrap();

        assert_eq!(terms, vec!["joomla", "search"]);
    }

    #[test]
    fn test_deduplication_preserves_first_seen_order() {
        let processor = TermProcessor::new(2);
        // "searching" and "searches" stem to the same term
        let terms = processor.extract("searching pages searches").unwrap();

        assert_eq!(terms, vec!["search", "pag"]);
    }

    #[test]
    fn test_all_stop_words_yields_empty_terms() {
        let processor = TermProcessor::new(2);
        let terms = processor.extract("the and or").unwrap();

        assert!(terms.is_empty());
    }

    #[test]
    fn test_too_short_query_yields_no_terms() {
        let processor = TermProcessor::new(2);

        assert_eq!(processor.extract("a").unwrap(), Vec::<String>::new());
        assert_eq!(processor.extract(" ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_sql_patterns_rejected() {
        let processor = TermProcessor::new(2);

        assert!(processor.extract("UNION SELECT password").is_err());
        assert!(processor.extract("test; drop table users").is_err());
        assert!(processor.extract("test -- comment").is_err());
        assert!(processor.extract("x OR 1=1").is_err());
        assert!(processor.extract("/* probe */").is_err());
    }

    #[test]
    fn test_plain_queries_pass_validation() {
        let processor = TermProcessor::new(2);

        assert!(processor.validate("ordinary search text").is_ok());
        // "androids" contains "and" only as a substring, not a keyword
        assert!(processor.validate("androids dream").is_ok());
    }
}
