//! Stop word filtering.
//!
//! Provides the default English stop-word list used during term extraction
//! and a small wrapper type supporting custom lists.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

/// Default English stop words list.
///
/// Common English words that are filtered out of queries because they don't
/// contribute to relevance.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "as",
    "is", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "not",
    "this", "that", "these", "those", "am", "are",
];

/// Default English stop words as a HashSet.
pub static DEFAULT_ENGLISH_STOP_WORDS_SET: LazyLock<HashSet<String>> = LazyLock::new(|| {
    DEFAULT_ENGLISH_STOP_WORDS
        .iter()
        .map(|&s| s.to_string())
        .collect()
});

/// A set of stop words to exclude from query terms.
///
/// # Examples
///
/// ```
/// use ferret::analysis::stop::StopWords;
///
/// let stops = StopWords::new();
/// assert!(stops.contains("the"));
/// assert!(!stops.contains("search"));
/// ```
#[derive(Clone, Debug)]
pub struct StopWords {
    words: Arc<HashSet<String>>,
}

impl StopWords {
    /// Create a stop word set with the default English list.
    pub fn new() -> Self {
        Self::with_words(DEFAULT_ENGLISH_STOP_WORDS_SET.clone())
    }

    /// Create a stop word set from an existing HashSet.
    pub fn with_words(words: HashSet<String>) -> Self {
        StopWords {
            words: Arc::new(words),
        }
    }

    /// Create a stop word set from a list of words.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferret::analysis::stop::StopWords;
    ///
    /// let stops = StopWords::from_words(vec!["foo", "bar"]);
    /// assert_eq!(stops.len(), 2);
    /// ```
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(|s| s.into()).collect();
        Self::with_words(words)
    }

    /// Check if a word is a stop word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Get the number of stop words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Check if the stop word set is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new()
    }
}
