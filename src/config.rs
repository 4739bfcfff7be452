//! Engine configuration.
//!
//! Plain config structs with `Default` implementations and builder-style
//! setters. All of them are serde-deserializable so the binary can load a
//! JSON config file and override individual knobs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::scoring::weights::FieldWeights;

/// Top-level configuration for a [`SearchEngine`](crate::search::SearchEngine).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Minimum length of a query and of an individual term.
    pub min_term_length: usize,

    /// Default number of results per page.
    pub default_limit: usize,

    /// Hard ceiling on the per-page result count.
    pub max_limit: usize,

    /// Upper bound on candidates collected from each source before merging.
    pub max_results: usize,

    /// Per-adapter retrieval timeout in milliseconds. A source that does
    /// not answer in time contributes zero results.
    pub adapter_timeout_ms: u64,

    /// Whether article results are enriched with custom-field text.
    pub include_custom_fields: bool,

    /// Whether searches are recorded for analytics.
    pub enable_analytics: bool,

    /// Relevance scoring field weights.
    pub weights: FieldWeights,

    /// Result cache settings.
    pub cache: CacheConfig,

    /// Snippet generation settings.
    pub snippet: SnippetConfig,

    /// Suggestion engine settings.
    pub suggest: SuggestionConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            min_term_length: 2,
            default_limit: 10,
            max_limit: 100,
            max_results: 50,
            adapter_timeout_ms: 2_000,
            include_custom_fields: true,
            enable_analytics: true,
            weights: FieldWeights::default(),
            cache: CacheConfig::default(),
            snippet: SnippetConfig::default(),
            suggest: SuggestionConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum term length.
    pub fn min_term_length(mut self, len: usize) -> Self {
        self.min_term_length = len;
        self
    }

    /// Set the default page size.
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the per-adapter timeout.
    pub fn adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Enable or disable custom-field enrichment.
    pub fn include_custom_fields(mut self, enabled: bool) -> Self {
        self.include_custom_fields = enabled;
        self
    }

    /// Enable or disable analytics recording.
    pub fn enable_analytics(mut self, enabled: bool) -> Self {
        self.enable_analytics = enabled;
        self
    }

    /// The adapter timeout as a [`Duration`].
    pub fn adapter_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.adapter_timeout_ms)
    }

    /// Clamp a requested page size into `[1, max_limit]`, falling back to
    /// the default for non-positive or absurd requests.
    pub fn clamp_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(n) if n == 0 => self.default_limit,
            Some(n) => n.min(self.max_limit),
            None => self.default_limit,
        }
    }
}

/// Result cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the result cache is consulted at all.
    pub enabled: bool,

    /// Default time-to-live for cached result sets, in seconds.
    pub ttl_secs: u64,

    /// TTL for cached suggestion lists, in seconds.
    pub suggest_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            ttl_secs: 300,
            suggest_ttl_secs: 60,
        }
    }
}

impl CacheConfig {
    /// Default TTL as a [`Duration`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Snippet generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetConfig {
    /// Target snippet length in characters.
    pub length: usize,

    /// Tag wrapped around matched terms (e.g. "mark", "em", "strong").
    pub highlight_tag: String,

    /// Segments shorter than this are never chosen as the best segment.
    pub min_segment_length: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        SnippetConfig {
            length: 250,
            highlight_tag: "mark".to_string(),
            min_segment_length: 20,
        }
    }
}

impl SnippetConfig {
    /// Build the opening highlight tag.
    pub fn opening_tag(&self) -> String {
        format!("<{}>", self.highlight_tag)
    }

    /// Build the closing highlight tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.highlight_tag)
    }
}

/// Suggestion engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Maximum suggestions returned when the caller does not say.
    pub max_suggestions: usize,

    /// Minimum partial-query length before suggestions are computed.
    pub min_query_length: usize,

    /// Whether the raw partial query itself is returned as the top
    /// suggestion.
    pub include_query: bool,

    /// Per-source toggles.
    pub from_history: bool,
    pub from_titles: bool,
    pub from_categories: bool,
    pub from_tags: bool,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            max_suggestions: 10,
            min_query_length: 2,
            include_query: false,
            from_history: true,
            from_titles: true,
            from_categories: true,
            from_tags: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();

        assert_eq!(config.min_term_length, 2);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.max_limit, 100);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_limit_clamping() {
        let config = SearchConfig::default();

        assert_eq!(config.clamp_limit(None), 10);
        assert_eq!(config.clamp_limit(Some(0)), 10);
        assert_eq!(config.clamp_limit(Some(25)), 25);
        assert_eq!(config.clamp_limit(Some(10_000)), 100);
    }

    #[test]
    fn test_builder_setters() {
        let config = SearchConfig::new()
            .min_term_length(3)
            .default_limit(20)
            .enable_analytics(false);

        assert_eq!(config.min_term_length, 3);
        assert_eq!(config.default_limit, 20);
        assert!(!config.enable_analytics);
    }

    #[test]
    fn test_snippet_tags() {
        let config = SnippetConfig::default();
        assert_eq!(config.opening_tag(), "<mark>");
        assert_eq!(config.closing_tag(), "</mark>");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{"min_term_length": 4, "cache": {"ttl_secs": 60}}"#;
        let config: SearchConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.min_term_length, 4);
        assert_eq!(config.cache.ttl_secs, 60);
        // Unspecified fields keep their defaults
        assert_eq!(config.default_limit, 10);
    }
}
