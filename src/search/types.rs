//! Request and response types for the search pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::item::{ContentItem, SourceType};

/// Caller-supplied options for one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Results per page. `None` or `Some(0)` selects the configured
    /// default; oversized requests are clamped to the maximum.
    pub limit: Option<usize>,
    /// Number of results to skip.
    pub offset: usize,
    /// Restrict to these category ids; empty means all.
    pub categories: Vec<i64>,
    /// Restrict to these sources; empty means all enabled sources.
    pub source_types: Vec<SourceType>,
    /// Include configuration and timing diagnostics in the response.
    pub debug: bool,
}

impl SearchOptions {
    /// Options with everything at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Restrict to one source type.
    pub fn source(mut self, source: SourceType) -> Self {
        self.source_types = vec![source];
        self
    }

    /// Restrict to the given categories.
    pub fn categories(mut self, categories: Vec<i64>) -> Self {
        self.categories = categories;
        self
    }

    /// Whether a source participates under this option set.
    pub fn source_enabled(&self, source: SourceType) -> bool {
        self.source_types.is_empty() || self.source_types.contains(&source)
    }
}

/// A fully normalized search request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The raw query text, trimmed.
    pub raw: String,
    /// Normalized terms in first-seen order.
    pub terms: Vec<String>,
    /// Requested content language.
    pub language: String,
    /// Viewer's authorized access levels.
    pub access_levels: Vec<i64>,
    /// Effective page size after clamping.
    pub limit: usize,
    /// Effective page offset.
    pub offset: usize,
    /// Participating sources.
    pub source_types: Vec<SourceType>,
    /// Category restriction; empty means all.
    pub categories: Vec<i64>,
}

/// One scored, ready-to-present result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub item: ContentItem,
    /// Relevance in 0–100.
    pub relevance: u32,
    pub snippet: String,
    pub url: String,
}

impl ScoredResult {
    /// Flatten into the wire representation.
    pub fn into_entry(self) -> ResultEntry {
        let (matched_fields, field_match_count) = match &self.item {
            ContentItem::CustomField(hit) => {
                (Some(hit.matched_fields.clone()), Some(hit.match_count))
            }
            _ => (None, None),
        };

        ResultEntry {
            id: self.item.id(),
            title: self.item.title().to_string(),
            url: self.url,
            source: self.item.source_type().as_str().to_string(),
            type_label: self.item.source_type().label().to_string(),
            relevance: self.relevance,
            snippet: self.snippet,
            category: self.item.category_id(),
            created: self.item.created(),
            matched_fields,
            field_match_count,
        }
    }
}

/// One result row in the wire response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub source: String,
    pub type_label: String,
    pub relevance: u32,
    pub snippet: String,
    pub category: i64,
    pub created: DateTime<Utc>,
    /// Titles of matched custom fields, for custom-field hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_fields: Option<Vec<String>>,
    /// Number of matched custom fields, for custom-field hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_match_count: Option<usize>,
}

/// Per-phase timings included with `debug=true`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchTimings {
    pub retrieval_ms: f64,
    pub scoring_ms: f64,
    pub snippets_ms: f64,
}

/// Diagnostics included with `debug=true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugInfo {
    pub terms: Vec<String>,
    pub types_searched: Vec<String>,
    pub candidates: usize,
    pub timings: SearchTimings,
    pub config: crate::config::SearchConfig,
}

/// The search response, as serialized to callers and into the cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub results: Vec<ResultEntry>,
    pub total: usize,
    pub query: String,
    /// Wall-clock duration of this search in seconds.
    pub search_time: f64,
    /// Whether this response was served from the result cache.
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

impl SearchResponse {
    /// An empty successful response.
    pub fn empty(query: &str) -> Self {
        SearchResponse {
            success: true,
            error: None,
            results: Vec::new(),
            total: 0,
            query: query.to_string(),
            search_time: 0.0,
            cached: false,
            debug: None,
        }
    }

    /// A validation-failure response.
    pub fn failure(query: &str, error: &str) -> Self {
        SearchResponse {
            success: false,
            error: Some(error.to_string()),
            results: Vec::new(),
            total: 0,
            query: query.to_string(),
            search_time: 0.0,
            cached: false,
            debug: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_enabled_defaults_to_all() {
        let options = SearchOptions::new();
        assert!(options.source_enabled(SourceType::Article));
        assert!(options.source_enabled(SourceType::PageBuilder));

        let restricted = SearchOptions::new().source(SourceType::Article);
        assert!(restricted.source_enabled(SourceType::Article));
        assert!(!restricted.source_enabled(SourceType::PageBuilder));
    }

    #[test]
    fn test_response_serialization_skips_empty_extras() {
        let response = SearchResponse::empty("test");
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"success\":true"));
        assert!(!json.contains("error"));
        assert!(!json.contains("debug"));
    }

    #[test]
    fn test_failure_response() {
        let response = SearchResponse::failure("x;y", "invalid query");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("invalid query"));
        assert_eq!(response.total, 0);
    }
}
