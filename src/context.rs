//! Request-scoped context and memoization.
//!
//! Nothing in the engine reads ambient state: the viewer's language, access
//! levels, and identifiers travel in a [`RequestContext`] passed into every
//! component call. [`RequestCache`] replaces the per-request memo tables
//! the engine needs (category lookups are repeated for every result row);
//! it lives for exactly one search invocation and is passed by `&mut`.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::content::item::CategoryRecord;
use crate::content::repository::ContentRepository;

/// Everything about the requesting viewer that retrieval and caching
/// depend on. Immutable for the duration of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Requested content language tag; `*` matches any.
    pub language: String,
    /// Access levels the viewer is authorized to see.
    pub access_levels: Vec<i64>,
    /// Authenticated user id, if any.
    pub user_id: Option<i64>,
    /// Session identifier, for analytics.
    pub session_id: String,
    /// Client address, for analytics.
    pub ip_address: String,
    /// Client user agent, for analytics.
    pub user_agent: String,
}

impl RequestContext {
    /// Context for an anonymous public viewer.
    pub fn anonymous() -> Self {
        RequestContext {
            language: "*".to_string(),
            access_levels: vec![1],
            user_id: None,
            session_id: String::new(),
            ip_address: String::new(),
            user_agent: String::new(),
        }
    }

    /// Set the language tag.
    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = language.into();
        self
    }

    /// Set the authorized access levels.
    pub fn with_access_levels(mut self, levels: Vec<i64>) -> Self {
        self.access_levels = levels;
        self
    }

    /// Set the session id.
    pub fn with_session<S: Into<String>>(mut self, session_id: S) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Whether the viewer may see content at the given access level.
    pub fn can_access(&self, level: i64) -> bool {
        self.access_levels.contains(&level)
    }

    /// Whether content in the given language is visible under this
    /// context's language filter.
    pub fn language_matches(&self, content_language: &str) -> bool {
        self.language == "*" || content_language == "*" || content_language == self.language
    }

    /// Signature of the viewer's group membership, used to segment the
    /// result cache so access-controlled results never leak across
    /// permission boundaries.
    pub fn group_signature(&self) -> String {
        let mut levels = self.access_levels.clone();
        levels.sort_unstable();
        levels.dedup();
        levels
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Short-lived memo cache scoped to one search invocation.
#[derive(Debug, Default)]
pub struct RequestCache {
    categories: AHashMap<i64, Option<CategoryRecord>>,
}

impl RequestCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn category(
        &mut self,
        repository: &dyn ContentRepository,
        id: i64,
    ) -> Option<&CategoryRecord> {
        self.categories
            .entry(id)
            .or_insert_with(|| repository.category(id).ok().flatten())
            .as_ref()
    }

    /// Title of a category, memoized. Empty when unknown.
    pub fn category_title(&mut self, repository: &dyn ContentRepository, id: i64) -> String {
        self.category(repository, id)
            .map(|c| c.title.clone())
            .unwrap_or_default()
    }

    /// Alias of a category, memoized. Empty when unknown.
    pub fn category_alias(&mut self, repository: &dyn ContentRepository, id: i64) -> String {
        self.category(repository, id)
            .map(|c| c.alias.clone())
            .unwrap_or_default()
    }
}
