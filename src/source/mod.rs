//! Content source adapters.
//!
//! Each adapter retrieves candidate items from one logical origin through
//! the [`ContentRepository`](crate::content::ContentRepository)
//! collaborator, applying the publication, language, access, and category
//! filters itself. Adapters only return items containing at least one
//! query term; scoring happens downstream.

pub mod article;
pub mod custom_field;
pub mod page_builder;

// Re-export commonly used types
pub use article::*;
pub use custom_field::*;
pub use page_builder::*;

use crate::content::item::{ContentItem, SourceType};
use crate::context::RequestContext;
use crate::error::Result;

/// What an adapter needs to know about one retrieval.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Normalized query terms.
    pub terms: Vec<String>,
    /// Restrict to these category ids; empty means no restriction.
    pub categories: Vec<i64>,
    /// Upper bound on candidates returned by this source.
    pub max_results: usize,
    /// Whether article candidates are enriched with custom-field text.
    pub include_custom_fields: bool,
}

impl FetchRequest {
    /// Build a request for the given terms with no category restriction.
    pub fn new(terms: Vec<String>) -> Self {
        FetchRequest {
            terms,
            categories: Vec::new(),
            max_results: 50,
            include_custom_fields: true,
        }
    }

    /// Whether a category passes the filter.
    pub fn category_allowed(&self, category_id: i64) -> bool {
        self.categories.is_empty() || self.categories.contains(&category_id)
    }
}

/// One logical origin of searchable content.
///
/// `fetch` returns only candidates that match at least one term and pass
/// the viewer's filters. A source whose backing feature is absent returns
/// an empty list, not an error.
pub trait ContentSource: Send + Sync + std::fmt::Debug {
    /// Which source this adapter serves.
    fn source_type(&self) -> SourceType;

    /// Retrieve candidate items for the request.
    fn fetch(&self, request: &FetchRequest, ctx: &RequestContext) -> Result<Vec<ContentItem>>;
}

/// Case-insensitive check that any term occurs in any of the given texts.
pub(crate) fn any_term_matches(terms: &[String], texts: &[&str]) -> bool {
    texts.iter().any(|text| {
        let lowered = text.to_lowercase();
        terms.iter().any(|term| lowered.contains(term.as_str()))
    })
}
