//! Query analytics and autocomplete suggestions.
//!
//! Every search is recorded as an append-only analytics row; the
//! suggestion engine mines that history (plus item titles, categories, and
//! tags) for autocomplete candidates, and the trending aggregation groups
//! the history by query text over a time window.

pub mod analytics;
pub mod engine;

// Re-export commonly used types
pub use analytics::*;
pub use engine::*;
