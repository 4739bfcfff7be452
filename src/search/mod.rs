//! The integrated search pipeline.
//!
//! [`SearchEngine`] orchestrates one request end to end: validate, extract
//! terms, consult the result cache, fan the source adapters out in
//! parallel, score every candidate, merge and paginate, generate
//! highlighted snippets, store the result set, and record analytics.

pub mod engine;
pub mod merger;
pub mod snippet;
pub mod types;

// Re-export commonly used types
pub use engine::*;
pub use merger::*;
pub use snippet::*;
pub use types::*;
