//! Query text analysis for Ferret.
//!
//! This module turns a raw query string into a normalized, deduplicated
//! list of search terms: lowercasing, whitespace collapsing, stop-word
//! removal, minimum-length filtering, and minimal suffix stemming. It also
//! hosts the SQL-metacharacter validation applied before any source is
//! touched.

pub mod stem;
pub mod stop;
pub mod terms;

// Re-export commonly used types
pub use stem::*;
pub use stop::*;
pub use terms::*;
