//! Page-builder document handling.
//!
//! Page-builder pages store their body as a nested JSON structure of rows,
//! columns, and typed addons. This module deserializes that structure,
//! flattens it into a plain-text blob for scoring and snippets, and caches
//! the flattened text per (page id, content hash) so unchanged documents
//! are never re-parsed.

pub mod extractor;
pub mod node;
pub mod text_cache;

// Re-export commonly used types
pub use extractor::*;
pub use node::*;
pub use text_cache::*;
