//! Result caching.
//!
//! Whole result sets are cached under a fingerprint of the normalized
//! query, the option set, the viewer-group signature, and the language —
//! so access-controlled results are never served across permission
//! boundaries. Entries carry a TTL and a hit counter.

pub mod fingerprint;
pub mod result_cache;

// Re-export commonly used types
pub use fingerprint::*;
pub use result_cache::*;
