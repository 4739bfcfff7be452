//! Relevance scoring.
//!
//! Pure functions and one scorer type: no retrieval, no I/O. Adapters hand
//! the scorer a [`FieldSet`] of extracted text plus the term list; the
//! scorer returns a 0–100 integer.

pub mod scorer;
pub mod weights;

// Re-export commonly used types
pub use scorer::*;
pub use weights::*;
