//! Content model shared by every source adapter.
//!
//! Defines the records a content repository hands out, the [`ContentItem`]
//! sum type that unifies the three source-specific result shapes behind
//! common accessors, and the repository collaborator trait with its
//! in-memory implementation.

pub mod item;
pub mod repository;
pub mod url;

// Re-export commonly used types
pub use item::*;
pub use repository::*;
pub use url::*;
