//! Error types for the Ferret library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`FerretError`] enum. The variants mirror the engine's error policy:
//! only [`FerretError::Validation`] is ever surfaced to the caller of a
//! search; every other category is logged and degraded (a failing source
//! contributes zero results, a failing cache leaves the search uncached).
//!
//! # Examples
//!
//! ```
//! use ferret::error::{FerretError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(FerretError::validation("query too short"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

/// The main error type for Ferret operations.
///
/// Uses the `thiserror` crate for automatic `Error` trait implementation and
/// provides convenient constructor methods for the common categories.
#[derive(Error, Debug)]
pub enum FerretError {
    /// I/O errors (config files, network listeners, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Query validation failures (too short, SQL metacharacter patterns).
    /// Surfaced to the caller immediately, never retried.
    #[error("Invalid query: {0}")]
    Validation(String),

    /// A backing store or feature is absent (e.g. no page-builder
    /// installed). The source is skipped; this is not a failure.
    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    /// A retrieval against a content source failed. Logged; the source
    /// contributes zero results and the search continues.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Malformed page-builder content. Logged; the extractor yields empty
    /// text and the item is still scored on its other fields.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Result-cache serialization or store failure. Logged; the search
    /// proceeds uncached.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Analytics store failure.
    #[error("Analytics error: {0}")]
    Analytics(String),

    /// Engine configuration errors.
    #[error("Config error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FerretError.
pub type Result<T> = std::result::Result<T, FerretError>;

impl FerretError {
    /// Create a new validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        FerretError::Validation(msg.into())
    }

    /// Create a new source-unavailable error.
    pub fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        FerretError::SourceUnavailable(msg.into())
    }

    /// Create a new retrieval error.
    pub fn retrieval<S: Into<String>>(msg: S) -> Self {
        FerretError::Retrieval(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        FerretError::Parse(msg.into())
    }

    /// Create a new cache error.
    pub fn cache<S: Into<String>>(msg: S) -> Self {
        FerretError::Cache(msg.into())
    }

    /// Create a new analytics error.
    pub fn analytics<S: Into<String>>(msg: S) -> Self {
        FerretError::Analytics(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FerretError::Config(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        FerretError::Retrieval(format!("Timeout: {}", msg.into()))
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FerretError::Other(msg.into())
    }

    /// Whether this error should abort a search. Everything except
    /// validation is degraded in place.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FerretError::Validation(_))
    }
}
