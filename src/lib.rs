//! # Ferret
//!
//! A multi-source site search engine: retrieves candidates from articles,
//! page-builder pages, and custom field values, scores their relevance,
//! merges and deduplicates across sources, generates highlighted snippets,
//! and caches whole result sets per viewer segment.
//!
//! ## Features
//!
//! - Query normalization with stop words and minimal suffix stemming
//! - Recursive text extraction from nested page-builder documents
//! - Multi-factor relevance scoring (occurrences, position, word
//!   boundaries, stemming, proximity, recency), normalized to 0–100
//! - Parallel source retrieval with per-source timeouts
//! - TTL-based, viewer-segmented result cache with hit accounting
//! - Query analytics, trending views, and autocomplete suggestions

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod content;
pub mod context;
pub mod document;
pub mod error;
pub mod scoring;
pub mod search;
pub mod server;
pub mod source;
pub mod suggest;

pub mod prelude {}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
