//! Flattening page-builder documents into plain text.
//!
//! The extractor walks the row → column → addon tree depth-first and
//! dispatches on the addon type. Known types get a precise handler; unknown
//! types fall back to a generic settings scan that keeps every string value
//! that is not a URL and not a bare HTML tag, recursing into nested arrays
//! and maps. Nested addons are extracted recursively.
//!
//! Malformed JSON never reaches the caller as an error: it is logged and
//! the extractor yields an empty string, so the owning page is still scored
//! on its title and other fields.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::document::node::{Addon, Node, PageBuilderDocument};

/// Strips anything that looks like an HTML/XML tag.
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static pattern"));

/// Matches a value that is nothing but a single tag.
static BARE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[^>]+>$").expect("static pattern"));

/// Remove HTML tags from a string.
pub fn strip_tags(input: &str) -> String {
    TAG.replace_all(input, "").into_owned()
}

/// Whether a settings value is a URL rather than prose.
fn looks_like_url(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with("//")
        || trimmed.starts_with("mailto:")
}

/// Flattens page-builder documents into searchable plain text.
#[derive(Debug, Clone, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        TextExtractor
    }

    /// Extract text from a raw JSON document body.
    ///
    /// Returns an empty string for empty or malformed input; a parse
    /// failure is logged with the owning page id for diagnosis.
    pub fn extract(&self, raw: &str, page_id: i64) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let document = match PageBuilderDocument::from_json(raw) {
            Ok(document) => document,
            Err(e) => {
                warn!(page_id, error = %e, "malformed page-builder document, skipping body");
                return String::new();
            }
        };

        self.extract_document(&document)
    }

    /// Extract text from an already-deserialized document.
    pub fn extract_document(&self, document: &PageBuilderDocument) -> String {
        let mut text = String::new();

        for node in &document.nodes {
            if node.is_row() {
                self.walk_row(node, &mut text);
            } else if let Some(addon) = node.as_addon() {
                self.walk_addon(&addon, &mut text);
            }
        }

        text.trim().to_string()
    }

    fn walk_row(&self, row: &Node, text: &mut String) {
        for column in &row.columns {
            for addon in &column.addons {
                self.walk_addon(addon, text);
            }
        }

        // Legacy exports attach addons directly to the row
        for addon in &row.addons {
            self.walk_addon(addon, text);
        }
    }

    fn walk_addon(&self, addon: &Addon, text: &mut String) {
        match addon.kind.as_str() {
            "heading" => self.extract_heading(addon, text),
            "text_block" | "text" => self.extract_text_block(addon, text),
            _ => self.extract_generic(addon, text),
        }

        for nested in &addon.addons {
            self.walk_addon(nested, text);
        }
    }

    /// Heading addons contribute their title and optional subtitle.
    fn extract_heading(&self, addon: &Addon, text: &mut String) {
        if let Some(title) = addon.setting_str("title") {
            push_text(text, &strip_tags(title));
        }
        if let Some(subtitle) = addon.setting_str("subtitle") {
            push_text(text, &strip_tags(subtitle));
        }
    }

    /// Text addons contribute their body with markup removed.
    fn extract_text_block(&self, addon: &Addon, text: &mut String) {
        if let Some(body) = addon.setting_str("text") {
            push_text(text, &strip_tags(body));
        }
    }

    /// Fallback for unknown addon types: keep every string value in the
    /// settings map that is prose, recursing into nested structures.
    fn extract_generic(&self, addon: &Addon, text: &mut String) {
        for value in addon.settings.values() {
            self.extract_value(value, text);
        }
    }

    fn extract_value(&self, value: &serde_json::Value, text: &mut String) {
        match value {
            serde_json::Value::String(s) => {
                if !s.is_empty() && !looks_like_url(s) && !BARE_TAG.is_match(s.trim()) {
                    push_text(text, &strip_tags(s));
                }
            }
            serde_json::Value::Array(items) => {
                for item in items {
                    self.extract_value(item, text);
                }
            }
            serde_json::Value::Object(map) => {
                for item in map.values() {
                    self.extract_value(item, text);
                }
            }
            _ => {}
        }
    }
}

fn push_text(text: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(piece);
}
