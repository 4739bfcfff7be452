//! Node types for page-builder documents.
//!
//! The document is an ordered sequence of rows; rows hold columns; columns
//! hold addons. Addons carry a free-form settings map and may nest child
//! addons. Real-world exports are loose about this shape (legacy exports
//! put addons directly on rows, or at the top level), so every collection
//! here is optional and defaults to empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page-builder document: the top-level node list of a page body.
///
/// Nodes are usually rows, but a top-level bare addon is accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageBuilderDocument {
    /// Top-level nodes in document order.
    pub nodes: Vec<Node>,
}

impl PageBuilderDocument {
    /// Deserialize a document from its raw JSON body.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

/// One node of the document tree.
///
/// `kind` is the declared type string ("row", "heading", "text_block", or
/// any addon type). Unknown keys in the export are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Declared type of this node.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Columns, for row nodes.
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Addons attached directly to this node (legacy row exports and
    /// nested-addon containers).
    #[serde(default)]
    pub addons: Vec<Addon>,

    /// Settings map, when this node is itself an addon.
    #[serde(default)]
    pub settings: serde_json::Map<String, Value>,
}

impl Node {
    /// Whether this node is a row (declared or legacy-shaped).
    pub fn is_row(&self) -> bool {
        self.kind.as_deref() == Some("row") || !self.columns.is_empty()
    }

    /// View this node as an addon, when it has a non-row type.
    pub fn as_addon(&self) -> Option<Addon> {
        match self.kind.as_deref() {
            Some("row") | None => None,
            Some(kind) => Some(Addon {
                kind: kind.to_string(),
                settings: self.settings.clone(),
                addons: self.addons.clone(),
            }),
        }
    }
}

/// A column inside a row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Column {
    /// Addons in this column, in display order.
    #[serde(default)]
    pub addons: Vec<Addon>,
}

/// A single addon: a typed block with arbitrary settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Addon {
    /// Addon type string, e.g. "heading" or "text_block".
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Arbitrary key/value settings; values may be nested arrays or maps.
    #[serde(default)]
    pub settings: serde_json::Map<String, Value>,

    /// Child addons, for container addons.
    #[serde(default)]
    pub addons: Vec<Addon>,
}

impl Addon {
    /// Fetch a settings value as a string, if present and a string.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}
