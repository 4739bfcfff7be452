//! Cache for flattened page-builder text.
//!
//! Parsing a page body is the most expensive step of the page-builder
//! source, so the flattened text is kept per page id together with a
//! SHA-256 hash of the raw JSON it came from. A lookup hits only when the
//! hash still matches; any edit to the page changes the hash and forces
//! re-extraction.

use ahash::AHashMap;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

/// Hash a raw document body for cache invalidation.
pub fn content_hash(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    format!("{digest:x}")
}

#[derive(Debug, Clone)]
struct CachedText {
    hash: String,
    text: String,
}

/// Shared cache of flattened page text, keyed by page id and guarded by a
/// content hash.
#[derive(Debug, Default)]
pub struct ParsedTextCache {
    entries: RwLock<AHashMap<i64, CachedText>>,
}

impl ParsedTextCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the flattened text for a page, if the stored hash matches
    /// the hash of the current raw body.
    pub fn get(&self, page_id: i64, hash: &str) -> Option<String> {
        let entries = self.entries.read();
        entries
            .get(&page_id)
            .filter(|cached| cached.hash == hash)
            .map(|cached| cached.text.clone())
    }

    /// Store flattened text for a page, replacing any previous entry.
    pub fn put(&self, page_id: i64, hash: String, text: String) {
        let mut entries = self.entries.write();
        entries.insert(page_id, CachedText { hash, text });
    }

    /// Drop the entry for one page.
    pub fn invalidate(&self, page_id: i64) {
        self.entries.write().remove(&page_id);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_requires_matching_hash() {
        let cache = ParsedTextCache::new();
        let hash = content_hash("[]");

        cache.put(1, hash.clone(), "welcome".to_string());

        assert_eq!(cache.get(1, &hash), Some("welcome".to_string()));
        // Different content hash means the document changed
        assert_eq!(cache.get(1, &content_hash("[{}]")), None);
        assert_eq!(cache.get(2, &hash), None);
    }

    #[test]
    fn test_put_replaces_stale_entry() {
        let cache = ParsedTextCache::new();
        let old_hash = content_hash("old");
        let new_hash = content_hash("new");

        cache.put(1, old_hash.clone(), "old text".to_string());
        cache.put(1, new_hash.clone(), "new text".to_string());

        assert_eq!(cache.get(1, &old_hash), None);
        assert_eq!(cache.get(1, &new_hash), Some("new text".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ParsedTextCache::new();
        cache.put(1, content_hash("a"), "a".to_string());
        cache.put(2, content_hash("b"), "b".to_string());

        cache.invalidate(1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_content_hash_is_stable() {
        assert_eq!(content_hash("same"), content_hash("same"));
        assert_ne!(content_hash("same"), content_hash("different"));
    }
}
