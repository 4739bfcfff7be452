//! TTL-based result cache with hit accounting.
//!
//! One live entry per fingerprint. `get` only serves non-expired entries
//! and bumps the hit counter as a side effect; `set` upserts, replacing
//! the payload and expiry while preserving hits. Expired entries stay on
//! disk-of-record until an explicit [`ResultCache::sweep_expired`] or a
//! [`ResultCache::clear`].

use std::time::Duration;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{FerretError, Result};

/// One cached result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fingerprint this entry is stored under.
    pub key: String,
    /// The query text, kept for cache introspection.
    pub query_text: String,
    /// Serialized result payload.
    pub payload: serde_json::Value,
    /// Times this entry was served.
    pub hits: u64,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
    /// Language segment this entry belongs to.
    pub language: String,
    /// Viewer-group signature segment this entry belongs to.
    pub user_group: String,
}

impl CacheEntry {
    /// Whether the entry is still servable at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires > now
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_hits: u64,
    /// Approximate serialized payload size in bytes.
    pub total_size_bytes: usize,
}

/// In-process result cache keyed by search fingerprint.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<AHashMap<String, CacheEntry>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a live entry's payload, counting the hit.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.get_at(key, Utc::now())
    }

    /// Clock-injectable variant of [`ResultCache::get`].
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<serde_json::Value> {
        let mut entries = self.entries.write();
        let entry = entries.get_mut(key)?;
        if !entry.is_live(now) {
            return None;
        }
        entry.hits += 1;
        Some(entry.payload.clone())
    }

    /// Store a payload under a fingerprint.
    ///
    /// Replaces the payload and expiry of an existing entry while keeping
    /// its hit counter; creates the entry with zero hits otherwise.
    pub fn set(
        &self,
        key: &str,
        query_text: &str,
        payload: serde_json::Value,
        ttl: Duration,
        language: &str,
        user_group: &str,
    ) -> Result<()> {
        self.set_at(key, query_text, payload, ttl, language, user_group, Utc::now())
    }

    /// Clock-injectable variant of [`ResultCache::set`].
    #[allow(clippy::too_many_arguments)]
    pub fn set_at(
        &self,
        key: &str,
        query_text: &str,
        payload: serde_json::Value,
        ttl: Duration,
        language: &str,
        user_group: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if ttl.is_zero() {
            return Err(FerretError::cache("ttl must be positive"));
        }
        let expires = now
            + chrono::Duration::from_std(ttl)
                .map_err(|e| FerretError::cache(format!("ttl out of range: {e}")))?;

        let mut entries = self.entries.write();
        match entries.get_mut(key) {
            Some(existing) => {
                existing.payload = payload;
                existing.query_text = query_text.to_string();
                existing.expires = expires;
            }
            None => {
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        key: key.to_string(),
                        query_text: query_text.to_string(),
                        payload,
                        hits: 0,
                        created: now,
                        expires,
                        language: language.to_string(),
                        user_group: user_group.to_string(),
                    },
                );
            }
        }
        Ok(())
    }

    /// Delete one entry.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Delete every expired entry; returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Utc::now())
    }

    /// Clock-injectable variant of [`ResultCache::sweep_expired`].
    pub fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Delete every entry regardless of expiry; returns how many existed.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Current hit count of an entry, live or not.
    pub fn hits(&self, key: &str) -> Option<u64> {
        self.entries.read().get(key).map(|entry| entry.hits)
    }

    /// Aggregate statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let entries = self.entries.read();

        let mut stats = CacheStats {
            total_entries: entries.len(),
            ..Default::default()
        };
        for entry in entries.values() {
            if !entry.is_live(now) {
                stats.expired_entries += 1;
            }
            stats.total_hits += entry.hits;
            stats.total_size_bytes += entry.payload.to_string().len();
        }
        stats
    }

    /// Number of entries, live or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
