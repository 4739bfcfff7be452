//! Cache key fingerprinting.
//!
//! A fingerprint identifies one unique combination of query, options, and
//! viewer context. Two viewers with different group signatures or
//! languages never share a fingerprint, which is what segments the cache.

use sha2::{Digest, Sha256};

/// Compute the cache fingerprint for a search.
///
/// `options_json` is the canonical JSON serialization of the full option
/// set; including it whole means any new option automatically partitions
/// the cache.
pub fn search_fingerprint(
    terms: &[String],
    options_json: &str,
    group_signature: &str,
    language: &str,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(terms.join("\u{1f}"));
    hasher.update([0x1e]);
    hasher.update(options_json);
    hasher.update([0x1e]);
    hasher.update(group_signature);
    hasher.update([0x1e]);
    hasher.update(language);
    format!("{:x}", hasher.finalize())
}

/// Fingerprint for a cached suggestion list.
pub fn suggest_fingerprint(partial: &str, limit: usize, language: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update("suggest");
    hasher.update([0x1e]);
    hasher.update(partial.to_lowercase());
    hasher.update([0x1e]);
    hasher.update(limit.to_le_bytes());
    hasher.update([0x1e]);
    hasher.update(language);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_same_inputs_same_fingerprint() {
        let a = search_fingerprint(&terms(&["joomla", "search"]), "{}", "1,2", "en-GB");
        let b = search_fingerprint(&terms(&["joomla", "search"]), "{}", "1,2", "en-GB");
        assert_eq!(a, b);
    }

    #[test]
    fn test_segmentation_by_viewer_and_language() {
        let base = search_fingerprint(&terms(&["joomla"]), "{}", "1", "en-GB");

        assert_ne!(base, search_fingerprint(&terms(&["joomla"]), "{}", "1,2", "en-GB"));
        assert_ne!(base, search_fingerprint(&terms(&["joomla"]), "{}", "1", "de-DE"));
        assert_ne!(base, search_fingerprint(&terms(&["joomla"]), r#"{"limit":20}"#, "1", "en-GB"));
    }

    #[test]
    fn test_term_list_is_not_ambiguous() {
        // ["ab","c"] and ["a","bc"] must not collide
        let a = search_fingerprint(&terms(&["ab", "c"]), "{}", "1", "*");
        let b = search_fingerprint(&terms(&["a", "bc"]), "{}", "1", "*");
        assert_ne!(a, b);
    }
}
