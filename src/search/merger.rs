//! Merging scored candidates from all sources.
//!
//! Deduplicates by (source type, item id) — a custom-field match and a
//! plain-text match of the same article count as duplicates — keeping the
//! higher-scoring instance, then sorts by score and slices out the
//! requested page. The sort is stable, so equal scores keep retrieval
//! order and duplicate ties keep the first-seen instance.

use ahash::AHashMap;

use crate::content::item::{ContentItem, SourceType};

/// A candidate with its relevance score, before snippets and URLs exist.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub item: ContentItem,
    pub score: u32,
}

/// The merged, paginated candidate list.
#[derive(Debug, Clone)]
pub struct MergedResults {
    /// Total matches across all sources after deduplication.
    pub total: usize,
    /// The requested page, highest score first.
    pub page: Vec<ScoredCandidate>,
}

/// Deduplicates, ranks, and paginates candidates.
#[derive(Debug, Clone)]
pub struct ResultMerger {
    default_limit: usize,
    max_limit: usize,
}

impl ResultMerger {
    /// Create a merger with the given pagination bounds.
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        ResultMerger {
            default_limit,
            max_limit,
        }
    }

    /// Merge candidates and slice out `[offset, offset+limit)`.
    ///
    /// A zero or absent limit falls back to the default; oversized limits
    /// clamp to the maximum.
    pub fn merge(
        &self,
        candidates: Vec<ScoredCandidate>,
        limit: Option<usize>,
        offset: usize,
    ) -> MergedResults {
        let limit = match limit {
            Some(0) | None => self.default_limit,
            Some(n) => n.min(self.max_limit),
        };

        let deduped = dedupe_candidates(candidates);

        let mut ranked = deduped;
        // Stable: equal scores keep first-seen order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let total = ranked.len();
        let page: Vec<ScoredCandidate> = ranked.into_iter().skip(offset).take(limit).collect();

        MergedResults { total, page }
    }
}

/// Keep one candidate per dedup key: the higher score wins, ties keep the
/// first-seen instance.
fn dedupe_candidates(candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    let mut best: AHashMap<(SourceType, i64), usize> = AHashMap::new();
    let mut kept: Vec<Option<ScoredCandidate>> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.item.dedup_key();
        match best.get(&key) {
            Some(&index) => {
                let existing = kept[index]
                    .as_ref()
                    .map(|c| c.score)
                    .unwrap_or_default();
                if candidate.score > existing {
                    kept[index] = Some(candidate);
                }
            }
            None => {
                best.insert(key, kept.len());
                kept.push(Some(candidate));
            }
        }
    }

    kept.into_iter().flatten().collect()
}
