//! Autocomplete suggestions, trending queries, and the analytics recorder.
//!
//! Suggestions merge candidates from several sources, each with its own
//! relevance constant: prior popular queries (boosted when they
//! prefix-match the partial input), article titles, category titles, and
//! tag titles. Candidates are deduplicated by lowercase text and the top
//! `limit` survive, ordered by relevance then frequency.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SuggestionConfig;
use crate::content::repository::ContentRepository;
use crate::context::RequestContext;
use crate::error::Result;
use crate::suggest::analytics::{
    AnalyticsRecord, AnalyticsStore, AnalyticsSummary, Timeframe, TrendingEntry,
};

/// Where a suggestion came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Query,
    PopularQuery,
    ArticleTitle,
    Category,
    Tag,
}

/// One autocomplete candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Per-source relevance constant, boosted for prefix matches.
    pub relevance: u32,
    /// How often this query was searched (popular-query source only).
    pub frequency: u64,
}

/// Suggestion engine and analytics recorder.
///
/// Holds the repository for title/category/tag candidates and an optional
/// analytics store. A missing store disables history-based suggestions and
/// turns recording into a no-op — feature absence, not an error.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    repository: Arc<dyn ContentRepository>,
    analytics: Option<Arc<dyn AnalyticsStore>>,
    config: SuggestionConfig,
}

impl SuggestionEngine {
    /// Create a suggestion engine.
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        analytics: Option<Arc<dyn AnalyticsStore>>,
        config: SuggestionConfig,
    ) -> Self {
        SuggestionEngine {
            repository,
            analytics,
            config,
        }
    }

    /// Record one search for analytics. Silently no-ops when no analytics
    /// store is attached or the query is below the minimum length.
    pub fn record(
        &self,
        query: &str,
        results_count: usize,
        zero_results: bool,
        search_time: f64,
        ctx: &RequestContext,
    ) {
        let Some(store) = &self.analytics else {
            return;
        };

        let query = query.trim();
        if query.chars().count() < self.config.min_query_length {
            return;
        }

        let record = AnalyticsRecord {
            query: query.chars().take(255).collect(),
            results_count,
            user_id: ctx.user_id,
            session_id: ctx.session_id.clone(),
            ip_address: ctx.ip_address.clone(),
            user_agent: ctx.user_agent.clone(),
            search_time,
            timestamp: Utc::now(),
            zero_results,
        };

        if let Err(e) = store.append(record) {
            warn!(error = %e, "failed to record search analytics");
        }
    }

    /// Compute autocomplete suggestions for a partial query.
    pub fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let partial = partial.trim();
        if partial.chars().count() < self.config.min_query_length {
            return Ok(Vec::new());
        }

        let needle = partial.to_lowercase();
        let mut candidates: Vec<Suggestion> = Vec::new();

        if self.config.include_query {
            candidates.push(Suggestion {
                text: partial.to_string(),
                kind: SuggestionKind::Query,
                relevance: 100,
                frequency: 0,
            });
        }

        if self.config.from_history {
            candidates.extend(self.popular_queries(&needle)?);
        }
        if self.config.from_titles {
            candidates.extend(self.title_candidates(&needle)?);
        }
        if self.config.from_categories {
            candidates.extend(self.category_candidates(&needle)?);
        }
        if self.config.from_tags {
            candidates.extend(self.tag_candidates(&needle)?);
        }

        candidates.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then(b.frequency.cmp(&a.frequency))
        });

        // Dedup by lowercase text, keeping the best-ranked instance
        let mut seen: Vec<String> = Vec::new();
        let mut unique: Vec<Suggestion> = Vec::new();
        for candidate in candidates {
            let lowered = candidate.text.to_lowercase();
            if !seen.contains(&lowered) {
                seen.push(lowered);
                unique.push(candidate);
            }
        }

        unique.truncate(limit);
        Ok(unique)
    }

    /// Trending queries within a time window, most searched first.
    pub fn trending(&self, limit: usize, timeframe: Timeframe) -> Result<Vec<TrendingEntry>> {
        self.trending_at(limit, timeframe, Utc::now())
    }

    /// Clock-injectable variant of [`SuggestionEngine::trending`].
    pub fn trending_at(
        &self,
        limit: usize,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendingEntry>> {
        let Some(store) = &self.analytics else {
            return Ok(Vec::new());
        };

        let records = store.records_since(timeframe.cutoff(now))?;
        let mut entries = group_by_query(&records, self.config.min_query_length);
        entries.sort_by(|a, b| b.searches.cmp(&a.searches).then(a.query.cmp(&b.query)));
        entries.truncate(limit);
        Ok(entries)
    }

    /// Aggregated analytics for a timeframe.
    pub fn summary(&self, timeframe: Timeframe) -> Result<AnalyticsSummary> {
        let Some(store) = &self.analytics else {
            return Ok(AnalyticsSummary::default());
        };

        let records = store.records_since(timeframe.cutoff(Utc::now()))?;
        let total = records.len() as u64;
        let zero: u64 = records.iter().filter(|r| r.zero_results).count() as u64;

        let mut unique: Vec<&str> = records.iter().map(|r| r.query.as_str()).collect();
        unique.sort_unstable();
        unique.dedup();

        let found: Vec<&AnalyticsRecord> = records.iter().filter(|r| !r.zero_results).collect();
        let avg_results = if found.is_empty() {
            0.0
        } else {
            found.iter().map(|r| r.results_count as f64).sum::<f64>() / found.len() as f64
        };

        let mut popular = group_by_query(&records, self.config.min_query_length);
        popular.sort_by(|a, b| b.searches.cmp(&a.searches).then(a.query.cmp(&b.query)));
        popular.truncate(5);

        Ok(AnalyticsSummary {
            total_searches: total,
            unique_searches: unique.len() as u64,
            zero_result_searches: zero,
            avg_results,
            zero_result_rate: if total > 0 {
                zero as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            popular_searches: popular,
        })
    }

    /// Prior queries from the analytics history. Queries that found
    /// nothing are never suggested.
    fn popular_queries(&self, needle: &str) -> Result<Vec<Suggestion>> {
        let Some(store) = &self.analytics else {
            return Ok(Vec::new());
        };

        let records = store.records_since(None)?;
        let mut entries = group_by_query(&records, self.config.min_query_length);
        entries.retain(|entry| {
            let lowered = entry.query.to_lowercase();
            lowered.contains(needle) && entry.zero_result_searches < entry.searches
        });

        Ok(entries
            .into_iter()
            .map(|entry| {
                let relevance = if entry.query.to_lowercase().starts_with(needle) {
                    90
                } else {
                    70
                };
                Suggestion {
                    text: entry.query,
                    kind: SuggestionKind::PopularQuery,
                    relevance,
                    frequency: entry.searches,
                }
            })
            .collect())
    }

    fn title_candidates(&self, needle: &str) -> Result<Vec<Suggestion>> {
        Ok(self
            .repository
            .articles()?
            .into_iter()
            .filter(|article| article.published)
            .filter(|article| article.title.to_lowercase().contains(needle))
            .map(|article| {
                let relevance = if article.title.to_lowercase().starts_with(needle) {
                    95
                } else {
                    80
                };
                Suggestion {
                    text: article.title,
                    kind: SuggestionKind::ArticleTitle,
                    relevance,
                    frequency: 0,
                }
            })
            .collect())
    }

    fn category_candidates(&self, needle: &str) -> Result<Vec<Suggestion>> {
        Ok(self
            .repository
            .categories()?
            .into_iter()
            .filter(|category| category.published)
            .filter(|category| {
                category.title.to_lowercase().contains(needle)
                    || category.alias.to_lowercase().contains(needle)
            })
            .map(|category| {
                let relevance = if category.title.to_lowercase().starts_with(needle) {
                    90
                } else {
                    75
                };
                Suggestion {
                    text: category.title,
                    kind: SuggestionKind::Category,
                    relevance,
                    frequency: 0,
                }
            })
            .collect())
    }

    fn tag_candidates(&self, needle: &str) -> Result<Vec<Suggestion>> {
        Ok(self
            .repository
            .tags()?
            .into_iter()
            .filter(|tag| tag.published)
            .filter(|tag| {
                tag.title.to_lowercase().contains(needle)
                    || tag.alias.to_lowercase().contains(needle)
            })
            .map(|tag| {
                let relevance = if tag.title.to_lowercase().starts_with(needle) {
                    88
                } else {
                    72
                };
                Suggestion {
                    text: tag.title,
                    kind: SuggestionKind::Tag,
                    relevance,
                    frequency: 0,
                }
            })
            .collect())
    }
}

/// Group records by exact query text.
fn group_by_query(records: &[AnalyticsRecord], min_length: usize) -> Vec<TrendingEntry> {
    let mut entries: Vec<TrendingEntry> = Vec::new();

    for record in records {
        if record.query.chars().count() < min_length {
            continue;
        }

        match entries.iter_mut().find(|entry| entry.query == record.query) {
            Some(entry) => {
                // Running mean over the searches seen so far
                entry.avg_results = (entry.avg_results * entry.searches as f64
                    + record.results_count as f64)
                    / (entry.searches + 1) as f64;
                entry.searches += 1;
                if record.zero_results {
                    entry.zero_result_searches += 1;
                }
            }
            None => entries.push(TrendingEntry {
                query: record.query.clone(),
                searches: 1,
                avg_results: record.results_count as f64,
                zero_result_searches: if record.zero_results { 1 } else { 0 },
            }),
        }
    }

    entries
}
