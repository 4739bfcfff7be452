//! The integrated search engine.
//!
//! Owns the term processor, the three source adapters, the scorer, merger,
//! snippet generator, result cache, and the suggestion/analytics engine,
//! and runs the whole pipeline for one request. Source adapters run in
//! parallel on a dedicated thread pool with a bounded per-retrieval
//! timeout; a source that errors or times out contributes zero results and
//! the search continues.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::terms::TermProcessor;
use crate::cache::fingerprint::{search_fingerprint, suggest_fingerprint};
use crate::cache::result_cache::{CacheStats, ResultCache};
use crate::config::SearchConfig;
use crate::content::item::ContentItem;
use crate::content::repository::ContentRepository;
use crate::content::url::item_url;
use crate::context::{RequestCache, RequestContext};
use crate::document::text_cache::ParsedTextCache;
use crate::error::{FerretError, Result};
use crate::scoring::scorer::RelevanceScorer;
use crate::scoring::weights::FieldSet;
use crate::search::merger::{MergedResults, ResultMerger, ScoredCandidate};
use crate::search::snippet::SnippetGenerator;
use crate::search::types::{
    DebugInfo, ResultEntry, ScoredResult, SearchOptions, SearchQuery, SearchResponse,
    SearchTimings,
};
use crate::source::article::ArticleSource;
use crate::source::custom_field::CustomFieldSource;
use crate::source::page_builder::PageBuilderSource;
use crate::source::{ContentSource, FetchRequest};
use crate::suggest::analytics::{AnalyticsStore, AnalyticsSummary, Timeframe, TrendingEntry};
use crate::suggest::engine::{Suggestion, SuggestionEngine};

/// Snapshot returned by the `stats` action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStats {
    pub cache: CacheStats,
    pub parsed_pages: usize,
    pub analytics: AnalyticsSummary,
    pub config: SearchConfig,
}

/// The multi-source search engine.
pub struct SearchEngine {
    config: SearchConfig,
    repository: Arc<dyn ContentRepository>,
    sources: Vec<Arc<dyn ContentSource>>,
    term_processor: TermProcessor,
    scorer: RelevanceScorer,
    merger: ResultMerger,
    snippets: SnippetGenerator,
    cache: Arc<ResultCache>,
    text_cache: Arc<ParsedTextCache>,
    suggestions: SuggestionEngine,
    thread_pool: Arc<ThreadPool>,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("config", &self.config)
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl SearchEngine {
    /// Create an engine without analytics recording.
    pub fn new(repository: Arc<dyn ContentRepository>, config: SearchConfig) -> Result<Self> {
        Self::with_analytics(repository, None, config)
    }

    /// Create an engine with an optional analytics store.
    pub fn with_analytics(
        repository: Arc<dyn ContentRepository>,
        analytics: Option<Arc<dyn AnalyticsStore>>,
        config: SearchConfig,
    ) -> Result<Self> {
        let text_cache = Arc::new(ParsedTextCache::new());

        let sources: Vec<Arc<dyn ContentSource>> = vec![
            Arc::new(ArticleSource::new(Arc::clone(&repository))),
            Arc::new(PageBuilderSource::with_cache(
                Arc::clone(&repository),
                Arc::clone(&text_cache),
            )),
            Arc::new(CustomFieldSource::new(Arc::clone(&repository))),
        ];

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(sources.len().min(num_cpus::get().max(1)))
            .thread_name(|i| format!("ferret-source-{i}"))
            .build()
            .map_err(|e| FerretError::config(format!("failed to create thread pool: {e}")))?;

        let suggestions = SuggestionEngine::new(
            Arc::clone(&repository),
            analytics,
            config.suggest.clone(),
        );

        Ok(SearchEngine {
            term_processor: TermProcessor::new(config.min_term_length),
            scorer: RelevanceScorer::with_weights(config.weights.clone()),
            merger: ResultMerger::new(config.default_limit, config.max_limit),
            snippets: SnippetGenerator::new(config.snippet.clone()),
            cache: Arc::new(ResultCache::new()),
            text_cache,
            suggestions,
            thread_pool: Arc::new(thread_pool),
            repository,
            sources,
            config,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one search end to end.
    ///
    /// Never returns an error: validation failures become a
    /// `success=false` response, and every downstream failure degrades in
    /// place (a source contributes nothing, the cache is skipped).
    pub fn search(
        &self,
        raw_query: &str,
        options: &SearchOptions,
        ctx: &RequestContext,
    ) -> SearchResponse {
        let started = Instant::now();
        let query = raw_query.trim();

        if let Err(e) = self.term_processor.validate(query) {
            return SearchResponse::failure(query, &e.to_string());
        }

        let search_query = SearchQuery {
            raw: query.to_string(),
            terms: self.term_processor.normalize(query),
            language: ctx.language.clone(),
            access_levels: ctx.access_levels.clone(),
            limit: self.config.clamp_limit(options.limit),
            offset: options.offset,
            source_types: options.source_types.clone(),
            categories: options.categories.clone(),
        };
        let terms = &search_query.terms;

        let options_json = serde_json::to_string(options).unwrap_or_default();
        let key = search_fingerprint(
            terms,
            &options_json,
            &ctx.group_signature(),
            &ctx.language,
        );

        if self.config.cache.enabled {
            if let Some(payload) = self.cache.get(&key) {
                match serde_json::from_value::<SearchResponse>(payload) {
                    Ok(mut response) => {
                        debug!(query, "result cache hit");
                        response.cached = true;
                        return response;
                    }
                    Err(e) => warn!(error = %e, "undecodable cached result set, searching fresh"),
                }
            }
        }

        if terms.is_empty() {
            let mut response = SearchResponse::empty(query);
            response.search_time = started.elapsed().as_secs_f64();
            self.store_response(&key, query, &response, ctx);
            return response;
        }

        let mut timings = SearchTimings::default();

        // Retrieval: all enabled sources in parallel
        let retrieval_started = Instant::now();
        let request = FetchRequest {
            terms: terms.clone(),
            categories: search_query.categories.clone(),
            max_results: self.config.max_results,
            include_custom_fields: self.config.include_custom_fields,
        };
        let fetched = self.fetch_all(&request, options, ctx);
        timings.retrieval_ms = retrieval_started.elapsed().as_secs_f64() * 1000.0;

        // Scoring: items without a single term occurrence are excluded
        let scoring_started = Instant::now();
        let now = Utc::now();
        let mut request_cache = RequestCache::new();
        let candidate_count = fetched.len();

        let mut candidates: Vec<ScoredCandidate> = Vec::with_capacity(fetched.len());
        for item in fetched {
            let category_title =
                request_cache.category_title(self.repository.as_ref(), item.category_id());
            let fields = FieldSet::from_item(&item, category_title);
            if !self.scorer.matches_any_term(&fields, terms) {
                continue;
            }
            let score = self.scorer.score(
                &fields,
                terms,
                query,
                item.source_type(),
                Some(item.created()),
                now,
            );
            candidates.push(ScoredCandidate { item, score });
        }
        timings.scoring_ms = scoring_started.elapsed().as_secs_f64() * 1000.0;

        let merged = self
            .merger
            .merge(candidates, Some(search_query.limit), search_query.offset);

        // Snippets and URLs for the visible page only
        let snippets_started = Instant::now();
        let results = self.present(merged, terms, &mut request_cache);
        timings.snippets_ms = snippets_started.elapsed().as_secs_f64() * 1000.0;

        let total = results.0;
        let search_time = started.elapsed().as_secs_f64();

        let debug_info = options.debug.then(|| DebugInfo {
            terms: terms.clone(),
            types_searched: self
                .sources
                .iter()
                .filter(|s| options.source_enabled(s.source_type()))
                .map(|s| s.source_type().as_str().to_string())
                .collect(),
            candidates: candidate_count,
            timings,
            config: self.config.clone(),
        });

        let response = SearchResponse {
            success: true,
            error: None,
            results: results.1,
            total,
            query: query.to_string(),
            search_time,
            cached: false,
            debug: debug_info,
        };

        self.store_response(&key, query, &response, ctx);

        if self.config.enable_analytics {
            self.suggestions
                .record(query, total, total == 0, search_time, ctx);
        }

        response
    }

    /// Fan the enabled sources out on the thread pool and collect until
    /// the deadline. Results keep source order so merge tie-breaking stays
    /// deterministic.
    fn fetch_all(
        &self,
        request: &FetchRequest,
        options: &SearchOptions,
        ctx: &RequestContext,
    ) -> Vec<ContentItem> {
        let active: Vec<Arc<dyn ContentSource>> = self
            .sources
            .iter()
            .filter(|source| options.source_enabled(source.source_type()))
            .map(Arc::clone)
            .collect();

        if active.is_empty() {
            return Vec::new();
        }

        let (tx, rx) = crossbeam_channel::bounded(active.len());
        for (index, source) in active.iter().enumerate() {
            let tx = tx.clone();
            let source = Arc::clone(source);
            let request = request.clone();
            let ctx = ctx.clone();

            self.thread_pool.spawn(move || {
                let result = source.fetch(&request, &ctx);
                let _ = tx.send((index, result));
            });
        }
        drop(tx);

        let deadline = Instant::now() + self.config.adapter_timeout_duration();
        let mut slots: Vec<Option<Vec<ContentItem>>> = vec![None; active.len()];

        for _ in 0..active.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok((index, Ok(items))) => {
                    debug!(
                        source = active[index].source_type().as_str(),
                        count = items.len(),
                        "source returned candidates"
                    );
                    slots[index] = Some(items);
                }
                Ok((index, Err(FerretError::SourceUnavailable(reason)))) => {
                    debug!(
                        source = active[index].source_type().as_str(),
                        reason = %reason,
                        "source unavailable, skipping"
                    );
                }
                Ok((index, Err(e))) => {
                    warn!(
                        source = active[index].source_type().as_str(),
                        error = %e,
                        "source retrieval failed, contributing zero results"
                    );
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.config.adapter_timeout_ms,
                        "source retrieval timed out, continuing with partial results"
                    );
                    break;
                }
            }
        }

        slots.into_iter().flatten().flatten().collect()
    }

    /// Turn the merged page into presentable result rows.
    fn present(
        &self,
        merged: MergedResults,
        terms: &[String],
        request_cache: &mut RequestCache,
    ) -> (usize, Vec<ResultEntry>) {
        let mut entries = Vec::with_capacity(merged.page.len());

        for candidate in merged.page {
            let category_alias =
                request_cache.category_alias(self.repository.as_ref(), candidate.item.category_id());
            let url = item_url(&candidate.item, &category_alias);

            let mut snippet = self
                .snippets
                .generate(&candidate.item.searchable_text(), terms);

            if let ContentItem::CustomField(hit) = &candidate.item {
                if !hit.matched_fields.is_empty() {
                    snippet = format!(
                        "Matches in custom fields: {}. {snippet}",
                        hit.matched_fields.join(", ")
                    );
                }
            }

            let scored = ScoredResult {
                item: candidate.item,
                relevance: candidate.score,
                snippet,
                url,
            };
            entries.push(scored.into_entry());
        }

        (merged.total, entries)
    }

    /// Cache a successful response; failures are logged, never surfaced.
    fn store_response(
        &self,
        key: &str,
        query: &str,
        response: &SearchResponse,
        ctx: &RequestContext,
    ) {
        if !self.config.cache.enabled || !response.success {
            return;
        }

        let payload = match serde_json::to_value(response) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "failed to serialize result set for caching");
                return;
            }
        };

        if let Err(e) = self.cache.set(
            key,
            query,
            payload,
            self.config.cache.ttl(),
            &ctx.language,
            &ctx.group_signature(),
        ) {
            warn!(error = %e, "failed to cache result set, search proceeds uncached");
        }
    }

    /// Autocomplete suggestions, cached with a short TTL.
    pub fn suggest(
        &self,
        partial: &str,
        limit: usize,
        ctx: &RequestContext,
    ) -> Result<Vec<Suggestion>> {
        let limit = if limit == 0 {
            self.config.suggest.max_suggestions
        } else {
            limit
        };

        let key = suggest_fingerprint(partial, limit, &ctx.language);
        if self.config.cache.enabled {
            if let Some(payload) = self.cache.get(&key) {
                if let Ok(suggestions) = serde_json::from_value::<Vec<Suggestion>>(payload) {
                    return Ok(suggestions);
                }
            }
        }

        let suggestions = self.suggestions.suggest(partial, limit)?;

        if self.config.cache.enabled {
            if let Ok(payload) = serde_json::to_value(&suggestions) {
                let ttl = std::time::Duration::from_secs(self.config.cache.suggest_ttl_secs);
                if let Err(e) = self.cache.set(
                    &key,
                    partial,
                    payload,
                    ttl,
                    &ctx.language,
                    &ctx.group_signature(),
                ) {
                    warn!(error = %e, "failed to cache suggestions");
                }
            }
        }

        Ok(suggestions)
    }

    /// Trending queries within a timeframe.
    pub fn trending(&self, limit: usize, timeframe: Timeframe) -> Result<Vec<TrendingEntry>> {
        self.suggestions.trending(limit, timeframe)
    }

    /// Aggregated analytics for a timeframe.
    pub fn analytics(&self, timeframe: Timeframe) -> Result<AnalyticsSummary> {
        self.suggestions.summary(timeframe)
    }

    /// Cache, parser, and configuration statistics.
    pub fn stats(&self) -> Result<EngineStats> {
        Ok(EngineStats {
            cache: self.cache.stats(),
            parsed_pages: self.text_cache.len(),
            analytics: self.suggestions.summary(Timeframe::Week)?,
            config: self.config.clone(),
        })
    }

    /// Delete every cached result set; returns how many existed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    /// Delete expired cached result sets; returns how many were removed.
    pub fn sweep_cache(&self) -> usize {
        self.cache.sweep_expired()
    }

    /// The result cache, for maintenance and tests.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::{ArticleRecord, PageRecord};
    use crate::content::repository::MemoryRepository;
    use crate::suggest::analytics::MemoryAnalyticsStore;
    use chrono::Duration;

    fn article(id: i64, title: &str, intro: &str, body: &str) -> ArticleRecord {
        ArticleRecord {
            id,
            title: title.to_string(),
            alias: title.to_lowercase().replace(' ', "-"),
            intro_text: intro.to_string(),
            full_text: body.to_string(),
            meta_keywords: String::new(),
            meta_description: String::new(),
            category_id: 1,
            created: Utc::now() - Duration::days(200),
            language: "*".to_string(),
            access: 1,
            published: true,
        }
    }

    fn engine_with_content() -> SearchEngine {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_article(article(
            1,
            "Joomla Search Functionality",
            "Everything about joomla search in one place.",
            "The joomla search component scans several sources.",
        ));
        repo.add_article(article(
            2,
            "Styling Updates",
            "",
            "This quarter we refreshed the search box styling.",
        ));
        repo.add_page(PageRecord {
            id: 1,
            title: "Welcome".to_string(),
            alias: "welcome".to_string(),
            body_json: r#"[{"type":"row","columns":[{"addons":[{"type":"heading","settings":{"title":"Welcome to search"}}]}]}]"#.to_string(),
            category_id: 1,
            created: Utc::now() - Duration::days(200),
            language: "*".to_string(),
            access: 1,
            published: true,
        });

        let analytics: Arc<dyn AnalyticsStore> = Arc::new(MemoryAnalyticsStore::new());
        SearchEngine::with_analytics(repo, Some(analytics), SearchConfig::default()).unwrap()
    }

    #[test]
    fn test_search_ranks_title_phrase_match_first() {
        let engine = engine_with_content();
        let response = engine.search(
            "joomla search",
            &SearchOptions::new(),
            &RequestContext::anonymous(),
        );

        assert!(response.success);
        assert!(response.total >= 2);
        assert_eq!(response.results[0].id, 1);
        assert!(response.results[0].relevance >= response.results[1].relevance);
        assert!(response.results[0].snippet.contains("<mark>"));
    }

    #[test]
    fn test_sql_pattern_fails_validation() {
        let engine = engine_with_content();
        let response = engine.search(
            "x UNION SELECT passwords",
            &SearchOptions::new(),
            &RequestContext::anonymous(),
        );

        assert!(!response.success);
        assert!(response.error.is_some());
    }

    #[test]
    fn test_short_query_is_empty_success() {
        let engine = engine_with_content();
        let response = engine.search("a", &SearchOptions::new(), &RequestContext::anonymous());

        assert!(response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
    }

    #[test]
    fn test_second_search_is_cached_and_identical() {
        let engine = engine_with_content();
        let ctx = RequestContext::anonymous();
        let options = SearchOptions::new();

        let first = engine.search("joomla search", &options, &ctx);
        let second = engine.search("joomla search", &options, &ctx);

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.total, second.total);
        let first_ids: Vec<i64> = first.results.iter().map(|r| r.id).collect();
        let second_ids: Vec<i64> = second.results.iter().map(|r| r.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_cache_segmented_by_viewer_groups() {
        let engine = engine_with_content();
        let options = SearchOptions::new();

        let public = RequestContext::anonymous();
        let privileged = RequestContext::anonymous().with_access_levels(vec![1, 2]);

        let first = engine.search("joomla", &options, &public);
        let other_viewer = engine.search("joomla", &options, &privileged);

        assert!(!first.cached);
        // Different group signature never shares a cache entry
        assert!(!other_viewer.cached);
    }

    #[test]
    fn test_type_filter_restricts_sources() {
        let engine = engine_with_content();
        let options = SearchOptions::new().source(crate::content::item::SourceType::PageBuilder);

        let response = engine.search("welcome", &options, &RequestContext::anonymous());

        assert!(response.success);
        assert!(response.results.iter().all(|r| r.source == "sp"));
    }

    #[test]
    fn test_debug_flag_adds_diagnostics() {
        let engine = engine_with_content();
        let mut options = SearchOptions::new();
        options.debug = true;

        let response = engine.search("joomla", &options, &RequestContext::anonymous());
        let debug = response.debug.expect("debug info requested");

        assert_eq!(debug.terms, vec!["joomla"]);
        assert_eq!(debug.types_searched.len(), 3);
    }

    #[test]
    fn test_analytics_recorded_on_fresh_search_only() {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_article(article(1, "Joomla", "", ""));
        let store = Arc::new(MemoryAnalyticsStore::new());
        let engine = SearchEngine::with_analytics(
            repo,
            Some(store.clone() as Arc<dyn AnalyticsStore>),
            SearchConfig::default(),
        )
        .unwrap();
        let ctx = RequestContext::anonymous();

        engine.search("joomla", &SearchOptions::new(), &ctx);
        engine.search("joomla", &SearchOptions::new(), &ctx);

        // The cached second search records nothing
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_cache() {
        let engine = engine_with_content();
        let ctx = RequestContext::anonymous();
        engine.search("joomla", &SearchOptions::new(), &ctx);

        assert!(engine.clear_cache() >= 1);
        let fresh = engine.search("joomla", &SearchOptions::new(), &ctx);
        assert!(!fresh.cached);
    }

    #[test]
    fn test_stats_reflect_activity() {
        let engine = engine_with_content();
        let ctx = RequestContext::anonymous();
        engine.search("joomla search", &SearchOptions::new(), &ctx);
        engine.search("joomla search", &SearchOptions::new(), &ctx);

        let stats = engine.stats().unwrap();
        assert!(stats.cache.total_entries >= 1);
        assert!(stats.cache.total_hits >= 1);
        assert_eq!(stats.analytics.total_searches, 1);
    }
}
