//! The page-builder source adapter.
//!
//! Pages store their body as nested JSON; this adapter flattens each
//! candidate body through the
//! [`TextExtractor`](crate::document::TextExtractor) (memoized by content
//! hash) and matches terms against the title, alias, and flattened text.
//! An installation without the page builder simply contributes nothing.

use std::sync::Arc;

use tracing::debug;

use crate::content::item::{ContentItem, PageHit, PageRecord, SourceType};
use crate::content::repository::ContentRepository;
use crate::context::RequestContext;
use crate::document::extractor::TextExtractor;
use crate::document::text_cache::{content_hash, ParsedTextCache};
use crate::error::Result;
use crate::source::{any_term_matches, ContentSource, FetchRequest};

/// Adapter over the page-builder page store.
#[derive(Debug, Clone)]
pub struct PageBuilderSource {
    repository: Arc<dyn ContentRepository>,
    extractor: TextExtractor,
    text_cache: Arc<ParsedTextCache>,
}

impl PageBuilderSource {
    /// Create a page-builder source over the given repository.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self::with_cache(repository, Arc::new(ParsedTextCache::new()))
    }

    /// Create a source sharing an existing parsed-text cache.
    pub fn with_cache(
        repository: Arc<dyn ContentRepository>,
        text_cache: Arc<ParsedTextCache>,
    ) -> Self {
        PageBuilderSource {
            repository,
            extractor: TextExtractor::new(),
            text_cache,
        }
    }

    /// The shared parsed-text cache.
    pub fn text_cache(&self) -> &Arc<ParsedTextCache> {
        &self.text_cache
    }

    fn visible(&self, page: &PageRecord, request: &FetchRequest, ctx: &RequestContext) -> bool {
        page.published
            && ctx.language_matches(&page.language)
            && ctx.can_access(page.access)
            && request.category_allowed(page.category_id)
    }

    /// Flattened body text, served from the cache when the content hash
    /// still matches.
    fn flattened_text(&self, page: &PageRecord) -> (String, String) {
        let hash = content_hash(&page.body_json);
        if let Some(text) = self.text_cache.get(page.id, &hash) {
            return (text, hash);
        }

        let text = self.extractor.extract(&page.body_json, page.id);
        self.text_cache.put(page.id, hash.clone(), text.clone());
        (text, hash)
    }
}

impl ContentSource for PageBuilderSource {
    fn source_type(&self) -> SourceType {
        SourceType::PageBuilder
    }

    fn fetch(&self, request: &FetchRequest, ctx: &RequestContext) -> Result<Vec<ContentItem>> {
        let Some(pages) = self.repository.page_builder_pages()? else {
            debug!("page builder not installed, source contributes nothing");
            return Ok(Vec::new());
        };

        let mut candidates: Vec<PageRecord> = pages
            .into_iter()
            .filter(|page| self.visible(page, request, ctx))
            .collect();
        candidates.sort_by(|a, b| b.created.cmp(&a.created));

        let mut items = Vec::new();
        for page in candidates {
            if items.len() >= request.max_results {
                break;
            }

            let (content_text, content_hash) = self.flattened_text(&page);
            if !any_term_matches(
                &request.terms,
                &[page.title.as_str(), page.alias.as_str(), content_text.as_str()],
            ) {
                continue;
            }

            items.push(ContentItem::Page(PageHit {
                record: page,
                content_text,
                content_hash,
            }));
        }

        Ok(items)
    }
}
