//! The article source adapter.
//!
//! Scans the flat article table: published rows in the viewer's language
//! and access set, optionally restricted by category, kept when any term
//! occurs in the title, intro, body, alias, or meta fields. When
//! custom-field enrichment is on, the values of the article's searchable
//! fields are attached so the scorer and snippet generator see them.

use std::sync::Arc;

use tracing::warn;

use crate::content::item::{ArticleHit, ArticleRecord, ContentItem, SourceType};
use crate::content::repository::ContentRepository;
use crate::context::RequestContext;
use crate::error::Result;
use crate::source::custom_field::searchable_field_weight;
use crate::source::{any_term_matches, ContentSource, FetchRequest};

/// Adapter over the flat article store.
#[derive(Debug, Clone)]
pub struct ArticleSource {
    repository: Arc<dyn ContentRepository>,
}

impl ArticleSource {
    /// Create an article source over the given repository.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        ArticleSource { repository }
    }

    fn visible(&self, article: &ArticleRecord, request: &FetchRequest, ctx: &RequestContext) -> bool {
        article.published
            && ctx.language_matches(&article.language)
            && ctx.can_access(article.access)
            && request.category_allowed(article.category_id)
    }

    /// Concatenated values of the article's searchable custom fields;
    /// empty when the feature is absent or a lookup fails.
    fn custom_field_text(&self, item_id: i64) -> String {
        let pairs = match self.repository.fields_for_item(item_id) {
            Ok(pairs) => pairs,
            Err(e) => {
                warn!(item_id, error = %e, "custom field lookup failed, continuing without");
                return String::new();
            }
        };

        let mut text = String::new();
        for (definition, value) in pairs {
            if searchable_field_weight(&definition.kind).is_none() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(value.value.trim());
        }
        text
    }
}

impl ContentSource for ArticleSource {
    fn source_type(&self) -> SourceType {
        SourceType::Article
    }

    fn fetch(&self, request: &FetchRequest, ctx: &RequestContext) -> Result<Vec<ContentItem>> {
        let mut candidates: Vec<ArticleRecord> = self
            .repository
            .articles()?
            .into_iter()
            .filter(|article| self.visible(article, request, ctx))
            .filter(|article| {
                any_term_matches(
                    &request.terms,
                    &[
                        article.title.as_str(),
                        article.intro_text.as_str(),
                        article.full_text.as_str(),
                        article.alias.as_str(),
                        article.meta_keywords.as_str(),
                        article.meta_description.as_str(),
                    ],
                )
            })
            .collect();

        // Newest first; relevance ordering happens after scoring
        candidates.sort_by(|a, b| b.created.cmp(&a.created));
        candidates.truncate(request.max_results);

        let items = candidates
            .into_iter()
            .map(|record| {
                let custom_field_text = if request.include_custom_fields {
                    self.custom_field_text(record.id)
                } else {
                    String::new()
                };
                ContentItem::Article(ArticleHit {
                    record,
                    custom_field_text,
                })
            })
            .collect();

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::{FieldDefinition, FieldValue};
    use crate::content::repository::MemoryRepository;
    use chrono::{Duration, Utc};

    fn article(id: i64, title: &str, body: &str) -> ArticleRecord {
        ArticleRecord {
            id,
            title: title.to_string(),
            alias: format!("article-{id}"),
            intro_text: String::new(),
            full_text: body.to_string(),
            meta_keywords: String::new(),
            meta_description: String::new(),
            category_id: 1,
            created: Utc::now() - Duration::days(id),
            language: "*".to_string(),
            access: 1,
            published: true,
        }
    }

    fn source_with(articles: Vec<ArticleRecord>) -> (ArticleSource, Arc<MemoryRepository>) {
        let repo = Arc::new(MemoryRepository::new());
        for a in articles {
            repo.add_article(a);
        }
        (ArticleSource::new(repo.clone()), repo)
    }

    #[test]
    fn test_matches_terms_in_any_field() {
        let (source, _repo) = source_with(vec![
            article(1, "Ferret Care", ""),
            article(2, "Gardening", "ferrets love tunnels"),
            article(3, "Unrelated", "nothing here"),
        ]);

        let request = FetchRequest::new(vec!["ferret".to_string()]);
        let items = source.fetch(&request, &RequestContext::anonymous()).unwrap();

        let ids: Vec<i64> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
    }

    #[test]
    fn test_unpublished_and_restricted_filtered_out() {
        let mut hidden = article(1, "Ferret Care", "");
        hidden.published = false;
        let mut locked = article(2, "Ferret Diet", "");
        locked.access = 3;
        let mut german = article(3, "Ferret Zucht", "");
        german.language = "de-DE".to_string();

        let (source, _repo) = source_with(vec![hidden, locked, german, article(4, "Ferret Play", "")]);

        let request = FetchRequest::new(vec!["ferret".to_string()]);
        let ctx = RequestContext::anonymous().with_language("en-GB");
        let items = source.fetch(&request, &ctx).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), 4);
    }

    #[test]
    fn test_category_filter() {
        let mut other = article(2, "Ferret News", "");
        other.category_id = 9;
        let (source, _repo) = source_with(vec![article(1, "Ferret Care", ""), other]);

        let mut request = FetchRequest::new(vec!["ferret".to_string()]);
        request.categories = vec![9];

        let items = source.fetch(&request, &RequestContext::anonymous()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), 2);
    }

    #[test]
    fn test_custom_field_enrichment() {
        let (source, repo) = source_with(vec![article(1, "Ferret Care", "")]);
        repo.add_field(FieldDefinition {
            id: 1,
            title: "Color".to_string(),
            name: "color".to_string(),
            kind: "text".to_string(),
            published: true,
        });
        repo.add_field_value(FieldValue {
            field_id: 1,
            item_id: 1,
            value: "albino".to_string(),
        });

        let request = FetchRequest::new(vec!["ferret".to_string()]);
        let items = source.fetch(&request, &RequestContext::anonymous()).unwrap();

        assert_eq!(items[0].custom_field_text(), "albino");

        let mut without = FetchRequest::new(vec!["ferret".to_string()]);
        without.include_custom_fields = false;
        let items = source.fetch(&without, &RequestContext::anonymous()).unwrap();
        assert_eq!(items[0].custom_field_text(), "");
    }

    #[test]
    fn test_max_results_keeps_newest() {
        let (source, _repo) = source_with(
            (1..=5).map(|id| article(id, "Ferret", "")).collect(),
        );

        let mut request = FetchRequest::new(vec!["ferret".to_string()]);
        request.max_results = 2;

        let items = source.fetch(&request, &RequestContext::anonymous()).unwrap();
        // created = now - id days, so smaller ids are newer
        let ids: Vec<i64> = items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
