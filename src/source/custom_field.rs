//! The custom-field source adapter.
//!
//! Joins the field-definition store against the field-value store,
//! restricted to free-text-searchable field types, and computes a weighted
//! hit-sum relevance during retrieval: every term that occurs in a field
//! value contributes that field type's weight. Items below the minimum
//! retrieval relevance are discarded. Every term must match somewhere in
//! the item's field values for the item to qualify.

use std::sync::Arc;

use ahash::AHashMap;

use crate::content::item::{ContentItem, CustomFieldHit, FieldDefinition, FieldValue, SourceType};
use crate::content::repository::ContentRepository;
use crate::context::RequestContext;
use crate::error::Result;
use crate::source::{ContentSource, FetchRequest};

/// Minimum weighted hit-sum for a custom-field match to qualify.
const MIN_RETRIEVAL_RELEVANCE: f64 = 1.0;

/// Weight of a searchable field type, or `None` when the type holds no
/// free text worth scanning (media, calendar, ...).
pub fn searchable_field_weight(kind: &str) -> Option<f64> {
    match kind {
        "text" | "textarea" => Some(4.0),
        "editor" => Some(5.0),
        "list" | "radio" | "checkbox" | "sql" => Some(3.0),
        "url" => Some(2.0),
        _ => None,
    }
}

/// Adapter over the custom-field stores.
#[derive(Debug, Clone)]
pub struct CustomFieldSource {
    repository: Arc<dyn ContentRepository>,
}

impl CustomFieldSource {
    /// Create a custom-field source over the given repository.
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        CustomFieldSource { repository }
    }
}

/// Accumulates the match state of one article across its field values.
#[derive(Debug, Default)]
struct ItemMatch {
    relevance: f64,
    matched_field_ids: Vec<i64>,
    matched_field_titles: Vec<String>,
    matched_text: Vec<String>,
    terms_hit: Vec<bool>,
}

impl ContentSource for CustomFieldSource {
    fn source_type(&self) -> SourceType {
        SourceType::CustomField
    }

    fn fetch(&self, request: &FetchRequest, ctx: &RequestContext) -> Result<Vec<ContentItem>> {
        let Some(definitions) = self.repository.field_definitions()? else {
            return Ok(Vec::new());
        };

        let searchable: Vec<(FieldDefinition, f64)> = definitions
            .into_iter()
            .filter(|field| field.published)
            .filter_map(|field| searchable_field_weight(&field.kind).map(|w| (field, w)))
            .collect();

        if searchable.is_empty() || request.terms.is_empty() {
            return Ok(Vec::new());
        }

        let field_ids: Vec<i64> = searchable.iter().map(|(field, _)| field.id).collect();
        let values = self.repository.field_values(&field_ids)?;

        let by_field: AHashMap<i64, (&FieldDefinition, f64)> = searchable
            .iter()
            .map(|(field, weight)| (field.id, (field, *weight)))
            .collect();

        // Fold every value into its item's match state
        let mut matches: AHashMap<i64, ItemMatch> = AHashMap::new();
        for FieldValue {
            field_id,
            item_id,
            value,
        } in &values
        {
            let Some((field, weight)) = by_field.get(field_id) else {
                continue;
            };

            let lowered = value.to_lowercase();
            let entry = matches.entry(*item_id).or_insert_with(|| ItemMatch {
                terms_hit: vec![false; request.terms.len()],
                ..Default::default()
            });

            let mut value_matched = false;
            for (index, term) in request.terms.iter().enumerate() {
                if lowered.contains(term.as_str()) {
                    entry.relevance += weight;
                    entry.terms_hit[index] = true;
                    value_matched = true;
                }
            }

            if value_matched {
                if !entry.matched_field_ids.contains(&field.id) {
                    entry.matched_field_ids.push(field.id);
                    entry.matched_field_titles.push(field.title.clone());
                }
                entry.matched_text.push(value.trim().to_string());
            }
        }

        // Keep items where every term matched and the weighted sum clears
        // the threshold, then attach the owning article
        let mut items: Vec<ContentItem> = Vec::new();
        let mut qualified: Vec<(i64, ItemMatch)> = matches
            .into_iter()
            .filter(|(_, m)| m.terms_hit.iter().all(|hit| *hit))
            .filter(|(_, m)| m.relevance >= MIN_RETRIEVAL_RELEVANCE)
            .collect();
        qualified.sort_by(|a, b| {
            b.1.relevance
                .partial_cmp(&a.1.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        for (item_id, matched) in qualified {
            if items.len() >= request.max_results {
                break;
            }

            let Some(article) = self.repository.article_by_id(item_id)? else {
                continue;
            };
            if !article.published
                || !ctx.language_matches(&article.language)
                || !ctx.can_access(article.access)
                || !request.category_allowed(article.category_id)
            {
                continue;
            }

            items.push(ContentItem::CustomField(CustomFieldHit {
                record: article,
                match_count: matched.matched_field_ids.len(),
                matched_fields: matched.matched_field_titles,
                retrieval_relevance: matched.relevance,
                custom_field_text: matched.matched_text.join(" "),
            }));
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::item::ArticleRecord;
    use crate::content::repository::MemoryRepository;
    use chrono::Utc;

    fn article(id: i64) -> ArticleRecord {
        ArticleRecord {
            id,
            title: format!("Article {id}"),
            alias: format!("article-{id}"),
            intro_text: String::new(),
            full_text: String::new(),
            meta_keywords: String::new(),
            meta_description: String::new(),
            category_id: 1,
            created: Utc::now(),
            language: "*".to_string(),
            access: 1,
            published: true,
        }
    }

    fn field(id: i64, title: &str, kind: &str) -> FieldDefinition {
        FieldDefinition {
            id,
            title: title.to_string(),
            name: title.to_lowercase(),
            kind: kind.to_string(),
            published: true,
        }
    }

    fn value(field_id: i64, item_id: i64, value: &str) -> FieldValue {
        FieldValue {
            field_id,
            item_id,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_absent_feature_contributes_nothing() {
        let repo = Arc::new(MemoryRepository::new());
        let source = CustomFieldSource::new(repo);

        let request = FetchRequest::new(vec!["red".to_string()]);
        assert!(source.fetch(&request, &RequestContext::anonymous()).unwrap().is_empty());
    }

    #[test]
    fn test_weighted_match_with_field_names() {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_article(article(10));
        repo.add_field(field(1, "Color", "text"));
        repo.add_field(field(2, "Notes", "editor"));
        repo.add_field_value(value(1, 10, "deep red"));
        repo.add_field_value(value(2, 10, "a red accent wall"));
        let source = CustomFieldSource::new(repo);

        let request = FetchRequest::new(vec!["red".to_string()]);
        let items = source.fetch(&request, &RequestContext::anonymous()).unwrap();

        assert_eq!(items.len(), 1);
        match &items[0] {
            ContentItem::CustomField(hit) => {
                assert_eq!(hit.record.id, 10);
                assert_eq!(hit.match_count, 2);
                assert_eq!(hit.matched_fields, vec!["Color", "Notes"]);
                // text(4) + editor(5)
                assert_eq!(hit.retrieval_relevance, 9.0);
                assert!(hit.custom_field_text.contains("deep red"));
            }
            other => panic!("expected custom field hit, got {other:?}"),
        }
    }

    #[test]
    fn test_every_term_must_match() {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_article(article(10));
        repo.add_field(field(1, "Color", "text"));
        repo.add_field_value(value(1, 10, "deep red"));
        let source = CustomFieldSource::new(repo);

        let request = FetchRequest::new(vec!["red".to_string(), "blue".to_string()]);
        assert!(source.fetch(&request, &RequestContext::anonymous()).unwrap().is_empty());
    }

    #[test]
    fn test_unsearchable_field_types_ignored() {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_article(article(10));
        repo.add_field(field(1, "Banner", "media"));
        repo.add_field_value(value(1, 10, "red-banner.png"));
        let source = CustomFieldSource::new(repo);

        let request = FetchRequest::new(vec!["red".to_string()]);
        assert!(source.fetch(&request, &RequestContext::anonymous()).unwrap().is_empty());
    }

    #[test]
    fn test_unpublished_article_excluded() {
        let repo = Arc::new(MemoryRepository::new());
        let mut hidden = article(10);
        hidden.published = false;
        repo.add_article(hidden);
        repo.add_field(field(1, "Color", "text"));
        repo.add_field_value(value(1, 10, "red"));
        let source = CustomFieldSource::new(repo);

        let request = FetchRequest::new(vec!["red".to_string()]);
        assert!(source.fetch(&request, &RequestContext::anonymous()).unwrap().is_empty());
    }

    #[test]
    fn test_field_type_weights() {
        assert_eq!(searchable_field_weight("text"), Some(4.0));
        assert_eq!(searchable_field_weight("editor"), Some(5.0));
        assert_eq!(searchable_field_weight("list"), Some(3.0));
        assert_eq!(searchable_field_weight("url"), Some(2.0));
        assert_eq!(searchable_field_weight("media"), None);
        assert_eq!(searchable_field_weight("calendar"), None);
    }
}
