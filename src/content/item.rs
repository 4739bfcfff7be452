//! Content records and the unified result item type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which logical source a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Plain articles.
    Article,
    /// Page-builder pages.
    PageBuilder,
    /// Articles matched through custom field values.
    CustomField,
}

impl SourceType {
    /// Wire name used in API requests and responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Article => "article",
            SourceType::PageBuilder => "sp",
            SourceType::CustomField => "custom",
        }
    }

    /// Human-readable label shown next to results.
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::Article => "Article",
            SourceType::PageBuilder => "SP Page",
            SourceType::CustomField => "Article (Custom Field)",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<SourceType> {
        match name {
            "article" => Some(SourceType::Article),
            "sp" | "sppagebuilder" => Some(SourceType::PageBuilder),
            "custom" => Some(SourceType::CustomField),
            _ => None,
        }
    }

    /// All source types, in merge order.
    pub fn all() -> [SourceType; 3] {
        [
            SourceType::Article,
            SourceType::PageBuilder,
            SourceType::CustomField,
        ]
    }
}

/// A plain article row as stored by the content repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub alias: String,
    pub intro_text: String,
    pub full_text: String,
    pub meta_keywords: String,
    pub meta_description: String,
    pub category_id: i64,
    pub created: DateTime<Utc>,
    pub language: String,
    pub access: i64,
    pub published: bool,
}

/// A page-builder page row; the body is an opaque JSON document until the
/// extractor flattens it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub id: i64,
    pub title: String,
    pub alias: String,
    pub body_json: String,
    pub category_id: i64,
    pub created: DateTime<Utc>,
    pub language: String,
    pub access: i64,
    pub published: bool,
}

/// A custom field definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: i64,
    pub title: String,
    pub name: String,
    /// Field type name: "text", "textarea", "editor", "list", "radio",
    /// "checkbox", "sql", "url", "media", "calendar", ...
    pub kind: String,
    pub published: bool,
}

/// A stored value of a custom field on one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub field_id: i64,
    pub item_id: i64,
    pub value: String,
}

/// A content category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub title: String,
    pub alias: String,
    pub published: bool,
}

/// A content tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: i64,
    pub title: String,
    pub alias: String,
    pub published: bool,
}

/// An article candidate, optionally enriched with the text of its custom
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleHit {
    pub record: ArticleRecord,
    /// Concatenated values of the article's searchable custom fields.
    pub custom_field_text: String,
}

/// A page-builder candidate with its flattened body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageHit {
    pub record: PageRecord,
    /// Flattened text produced by the document extractor.
    pub content_text: String,
    /// SHA-256 of the raw JSON body, for parsed-text cache invalidation.
    pub content_hash: String,
}

/// An article matched through its custom field values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldHit {
    pub record: ArticleRecord,
    /// Titles of the fields that matched, in definition order.
    pub matched_fields: Vec<String>,
    /// Number of distinct fields that matched.
    pub match_count: usize,
    /// Weighted hit-sum relevance computed during retrieval.
    pub retrieval_relevance: f64,
    /// Concatenated matching field values, for scoring and snippets.
    pub custom_field_text: String,
}

/// A candidate content item from any source.
///
/// The three variants carry source-specific data; the accessor methods
/// expose the fields every downstream consumer needs (dedup keys, scoring
/// inputs, snippet sources, URL parts).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ContentItem {
    Article(ArticleHit),
    Page(PageHit),
    CustomField(CustomFieldHit),
}

impl ContentItem {
    /// Source this item came from.
    pub fn source_type(&self) -> SourceType {
        match self {
            ContentItem::Article(_) => SourceType::Article,
            ContentItem::Page(_) => SourceType::PageBuilder,
            ContentItem::CustomField(_) => SourceType::CustomField,
        }
    }

    /// Numeric id within the source's own table.
    pub fn id(&self) -> i64 {
        match self {
            ContentItem::Article(hit) => hit.record.id,
            ContentItem::Page(hit) => hit.record.id,
            ContentItem::CustomField(hit) => hit.record.id,
        }
    }

    /// Key used for cross-source deduplication. Custom-field matches point
    /// at the same underlying article, so they share the article key.
    pub fn dedup_key(&self) -> (SourceType, i64) {
        match self {
            ContentItem::CustomField(hit) => (SourceType::Article, hit.record.id),
            other => (other.source_type(), other.id()),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.title,
            ContentItem::Page(hit) => &hit.record.title,
            ContentItem::CustomField(hit) => &hit.record.title,
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.alias,
            ContentItem::Page(hit) => &hit.record.alias,
            ContentItem::CustomField(hit) => &hit.record.alias,
        }
    }

    pub fn category_id(&self) -> i64 {
        match self {
            ContentItem::Article(hit) => hit.record.category_id,
            ContentItem::Page(hit) => hit.record.category_id,
            ContentItem::CustomField(hit) => hit.record.category_id,
        }
    }

    pub fn created(&self) -> DateTime<Utc> {
        match self {
            ContentItem::Article(hit) => hit.record.created,
            ContentItem::Page(hit) => hit.record.created,
            ContentItem::CustomField(hit) => hit.record.created,
        }
    }

    pub fn language(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.language,
            ContentItem::Page(hit) => &hit.record.language,
            ContentItem::CustomField(hit) => &hit.record.language,
        }
    }

    /// Intro text, where the source has one.
    pub fn intro_text(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.intro_text,
            ContentItem::CustomField(hit) => &hit.record.intro_text,
            ContentItem::Page(_) => "",
        }
    }

    /// Full body text, where the source has one.
    pub fn body_text(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.full_text,
            ContentItem::CustomField(hit) => &hit.record.full_text,
            ContentItem::Page(_) => "",
        }
    }

    /// Flattened page-builder text, for page items.
    pub fn content_text(&self) -> &str {
        match self {
            ContentItem::Page(hit) => &hit.content_text,
            _ => "",
        }
    }

    /// Custom-field text attached to this item.
    pub fn custom_field_text(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.custom_field_text,
            ContentItem::CustomField(hit) => &hit.custom_field_text,
            ContentItem::Page(_) => "",
        }
    }

    pub fn meta_keywords(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.meta_keywords,
            ContentItem::CustomField(hit) => &hit.record.meta_keywords,
            ContentItem::Page(_) => "",
        }
    }

    pub fn meta_description(&self) -> &str {
        match self {
            ContentItem::Article(hit) => &hit.record.meta_description,
            ContentItem::CustomField(hit) => &hit.record.meta_description,
            ContentItem::Page(_) => "",
        }
    }

    /// Everything searchable about this item, concatenated. The snippet
    /// generator works off this.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            self.intro_text(),
            self.body_text(),
            self.content_text(),
            self.custom_field_text(),
        ] {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_article(id: i64) -> ArticleRecord {
        ArticleRecord {
            id,
            title: format!("Article {id}"),
            alias: format!("article-{id}"),
            intro_text: "intro".to_string(),
            full_text: "body".to_string(),
            meta_keywords: String::new(),
            meta_description: String::new(),
            category_id: 1,
            created: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            language: "*".to_string(),
            access: 1,
            published: true,
        }
    }

    #[test]
    fn test_source_type_wire_names() {
        assert_eq!(SourceType::Article.as_str(), "article");
        assert_eq!(SourceType::PageBuilder.as_str(), "sp");
        assert_eq!(SourceType::parse("sp"), Some(SourceType::PageBuilder));
        assert_eq!(SourceType::parse("sppagebuilder"), Some(SourceType::PageBuilder));
        assert_eq!(SourceType::parse("bogus"), None);
    }

    #[test]
    fn test_custom_field_hits_share_article_dedup_key() {
        let article = ContentItem::Article(ArticleHit {
            record: sample_article(42),
            custom_field_text: String::new(),
        });
        let custom = ContentItem::CustomField(CustomFieldHit {
            record: sample_article(42),
            matched_fields: vec!["Color".to_string()],
            match_count: 1,
            retrieval_relevance: 4.0,
            custom_field_text: "red".to_string(),
        });

        assert_eq!(article.dedup_key(), custom.dedup_key());
        assert_ne!(article.source_type(), custom.source_type());
    }

    #[test]
    fn test_searchable_text_concatenation() {
        let item = ContentItem::Article(ArticleHit {
            record: sample_article(1),
            custom_field_text: "field text".to_string(),
        });

        assert_eq!(item.searchable_text(), "intro body field text");
    }
}
