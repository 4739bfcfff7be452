//! The content repository collaborator.
//!
//! The engine never owns content; it queries a repository the host
//! application provides. The trait is deliberately narrow: list candidate
//! rows, look up categories and tags, and report feature absence (a `None`
//! from the page-builder or custom-field listings means that feature is not
//! installed, which the adapters treat as "contribute nothing", not as an
//! error).
//!
//! [`MemoryRepository`] is the bundled implementation used by tests and the
//! demo binary.

use parking_lot::RwLock;

use crate::content::item::{
    ArticleRecord, CategoryRecord, FieldDefinition, FieldValue, PageRecord, TagRecord,
};
use crate::error::Result;

/// Read access to the host application's content.
pub trait ContentRepository: Send + Sync + std::fmt::Debug {
    /// All article rows. Adapters filter by state, language, access, and
    /// category themselves.
    fn articles(&self) -> Result<Vec<ArticleRecord>>;

    /// All page-builder rows, or `None` when the page-builder feature is
    /// not installed.
    fn page_builder_pages(&self) -> Result<Option<Vec<PageRecord>>>;

    /// All custom field definitions, or `None` when the custom-field
    /// feature is not installed.
    fn field_definitions(&self) -> Result<Option<Vec<FieldDefinition>>>;

    /// Stored values for the given field definitions.
    fn field_values(&self, field_ids: &[i64]) -> Result<Vec<FieldValue>>;

    /// Values of all published fields attached to one article, paired with
    /// their definitions.
    fn fields_for_item(&self, item_id: i64) -> Result<Vec<(FieldDefinition, FieldValue)>>;

    /// Look up one article by id.
    fn article_by_id(&self, id: i64) -> Result<Option<ArticleRecord>>;

    /// Look up one category by id.
    fn category(&self, id: i64) -> Result<Option<CategoryRecord>>;

    /// All categories.
    fn categories(&self) -> Result<Vec<CategoryRecord>>;

    /// All tags.
    fn tags(&self) -> Result<Vec<TagRecord>>;
}

/// In-memory content repository.
///
/// Backs tests and the demo binary. The page-builder and custom-field
/// stores start absent (`None`) and exist once content is added, matching
/// how a live installation looks before and after those features are
/// installed.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    articles: RwLock<Vec<ArticleRecord>>,
    pages: RwLock<Option<Vec<PageRecord>>>,
    field_definitions: RwLock<Option<Vec<FieldDefinition>>>,
    field_values: RwLock<Vec<FieldValue>>,
    categories: RwLock<Vec<CategoryRecord>>,
    tags: RwLock<Vec<TagRecord>>,
}

impl MemoryRepository {
    /// Create an empty repository with no optional features installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an article.
    pub fn add_article(&self, article: ArticleRecord) {
        self.articles.write().push(article);
    }

    /// Add a page-builder page, installing the feature if absent.
    pub fn add_page(&self, page: PageRecord) {
        self.pages.write().get_or_insert_with(Vec::new).push(page);
    }

    /// Install the page-builder feature with no pages.
    pub fn install_page_builder(&self) {
        self.pages.write().get_or_insert_with(Vec::new);
    }

    /// Add a custom field definition, installing the feature if absent.
    pub fn add_field(&self, field: FieldDefinition) {
        self.field_definitions
            .write()
            .get_or_insert_with(Vec::new)
            .push(field);
    }

    /// Add a custom field value.
    pub fn add_field_value(&self, value: FieldValue) {
        self.field_values.write().push(value);
    }

    /// Add a category.
    pub fn add_category(&self, category: CategoryRecord) {
        self.categories.write().push(category);
    }

    /// Add a tag.
    pub fn add_tag(&self, tag: TagRecord) {
        self.tags.write().push(tag);
    }
}

impl ContentRepository for MemoryRepository {
    fn articles(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self.articles.read().clone())
    }

    fn page_builder_pages(&self) -> Result<Option<Vec<PageRecord>>> {
        Ok(self.pages.read().clone())
    }

    fn field_definitions(&self) -> Result<Option<Vec<FieldDefinition>>> {
        Ok(self.field_definitions.read().clone())
    }

    fn field_values(&self, field_ids: &[i64]) -> Result<Vec<FieldValue>> {
        Ok(self
            .field_values
            .read()
            .iter()
            .filter(|value| field_ids.contains(&value.field_id))
            .cloned()
            .collect())
    }

    fn fields_for_item(&self, item_id: i64) -> Result<Vec<(FieldDefinition, FieldValue)>> {
        let definitions = self.field_definitions.read();
        let Some(definitions) = definitions.as_ref() else {
            return Ok(Vec::new());
        };

        let values = self.field_values.read();
        let mut pairs = Vec::new();
        for definition in definitions.iter().filter(|d| d.published) {
            for value in values
                .iter()
                .filter(|v| v.item_id == item_id && v.field_id == definition.id)
            {
                pairs.push((definition.clone(), value.clone()));
            }
        }
        Ok(pairs)
    }

    fn article_by_id(&self, id: i64) -> Result<Option<ArticleRecord>> {
        Ok(self.articles.read().iter().find(|a| a.id == id).cloned())
    }

    fn category(&self, id: i64) -> Result<Option<CategoryRecord>> {
        Ok(self.categories.read().iter().find(|c| c.id == id).cloned())
    }

    fn categories(&self) -> Result<Vec<CategoryRecord>> {
        Ok(self.categories.read().clone())
    }

    fn tags(&self) -> Result<Vec<TagRecord>> {
        Ok(self.tags.read().clone())
    }
}
