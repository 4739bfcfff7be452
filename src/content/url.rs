//! Display URL construction.
//!
//! Results carry a site-relative URL built from the item's id, alias, and
//! (for articles) its category alias. Slugs combine id and alias so the
//! route stays resolvable after an alias edit.

use crate::content::item::{ContentItem, SourceType};

/// Build the display URL for an article.
pub fn article_url(id: i64, alias: &str, category_alias: &str) -> String {
    if category_alias.is_empty() {
        format!("/articles/{id}-{alias}")
    } else {
        format!("/articles/{category_alias}/{id}-{alias}")
    }
}

/// Build the display URL for a page-builder page.
pub fn page_url(id: i64, alias: &str) -> String {
    format!("/pages/{id}-{alias}")
}

/// Resolve the display URL for any content item. Custom-field matches link
/// to their underlying article.
pub fn item_url(item: &ContentItem, category_alias: &str) -> String {
    match item.source_type() {
        SourceType::Article | SourceType::CustomField => {
            article_url(item.id(), item.alias(), category_alias)
        }
        SourceType::PageBuilder => page_url(item.id(), item.alias()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url_with_category() {
        assert_eq!(article_url(5, "hello-world", "news"), "/articles/news/5-hello-world");
    }

    #[test]
    fn test_article_url_without_category() {
        assert_eq!(article_url(5, "hello-world", ""), "/articles/5-hello-world");
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url(9, "landing"), "/pages/9-landing");
    }
}
