//! Field weights and the per-item field set.

use serde::{Deserialize, Serialize};

use crate::content::item::ContentItem;

/// Base weight of each searchable field.
///
/// Weights express how much a match in that field is worth relative to the
/// others; the title dominates, body text matters least.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f64,
    pub intro: f64,
    pub body: f64,
    pub page_content: f64,
    pub custom_fields: f64,
    pub meta_keywords: f64,
    pub meta_description: f64,
    pub alias: f64,
    pub category_title: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 10.0,
            intro: 5.0,
            body: 3.0,
            page_content: 5.0,
            custom_fields: 4.0,
            meta_keywords: 8.0,
            meta_description: 6.0,
            alias: 7.0,
            category_title: 3.0,
        }
    }
}

impl FieldWeights {
    /// Sum of all field weights, used by the maximum-score formula.
    pub fn total(&self) -> f64 {
        self.title
            + self.intro
            + self.body
            + self.page_content
            + self.custom_fields
            + self.meta_keywords
            + self.meta_description
            + self.alias
            + self.category_title
    }
}

/// Identifies a field for field-specific score adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Intro,
    Body,
    PageContent,
    CustomFields,
    MetaKeywords,
    MetaDescription,
    Alias,
    CategoryTitle,
}

/// The extracted text of one candidate item, one string per searchable
/// field. Fields a source does not have stay empty and contribute nothing.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    pub title: String,
    pub intro: String,
    pub body: String,
    pub page_content: String,
    pub custom_fields: String,
    pub meta_keywords: String,
    pub meta_description: String,
    pub alias: String,
    pub category_title: String,
}

impl FieldSet {
    /// Build the field set for a content item. The category title comes
    /// from the caller because resolving it needs the repository (memoized
    /// per request).
    pub fn from_item(item: &ContentItem, category_title: String) -> Self {
        FieldSet {
            title: item.title().to_string(),
            intro: item.intro_text().to_string(),
            body: item.body_text().to_string(),
            page_content: item.content_text().to_string(),
            custom_fields: item.custom_field_text().to_string(),
            meta_keywords: item.meta_keywords().to_string(),
            meta_description: item.meta_description().to_string(),
            alias: item.alias().to_string(),
            category_title,
        }
    }

    /// Iterate non-empty fields with their kind and base weight.
    pub fn weighted_fields<'a>(
        &'a self,
        weights: &FieldWeights,
    ) -> Vec<(FieldKind, &'a str, f64)> {
        let all = [
            (FieldKind::Title, self.title.as_str(), weights.title),
            (FieldKind::Intro, self.intro.as_str(), weights.intro),
            (FieldKind::Body, self.body.as_str(), weights.body),
            (
                FieldKind::PageContent,
                self.page_content.as_str(),
                weights.page_content,
            ),
            (
                FieldKind::CustomFields,
                self.custom_fields.as_str(),
                weights.custom_fields,
            ),
            (
                FieldKind::MetaKeywords,
                self.meta_keywords.as_str(),
                weights.meta_keywords,
            ),
            (
                FieldKind::MetaDescription,
                self.meta_description.as_str(),
                weights.meta_description,
            ),
            (FieldKind::Alias, self.alias.as_str(), weights.alias),
            (
                FieldKind::CategoryTitle,
                self.category_title.as_str(),
                weights.category_title,
            ),
        ];

        all.into_iter().filter(|(_, text, _)| !text.is_empty()).collect()
    }

    /// The fields combined for phrase/proximity checks, lowercased.
    pub fn combined_text(&self) -> String {
        let mut combined = String::new();
        for part in [
            &self.title,
            &self.intro,
            &self.body,
            &self.page_content,
            &self.meta_keywords,
        ] {
            if !part.is_empty() {
                if !combined.is_empty() {
                    combined.push(' ');
                }
                combined.push_str(&part.to_lowercase());
            }
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = FieldWeights::default();
        assert_eq!(weights.title, 10.0);
        assert_eq!(weights.body, 3.0);
        assert_eq!(weights.total(), 51.0);
    }

    #[test]
    fn test_empty_fields_skipped() {
        let set = FieldSet {
            title: "Hello".to_string(),
            ..Default::default()
        };

        let fields = set.weighted_fields(&FieldWeights::default());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, FieldKind::Title);
    }

    #[test]
    fn test_combined_text_is_lowercased() {
        let set = FieldSet {
            title: "Joomla Search".to_string(),
            intro: "Intro TEXT".to_string(),
            ..Default::default()
        };

        assert_eq!(set.combined_text(), "joomla search intro text");
    }
}
