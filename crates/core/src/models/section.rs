//! Editable page sections for the home and about pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SectionId, SectionKey};

/// A card in a values section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueItem {
    /// Card heading.
    pub title: String,
    /// Card body.
    pub description: String,
}

impl ValueItem {
    /// Whether both fields are blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.description.trim().is_empty()
    }
}

/// One stored section row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ContentSection {
    /// Unique section ID.
    pub id: SectionId,
    /// Which block of the page this is.
    #[cfg_attr(feature = "postgres", sqlx(rename = "section_key"))]
    pub key: SectionKey,
    /// Section heading.
    pub title: String,
    /// Optional line under the heading.
    pub subtitle: Option<String>,
    /// Plain text or HTML body, depending on [`SectionKey::is_plain_text`].
    pub content: Option<String>,
    /// Side image.
    pub image_url: Option<String>,
    /// Slider images, in display order.
    pub image_urls: Vec<String>,
    /// Value cards, stored as a JSON array.
    #[cfg_attr(feature = "postgres", sqlx(json))]
    pub value_items: Vec<ValueItem>,
    /// When the section was last saved.
    pub updated_at: DateTime<Utc>,
}

impl ContentSection {
    /// Body text, or an empty string when unset.
    #[must_use]
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Grid class for the values cards, by card count.
    #[must_use]
    pub const fn value_columns(&self) -> &'static str {
        match self.value_items.len() {
            1 => "grid-cols-1",
            2 => "md:grid-cols-2",
            _ => "md:grid-cols-3",
        }
    }
}

/// Fields written by the section editors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUpdate {
    /// Section heading.
    pub title: String,
    /// Optional line under the heading.
    pub subtitle: Option<String>,
    /// Plain text or HTML body.
    pub content: Option<String>,
    /// Side image.
    pub image_url: Option<String>,
    /// Slider images.
    pub image_urls: Vec<String>,
    /// Value cards; blank cards are dropped on save.
    pub value_items: Vec<ValueItem>,
}

impl SectionUpdate {
    /// Start an update from a stored section.
    #[must_use]
    pub fn from_section(section: &ContentSection) -> Self {
        Self {
            title: section.title.clone(),
            subtitle: section.subtitle.clone(),
            content: section.content.clone(),
            image_url: section.image_url.clone(),
            image_urls: section.image_urls.clone(),
            value_items: section.value_items.clone(),
        }
    }

    /// Value items with blank cards removed.
    #[must_use]
    pub fn cleaned_value_items(&self) -> Vec<ValueItem> {
        self.value_items
            .iter()
            .filter(|item| !item.is_blank())
            .cloned()
            .collect()
    }
}

/// All sections loaded for one page, looked up by key.
///
/// A missing key means the section is simply not rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSet {
    sections: Vec<ContentSection>,
}

impl SectionSet {
    /// Wrap the rows loaded for a page.
    #[must_use]
    pub const fn new(sections: Vec<ContentSection>) -> Self {
        Self { sections }
    }

    /// Section stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: SectionKey) -> Option<&ContentSection> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Hero section.
    #[must_use]
    pub fn hero(&self) -> Option<&ContentSection> {
        self.get(SectionKey::Hero)
    }

    /// About page intro section.
    #[must_use]
    pub fn intro(&self) -> Option<&ContentSection> {
        self.get(SectionKey::Intro)
    }

    /// Values section.
    #[must_use]
    pub fn values(&self) -> Option<&ContentSection> {
        self.get(SectionKey::Values)
    }

    /// Home page call to action.
    #[must_use]
    pub fn contact_cta(&self) -> Option<&ContentSection> {
        self.get(SectionKey::ContactCta)
    }

    /// Home page about teaser.
    #[must_use]
    pub fn about_preview(&self) -> Option<&ContentSection> {
        self.get(SectionKey::AboutPreview)
    }

    /// Whether no sections were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate over the loaded sections.
    pub fn iter(&self) -> impl Iterator<Item = &ContentSection> {
        self.sections.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(key: SectionKey, items: usize) -> ContentSection {
        ContentSection {
            id: SectionId::new(key.as_str()),
            key,
            title: key.label().to_owned(),
            subtitle: None,
            content: None,
            image_url: None,
            image_urls: Vec::new(),
            value_items: vec![ValueItem::default(); items],
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_section_is_none() {
        let set = SectionSet::new(vec![section(SectionKey::Hero, 0)]);
        assert!(set.hero().is_some());
        assert!(set.values().is_none());
        assert!(set.contact_cta().is_none());
        assert!(SectionSet::default().is_empty());
    }

    #[test]
    fn test_value_columns() {
        assert_eq!(section(SectionKey::Values, 1).value_columns(), "grid-cols-1");
        assert_eq!(section(SectionKey::Values, 2).value_columns(), "md:grid-cols-2");
        assert_eq!(section(SectionKey::Values, 5).value_columns(), "md:grid-cols-3");
    }

    #[test]
    fn test_cleaned_value_items_drops_blank_cards() {
        let update = SectionUpdate {
            value_items: vec![
                ValueItem {
                    title: "Simplicity".to_owned(),
                    description: String::new(),
                },
                ValueItem {
                    title: "  ".to_owned(),
                    description: String::new(),
                },
            ],
            ..SectionUpdate::default()
        };
        assert_eq!(update.cleaned_value_items().len(), 1);
    }
}
