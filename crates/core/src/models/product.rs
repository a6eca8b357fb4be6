//! Product catalog records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ordering::Ranked;
use crate::types::{Price, ProductId};

/// Brand stamped on every product saved from the admin panel.
pub const BRAND: &str = "TEZUKURI VAN";

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand shown above the name.
    pub brand: String,
    /// Free-form category.
    pub category: String,
    /// Plain text description.
    pub description: String,
    /// Price in dollars.
    pub price: Price,
    /// Main image reference.
    pub image_url: String,
    /// Additional images, in slideshow order.
    pub gallery_images: Vec<String>,
    /// Whether the product can currently be ordered.
    pub in_stock: bool,
    /// Position in the catalog; lower first, `None` after every ranked product.
    pub display_rank: Option<i32>,
    /// Search and filter tags.
    pub tags: Vec<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Main image followed by the gallery, skipping blanks and repeats.
    #[must_use]
    pub fn slideshow(&self) -> Vec<&str> {
        let mut images: Vec<&str> = Vec::with_capacity(self.gallery_images.len() + 1);
        for url in std::iter::once(&self.image_url).chain(&self.gallery_images) {
            let url = url.trim();
            if !url.is_empty() && !images.contains(&url) {
                images.push(url);
            }
        }
        images
    }
}

impl Ranked for Product {
    type Id = ProductId;

    fn display_rank(&self) -> Option<i32> {
        self.display_rank
    }

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Product fields accepted from the admin form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// Product name.
    pub name: String,
    /// Free-form category.
    pub category: String,
    /// Plain text description.
    pub description: String,
    /// Price in dollars.
    pub price: Price,
    /// Main image reference.
    pub image_url: String,
    /// Additional images, in slideshow order.
    pub gallery_images: Vec<String>,
    /// Whether the product can currently be ordered.
    pub in_stock: bool,
    /// Explicit rank, if one was entered.
    pub display_rank: Option<i32>,
    /// Search and filter tags.
    pub tags: Vec<String>,
}

impl ProductDraft {
    /// Start a draft from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            gallery_images: product.gallery_images.clone(),
            in_stock: product.in_stock,
            display_rank: product.display_rank,
            tags: product.tags.clone(),
        }
    }

    /// Split a comma separated tag field into trimmed, non-empty tags.
    #[must_use]
    pub fn parse_tags(input: &str) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_owned());
            }
        }
        tags
    }

    /// Tags joined back into the form field representation.
    #[must_use]
    pub fn tags_field(&self) -> String {
        self.tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Canvas tote".to_owned(),
            brand: BRAND.to_owned(),
            category: "bags".to_owned(),
            description: String::new(),
            price: Price::new(Decimal::new(4500, 2)),
            image_url: "/media/products/1-tote.jpg".to_owned(),
            gallery_images: vec![
                "/media/products/gallery/2-side.jpg".to_owned(),
                " ".to_owned(),
                "/media/products/1-tote.jpg".to_owned(),
            ],
            in_stock: true,
            display_rank: None,
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_slideshow_dedupes_and_skips_blanks() {
        let product = product();
        assert_eq!(
            product.slideshow(),
            vec!["/media/products/1-tote.jpg", "/media/products/gallery/2-side.jpg"]
        );
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            ProductDraft::parse_tags(" canvas, Bags ,, canvas ,bags"),
            vec!["canvas".to_owned(), "Bags".to_owned()]
        );
        assert!(ProductDraft::parse_tags("  ").is_empty());
    }

    #[test]
    fn test_draft_keeps_missing_rank() {
        let draft = ProductDraft::from_product(&product());
        assert_eq!(draft.display_rank, None);
        assert_eq!(draft.tags_field(), "");
    }
}
