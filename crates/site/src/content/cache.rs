//! Cache types for content store reads.

use tezukuri_core::{Event, Product, ProductId, SectionPage, SectionSet};

/// Cache key for content reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Events,
    Sections(SectionPage),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Events(Vec<Event>),
    Sections(SectionSet),
}
