//! Cached reader over the content store.
//!
//! Every public page reads through [`ContentClient`]. Results are cached with
//! `moka` for the revalidation window (`SITE_REVALIDATE_SECS`), so the
//! database is consulted at most once per window per key. Edits made in the
//! admin panel show up once the cached entry expires. Failed reads are never
//! cached.

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::{debug, instrument};

use tezukuri_core::ordering::sort_for_display;
use tezukuri_core::{Event, Product, ProductId, SectionPage, SectionSet};

use crate::db::{EventRepository, ProductRepository, RepositoryError, SectionRepository};

pub use cache::{CacheKey, CacheValue};

/// Cached access to products, events and page sections.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    pool: PgPool,
    cache: Cache<CacheKey, CacheValue>,
}

impl ContentClient {
    /// Create a new content client with the given revalidation window.
    #[must_use]
    pub fn new(pool: PgPool, revalidate: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(revalidate)
            .build();

        Self {
            inner: Arc::new(ContentClientInner { pool, cache }),
        }
    }

    /// All products in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut products = ProductRepository::new(&self.inner.pool).list_all().await?;
        sort_for_display(&mut products);

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist, or
    /// an error if the database query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = ProductRepository::new(&self.inner.pool).get_by_id(id).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// All events, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self))]
    pub async fn events(&self) -> Result<Vec<Event>, RepositoryError> {
        if let Some(CacheValue::Events(events)) = self.inner.cache.get(&CacheKey::Events).await {
            debug!("Cache hit for events");
            return Ok(events);
        }

        let events = EventRepository::new(&self.inner.pool)
            .list_all()
            .await?;

        self.inner
            .cache
            .insert(CacheKey::Events, CacheValue::Events(events.clone()))
            .await;

        Ok(events)
    }

    /// Sections stored for a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self), fields(page = %page))]
    pub async fn sections(&self, page: SectionPage) -> Result<SectionSet, RepositoryError> {
        let key = CacheKey::Sections(page);

        if let Some(CacheValue::Sections(sections)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for sections");
            return Ok(sections);
        }

        let sections = SectionRepository::new(&self.inner.pool)
            .list_for_page(page)
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Sections(sections.clone()))
            .await;

        Ok(sections)
    }

    /// Seed the cache directly.
    #[cfg(test)]
    pub(crate) async fn prime(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }
}
