//! Product catalog writes, including the display-rank batch update.

use futures::future::join_all;
use sqlx::PgPool;
use thiserror::Error;
use tracing::instrument;

use tezukuri_core::{BRAND, Product, ProductDraft, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, brand, category, description, price, image_url, \
     gallery_images, in_stock, display_rank, tags, created_at, updated_at";

/// Some rank updates in a batch failed.
///
/// Updates that succeeded are kept; there is no rollback.
#[derive(Debug, Error)]
#[error("failed to update display rank for {} product(s): {}", .failed.len(), join_ids(.failed))]
pub struct BatchUpdateError {
    /// Products whose rank was not written.
    pub failed: Vec<ProductId>,
    /// Failed products that no longer exist.
    pub missing: Vec<ProductId>,
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter()
        .map(ProductId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every product, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new product with a generated ID.
    ///
    /// The rank is stored as given, so a draft without one stays unranked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO products
                (id, name, brand, category, description, price, image_url,
                 gallery_images, in_stock, display_rank, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate())
        .bind(&draft.name)
        .bind(BRAND)
        .bind(&draft.category)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image_url)
        .bind(&draft.gallery_images)
        .bind(draft.in_stock)
        .bind(draft.display_rank)
        .bind(&draft.tags)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "product"))?;

        Ok(product)
    }

    /// Overwrite every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE products
            SET name = $2, brand = $3, category = $4, description = $5, price = $6,
                image_url = $7, gallery_images = $8, in_stock = $9, display_rank = $10,
                tags = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(BRAND)
        .bind(&draft.category)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image_url)
        .bind(&draft.gallery_images)
        .bind(draft.in_stock)
        .bind(draft.display_rank)
        .bind(&draft.tags)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Write a display rank per product.
    ///
    /// One `UPDATE` is issued per product and all of them run concurrently.
    /// A product that no longer exists counts as a failure.
    ///
    /// # Errors
    ///
    /// Returns [`BatchUpdateError`] naming every product whose update failed.
    #[instrument(skip(self, ranks), fields(count = ranks.len()))]
    pub async fn save_display_ranks(
        &self,
        ranks: &[(ProductId, i32)],
    ) -> Result<(), BatchUpdateError> {
        let updates = ranks.iter().map(|(id, rank)| async move {
            let result = self.set_display_rank(id, *rank).await;
            (id, result)
        });

        let mut failed = Vec::new();
        let mut missing = Vec::new();
        for (id, result) in join_all(updates).await {
            match result {
                Ok(()) => {}
                Err(RepositoryError::NotFound) => {
                    tracing::warn!(product_id = %id, "Product removed before its display rank was saved");
                    failed.push(id.clone());
                    missing.push(id.clone());
                }
                Err(e) => {
                    tracing::error!(product_id = %id, error = %e, "Failed to save display rank");
                    failed.push(id.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(BatchUpdateError { failed, missing })
        }
    }

    async fn set_display_rank(&self, id: &ProductId, rank: i32) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE products SET display_rank = $1, updated_at = NOW() WHERE id = $2")
                .bind(rank)
                .bind(id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
