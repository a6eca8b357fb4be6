//! Home and about page section storage.

use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use tezukuri_core::{ContentSection, SectionId, SectionKey, SectionPage, SectionSet, SectionUpdate};

use super::RepositoryError;

const SECTION_COLUMNS: &str =
    "id, section_key, title, subtitle, content, image_url, image_urls, value_items, updated_at";

/// Repository for page section database operations.
pub struct SectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SectionRepository<'a> {
    /// Create a new section repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Load every section stored for a page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(page = %page))]
    pub async fn list_for_page(&self, page: SectionPage) -> Result<SectionSet, RepositoryError> {
        // Table name comes from a closed enum, never from input
        let sections = sqlx::query_as::<_, ContentSection>(&format!(
            "SELECT {SECTION_COLUMNS} FROM {} ORDER BY section_key",
            page.table()
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(SectionSet::new(sections))
    }

    /// Write a section, creating the row if the page does not have it yet.
    ///
    /// Blank value cards are dropped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if `key` does not belong on `page`.
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, update), fields(page = %page, key = %key))]
    pub async fn save(
        &self,
        page: SectionPage,
        key: SectionKey,
        update: &SectionUpdate,
    ) -> Result<ContentSection, RepositoryError> {
        if !page.contains(key) {
            return Err(RepositoryError::Conflict(format!(
                "section {key} is not part of the {page} page"
            )));
        }

        let section = sqlx::query_as::<_, ContentSection>(&format!(
            r"
            INSERT INTO {table}
                (id, section_key, title, subtitle, content, image_url, image_urls, value_items)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (section_key) DO UPDATE
            SET title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                content = EXCLUDED.content,
                image_url = EXCLUDED.image_url,
                image_urls = EXCLUDED.image_urls,
                value_items = EXCLUDED.value_items,
                updated_at = NOW()
            RETURNING {SECTION_COLUMNS}
            ",
            table = page.table()
        ))
        .bind(SectionId::generate())
        .bind(key)
        .bind(&update.title)
        .bind(&update.subtitle)
        .bind(&update.content)
        .bind(&update.image_url)
        .bind(&update.image_urls)
        .bind(Json(update.cleaned_value_items()))
        .fetch_one(self.pool)
        .await?;

        Ok(section)
    }

    /// Insert an empty row for every section key of `page` that is missing.
    ///
    /// Returns the number of rows created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if an insert fails.
    #[instrument(skip(self), fields(page = %page))]
    pub async fn seed_missing(&self, page: SectionPage) -> Result<u64, RepositoryError> {
        let mut created = 0;
        for key in page.keys() {
            let result = sqlx::query(&format!(
                r"
                INSERT INTO {} (id, section_key, title)
                VALUES ($1, $2, $3)
                ON CONFLICT (section_key) DO NOTHING
                ",
                page.table()
            ))
            .bind(SectionId::generate())
            .bind(key)
            .bind(key.label())
            .execute(self.pool)
            .await?;
            created += result.rows_affected();
        }
        Ok(created)
    }
}
