//! Home and about page section queries.

use sqlx::PgPool;
use tracing::instrument;

use tezukuri_core::{ContentSection, SectionPage, SectionSet};

use super::RepositoryError;

/// Repository for reading page sections.
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
            r"
            SELECT id, section_key, title, subtitle, content, image_url,
                   image_urls, value_items, updated_at
            FROM {}
            ORDER BY section_key
            ",
            page.table()
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(SectionSet::new(sections))
    }
}
