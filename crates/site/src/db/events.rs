//! Events calendar queries.

use sqlx::PgPool;
use tracing::instrument;

use tezukuri_core::Event;

use super::RepositoryError;

/// Repository for reading events.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every event, earliest start first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        let events = sqlx::query_as::<_, Event>(
            r"
            SELECT id, title, description, image_url, start_date, end_date
            FROM events
            ORDER BY start_date ASC, id ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }
}
