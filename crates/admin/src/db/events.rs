//! Event calendar writes.

use sqlx::PgPool;
use tracing::instrument;

use tezukuri_core::{Event, EventDraft, EventId};

use super::RepositoryError;

const EVENT_COLUMNS: &str = "id, title, description, image_url, start_date, end_date";

/// Repository for event database operations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every event, latest start first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_newest_first(&self) -> Result<Vec<Event>, RepositoryError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_date DESC, id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no event has this ID.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn get_by_id(&self, id: &EventId) -> Result<Event, RepositoryError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Insert a new event with a generated ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(&self, draft: &EventDraft) -> Result<Event, RepositoryError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r"
            INSERT INTO events (id, title, description, image_url, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(EventId::generate())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "event"))?;

        Ok(event)
    }

    /// Overwrite every editable field of an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no event has this ID.
    /// Returns `RepositoryError::Database` if the update fails.
    #[instrument(skip(self, draft), fields(event_id = %id))]
    pub async fn update(&self, id: &EventId, draft: &EventDraft) -> Result<Event, RepositoryError> {
        sqlx::query_as::<_, Event>(&format!(
            r"
            UPDATE events
            SET title = $2, description = $3, image_url = $4, start_date = $5, end_date = $6
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.image_url)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no event has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn delete(&self, id: &EventId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
