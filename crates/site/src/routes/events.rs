//! Events page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use tezukuri_core::Event;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Events page template.
#[derive(Template, WebTemplate)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub events: Vec<Event>,
}

/// Display all events, earliest first.
///
/// GET /events
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let events = state
        .content()
        .events()
        .await
        .map_err(|e| AppError::load("Error loading events", e))?;

    Ok(EventsTemplate { events })
}
