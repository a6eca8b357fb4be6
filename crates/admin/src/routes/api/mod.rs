//! JSON API endpoints used by admin page scripts.

pub mod rich_text;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(rich_text::router())
}
