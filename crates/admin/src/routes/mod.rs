//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! GET  /auth/login                   - Login page
//! POST /auth/login                   - Email + password login
//! POST /auth/logout                  - Logout
//!
//! # Dashboard
//! GET  /                             - Links to every editor
//!
//! # Products
//! GET  /products                     - Product listing (display order)
//! GET  /products/new                 - New product form
//! POST /products                     - Create product (multipart)
//! GET  /products/{id}/edit           - Edit product form
//! POST /products/{id}                - Update product (multipart)
//! POST /products/{id}/delete         - Delete product
//!
//! # Product order manager
//! GET  /products/order               - Current draft order
//! POST /products/order/move          - Move one step (id, direction)
//! POST /products/order/drag          - Drag and drop (from, to)
//! POST /products/order/reset         - Discard the draft
//! POST /products/order/save          - Persist the draft ranks
//!
//! # Events
//! GET  /events                       - Event listing (newest first)
//! GET  /events/new                   - New event form
//! POST /events                       - Create event (multipart)
//! GET  /events/{id}/edit             - Edit event form
//! POST /events/{id}                  - Update event (multipart)
//! POST /events/{id}/delete           - Delete event
//!
//! # Page sections
//! GET  /sections/{page}              - Section editor for `home` or `about`
//! POST /sections/{page}/{key}        - Save one section (multipart)
//!
//! # Rich text editor support (JSON)
//! POST /api/rich-text/render         - Image attributes to markup
//! POST /api/rich-text/parse          - Markup to image attributes
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod events;
pub mod form;
pub mod product_order;
pub mod products;
pub mod sections;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::Html,
    routing::{get, post},
};

use crate::services::media::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Largest accepted request body; a form may carry several images.
const MAX_FORM_BYTES: usize = 4 * MAX_UPLOAD_BYTES;

pub use dashboard::AdminUserView;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .route("/", get(dashboard::index))
        .merge(product_order::router())
        .route("/products", get(products::index).post(products::create))
        .route("/products/new", get(products::new_product))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/edit", get(products::edit))
        .route("/products/{id}/delete", post(products::delete))
        .route("/events", get(events::index).post(events::create))
        .route("/events/new", get(events::new_event))
        .route("/events/{id}", post(events::update))
        .route("/events/{id}/edit", get(events::edit))
        .route("/events/{id}/delete", post(events::delete))
        .merge(sections::router())
        .merge(api::router())
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES))
}

/// Render a template, logging and hiding render failures.
pub(crate) fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}
