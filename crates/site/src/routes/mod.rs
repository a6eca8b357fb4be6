//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Home page
//! GET  /products        - Product listing in display order
//! GET  /products/{id}   - Product detail with image slideshow
//! GET  /events          - Upcoming events
//! GET  /about           - About page
//! GET  /contact         - Contact page
//! POST /api/contact     - Contact form relay (JSON)
//! ```
//!
//! `/health`, `/health/ready`, `/static` and `/media` are mounted in `main`.

pub mod about;
pub mod contact;
pub mod events;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the main router with all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/events", get(events::index))
        .route("/about", get(about::about))
        .route("/contact", get(contact::page))
        .route("/api/contact", post(contact::submit))
        .fallback(not_found)
}

/// Render the 404 page for unknown paths.
async fn not_found() -> crate::error::AppError {
    crate::error::AppError::NotFound("page".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::test_state;

    fn app() -> Router {
        routes().with_state(test_state())
    }

    #[tokio::test]
    async fn test_products_page_reports_load_failure() {
        let response = app()
            .oneshot(Request::get("/products").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Error loading products"));
    }

    #[tokio::test]
    async fn test_home_renders_without_sections() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = app()
            .oneshot(Request::get("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_contact_rejects_missing_fields() {
        let request = Request::post("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Aiko","email":"","message":"hi"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contact_without_mailer_fails() {
        let request = Request::post("/api/contact")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Aiko","email":"aiko@example.com","message":"hi"}"#,
            ))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
