//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Page handlers return `Result<T, AppError>` and
//! errors render the shared error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed while loading a page.
    ///
    /// The message is shown to the visitor, e.g. "Error loading products".
    #[error("{message}: {source}")]
    Load {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Wrap a read failure with the message shown on the error page.
    ///
    /// A missing row becomes [`AppError::NotFound`].
    #[must_use]
    pub fn load(message: &'static str, source: RepositoryError) -> Self {
        match source {
            RepositoryError::NotFound => Self::NotFound(message.to_string()),
            source => Self::Load { message, source },
        }
    }
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    /// Page heading.
    pub title: String,
    /// Explanation shown under the heading.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Load { .. }) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Load { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let page = match &self {
            Self::Load { message, .. } => ErrorTemplate {
                title: "Something went wrong".to_string(),
                message: (*message).to_string(),
            },
            Self::NotFound(_) => ErrorTemplate {
                title: "Page not found".to_string(),
                message: "We couldn't find what you were looking for.".to_string(),
            },
        };

        (status, page).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("product".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::load(
                "Error loading products",
                RepositoryError::Database(sqlx::Error::PoolTimedOut)
            )),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_row_becomes_not_found() {
        let err = AppError::load("Error loading product", RepositoryError::NotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_load_error_display() {
        let err = AppError::load(
            "Error loading products",
            RepositoryError::Database(sqlx::Error::PoolTimedOut),
        );
        assert!(err.to_string().starts_with("Error loading products: "));
    }
}
