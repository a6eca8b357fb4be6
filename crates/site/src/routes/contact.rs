//! Contact page and form relay handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tezukuri_core::Email;

use crate::filters;
use crate::services::ContactMessage;
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// Response for form submission.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ContactResponse {
    Ok { message_id: String, message: String },
    Error { error: String },
}

impl ContactResponse {
    fn error(error: &str) -> Self {
        Self::Error {
            error: error.to_string(),
        }
    }
}

/// Display the contact page.
///
/// GET /contact
pub async fn page() -> impl IntoResponse {
    ContactTemplate
}

/// Relay a contact form submission by email.
///
/// POST /api/contact
#[instrument(skip(state, form))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> impl IntoResponse {
    let contact = match validate(form) {
        Ok(contact) => contact,
        Err(error) => return (StatusCode::BAD_REQUEST, Json(ContactResponse::error(error))),
    };

    let Some(mailer) = state.mailer() else {
        tracing::warn!("Contact form submitted but SMTP is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ContactResponse::error("Contact form is not configured")),
        );
    };

    match mailer.send(&contact).await {
        Ok(message_id) => (
            StatusCode::OK,
            Json(ContactResponse::Ok {
                message_id,
                message: "Email sent successfully".to_string(),
            }),
        ),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Failed to send contact email");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse::error("Failed to send email")),
            )
        }
    }
}

/// Check required fields and the email shape.
fn validate(form: ContactForm) -> Result<ContactMessage, &'static str> {
    let name = form.name.trim();
    let message = form.message.trim();

    if name.is_empty() || form.email.trim().is_empty() || message.is_empty() {
        return Err("Missing required fields");
    }

    let email = Email::parse(form.email.trim()).map_err(|_| "Invalid email address")?;

    Ok(ContactMessage {
        name: name.to_string(),
        email,
        message: message.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_validate_requires_every_field() {
        assert_eq!(
            validate(form("", "a@b.co", "hi")).unwrap_err(),
            "Missing required fields"
        );
        assert_eq!(
            validate(form("Aiko", "a@b.co", "   ")).unwrap_err(),
            "Missing required fields"
        );
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        assert_eq!(
            validate(form("Aiko", "not-an-email", "hi")).unwrap_err(),
            "Invalid email address"
        );
    }

    #[test]
    fn test_validate_trims_fields() {
        let contact = validate(form("  Aiko ", " aiko@example.com ", " Hello ")).unwrap();
        assert_eq!(contact.name, "Aiko");
        assert_eq!(contact.message, "Hello");
    }

    #[test]
    fn test_response_shape() {
        let ok = serde_json::to_value(ContactResponse::Ok {
            message_id: "<1@tezukurivan.ca>".to_string(),
            message: "Email sent successfully".to_string(),
        })
        .unwrap();
        assert_eq!(ok["status"], "ok");
        assert_eq!(ok["message_id"], "<1@tezukurivan.ca>");

        let err = serde_json::to_value(ContactResponse::error("Missing required fields")).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_submit_without_mailer_reports_not_configured() {
        let response = submit(
            State(test_state()),
            Json(form("Aiko", "aiko@example.com", "Are you at the market?")),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Contact form is not configured");
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_form_before_mailer() {
        let response = submit(State(test_state()), Json(form("", "", "")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
