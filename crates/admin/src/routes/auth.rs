//! Authentication route handlers for the admin panel.
//!
//! Email and password login. Accounts are created with
//! `tz-cli admin create`.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{AdminAuthService, AuthError};
use crate::state::AppState;

use super::render;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    email: String,
    error: Option<String>,
}

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page() -> impl IntoResponse {
    render(&LoginPageTemplate {
        email: String::new(),
        error: None,
    })
}

/// Check credentials and start an admin session.
///
/// POST /auth/login
#[instrument(skip(state, session, form), fields(email = %form.email))]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AdminAuthService::new(state.pool());

    let (status, error) = match service.login(&form.email, &form.password).await {
        Ok(user) => {
            let admin = CurrentAdmin::from(&user);
            match set_current_admin(&session, &admin).await {
                Ok(()) => {
                    tracing::info!(admin_user_id = %admin.id, "Admin logged in");
                    return Redirect::to("/").into_response();
                }
                Err(e) => {
                    tracing::error!("Failed to store admin session: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Login failed, please try again",
                    )
                }
            }
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Rejected admin login");
            (StatusCode::UNAUTHORIZED, "Invalid email or password")
        }
        Err(e) => {
            tracing::error!("Admin login failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Login failed, please try again",
            )
        }
    };

    let page = render(&LoginPageTemplate {
        email: form.email,
        error: Some(error.to_string()),
    });
    (status, page).into_response()
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::warn!("Failed to clear admin session: {e}");
    }

    Redirect::to("/auth/login")
}
