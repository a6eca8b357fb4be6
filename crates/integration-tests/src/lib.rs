//! Integration tests for Tezukuri Van.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p tezukuri-cli -- migrate
//! cargo run -p tezukuri-cli -- admin create -e test@tezukurivan.ca -n Test -p "integration pass"
//!
//! # Start both servers, then
//! TEST_ADMIN_EMAIL=test@tezukurivan.ca TEST_ADMIN_PASSWORD="integration pass" \
//!     cargo test -p tezukuri-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `site` - Public pages and the contact endpoint
//! - `admin` - Login gate, editors and the order manager
//! - `database` - Repository behaviour against a real database

use reqwest::Client;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use sqlx::PgPool;

/// Base URL of the public site.
#[must_use]
pub fn site_base_url() -> String {
    std::env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL of the admin panel.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// HTTP client with a cookie jar that does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Client logged into the admin panel as `TEST_ADMIN_EMAIL`.
///
/// # Panics
///
/// Panics if the credentials are not set or the login is rejected.
pub async fn admin_client() -> Client {
    dotenvy::dotenv().ok();
    let email = std::env::var("TEST_ADMIN_EMAIL").expect("TEST_ADMIN_EMAIL not set");
    let password = std::env::var("TEST_ADMIN_PASSWORD").expect("TEST_ADMIN_PASSWORD not set");

    let client = client();
    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to log in");
    assert!(
        resp.status().is_redirection(),
        "login rejected with {}",
        resp.status()
    );
    client
}

/// Pool for the database both servers use.
///
/// # Panics
///
/// Panics if no database URL is set or the database is unreachable.
pub async fn pool() -> PgPool {
    dotenvy::dotenv().ok();
    let url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("ADMIN_DATABASE_URL not set");
    tezukuri_admin::db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to database")
}

/// Name unique to one test run, so parallel runs don't collide.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", uuid::Uuid::new_v4().simple())
}
