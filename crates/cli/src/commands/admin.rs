//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! tz-cli admin create -e owner@tezukurivan.ca -n "Owner" -p "long passphrase"
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use thiserror::Error;

use tezukuri_admin::services::{AdminAuthService, AuthError};
use tezukuri_core::AdminUserId;

use super::{CommandError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin user with an argon2 password hash.
///
/// # Arguments
///
/// * `email` - Admin's email address (login name)
/// * `name` - Admin's display name
/// * `password` - Plain text password, at least 8 characters
///
/// # Returns
///
/// The ID of the created admin user.
///
/// # Errors
///
/// Returns an error if the email or password is invalid, the email is
/// already registered, or the database is unreachable.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<AdminUserId, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", email);
    let user = AdminAuthService::new(&pool)
        .register(email, name, password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );

    Ok(user.id)
}
