//! Admin user domain types.

use chrono::{DateTime, Utc};

use tezukuri_core::{AdminUserId, Email};

/// An admin user (domain type).
///
/// The password hash is deliberately not part of this type.
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}
