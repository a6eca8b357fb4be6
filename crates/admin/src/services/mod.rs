//! Business logic services for the admin panel.
//!
//! # Services
//!
//! - `auth` - Email and password login with Argon2id hashes
//! - `media` - Uploaded image storage

pub mod auth;
pub mod media;

pub use auth::{AdminAuthService, AuthError};
pub use media::{FsMediaStore, MediaError, MediaStore};
