//! Domain models for the admin panel.
//!
//! Content records (products, events, sections) live in `tezukuri-core`;
//! this module only holds what is specific to admin authentication.

pub mod admin_user;
pub mod session;

pub use admin_user::AdminUser;
pub use session::{CurrentAdmin, Flash, keys as session_keys};
