//! HTTP middleware and extractors for the admin panel.
//!
//! - [`auth`] - Login gate extractor and session helpers
//! - [`session`] - `PostgreSQL`-backed session layer

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, clear_current_admin, set_current_admin, set_flash, take_flash};
pub use session::create_session_layer;
