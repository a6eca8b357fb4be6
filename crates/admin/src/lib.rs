//! Tezukuri Van admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Security
//!
//! Every page except the login form requires an authenticated admin
//! session. The panel writes directly to the content store and the media
//! directory shared with the public site.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Duration;

    use secrecy::SecretString;
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;

    use crate::config::{AdminConfig, MediaConfig};
    use crate::state::AppState;

    /// Pool that never connects; every query fails fast.
    #[allow(clippy::unwrap_used)]
    pub fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://tezukuri@127.0.0.1:1/unreachable")
            .unwrap()
    }

    #[allow(clippy::unwrap_used)]
    pub fn test_state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://tezukuri@127.0.0.1:1/unreachable"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            media: MediaConfig {
                dir: std::env::temp_dir().join("tezukuri-admin-test-media"),
                base_url: "/media".to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        AppState::new(config, lazy_pool())
    }
}
