//! Tezukuri Van public site library.
//!
//! This crate provides the site functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod filters;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::time::Duration;

    use chrono::Utc;
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use tezukuri_core::{BRAND, ContentSection, Price, Product, ProductId, SectionId, SectionKey};

    use crate::config::SiteConfig;
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
        let config = SiteConfig {
            database_url: SecretString::from("postgres://tezukuri@127.0.0.1:1/unreachable"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            revalidate: Duration::from_secs(10),
            media_dir: PathBuf::from("media"),
            contact: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        AppState::new(config, lazy_pool()).unwrap()
    }

    pub fn product(id: &str, rank: Option<i32>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            brand: BRAND.to_string(),
            category: "bags".to_string(),
            description: String::new(),
            price: Price::new(Decimal::new(2500, 2)),
            image_url: format!("/media/products/{id}.jpg"),
            gallery_images: Vec::new(),
            in_stock: true,
            display_rank: rank,
            tags: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn section(key: SectionKey, title: &str) -> ContentSection {
        ContentSection {
            id: SectionId::new(format!("section-{key}")),
            key,
            title: title.to_string(),
            subtitle: None,
            content: None,
            image_url: None,
            image_urls: Vec::new(),
            value_items: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}
