//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::ContentClient;
use crate::services::{ContactMailer, EmailError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    content: ContentClient,
    mailer: Option<ContactMailer>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `pool` - `PostgreSQL` connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the contact mailer configuration is invalid.
    pub fn new(config: SiteConfig, pool: PgPool) -> Result<Self, EmailError> {
        let content = ContentClient::new(pool.clone(), config.revalidate);
        let mailer = config.contact.as_ref().map(ContactMailer::new).transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                content,
                mailer,
            }),
        })
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the cached content reader.
    #[must_use]
    pub fn content(&self) -> &ContentClient {
        &self.inner.content
    }

    /// Get the contact mailer, if SMTP is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&ContactMailer> {
        self.inner.mailer.as_ref()
    }
}
