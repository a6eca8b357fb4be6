//! Dashboard route handler.

use askama::Template;
use axum::{extract::State, response::Html};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::{EventRepository, ProductRepository};
use crate::filters;
use crate::middleware::{RequireAdminAuth, take_flash};
use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

use super::render;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
        }
    }
}

/// Dashboard counts; `None` when the count could not be loaded.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub products: Option<usize>,
    pub unranked_products: Option<usize>,
    pub events: Option<usize>,
}

impl DashboardMetrics {
    /// Products with no display rank, zero when unknown.
    #[must_use]
    pub fn unranked_count(&self) -> usize {
        self.unranked_products.unwrap_or_default()
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub metrics: DashboardMetrics,
}

/// Dashboard page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let products = ProductRepository::new(state.pool());
    let events = EventRepository::new(state.pool());
    let (products_result, events_result) =
        tokio::join!(products.list_all(), events.list_newest_first());

    let mut metrics = DashboardMetrics::default();
    match products_result {
        Ok(products) => {
            metrics.products = Some(products.len());
            metrics.unranked_products =
                Some(products.iter().filter(|p| p.display_rank.is_none()).count());
        }
        Err(e) => tracing::error!("Failed to fetch products: {e}"),
    }
    match events_result {
        Ok(events) => metrics.events = Some(events.len()),
        Err(e) => tracing::error!("Failed to fetch events: {e}"),
    }

    render(&DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/".to_string(),
        flash: take_flash(&session).await,
        metrics,
    })
}
