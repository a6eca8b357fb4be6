//! Product catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use tezukuri_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<Product>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Product,
}

impl ProductShowTemplate {
    /// Main image followed by the gallery.
    #[must_use]
    pub fn slides(&self) -> Vec<&str> {
        self.product.slideshow()
    }
}

/// Display product listing page.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let products = state
        .content()
        .products()
        .await
        .map_err(|e| AppError::load("Error loading products", e))?;

    Ok(ProductsIndexTemplate { products })
}

/// Display product detail page.
///
/// GET /products/{id}
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .content()
        .product(&ProductId::new(id))
        .await
        .map_err(|e| AppError::load("Error loading product", e))?;

    Ok(ProductShowTemplate { product })
}
