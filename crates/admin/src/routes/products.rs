//! Product management route handlers.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use tezukuri_core::ordering::sort_for_display;
use tezukuri_core::{Price, Product, ProductDraft, ProductId};

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

use super::form::{MultipartForm, store_upload};
use super::{AdminUserView, render};

const MAIN_IMAGE_FOLDER: &str = "products";
const GALLERY_FOLDER: &str = "products/gallery";

/// Product row for the listing.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
    pub in_stock: bool,
    pub display_rank: Option<i32>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            image_url: product.image_url.clone(),
            in_stock: product.in_stock,
            display_rank: product.display_rank,
        }
    }
}

/// Raw product form values, kept as typed so a failed save can show them again.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub display_rank: String,
    pub in_stock: bool,
    pub tags: String,
    pub image_url: String,
    pub gallery_images: Vec<String>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: String::new(),
            description: String::new(),
            price: String::new(),
            display_rank: String::new(),
            in_stock: true,
            tags: String::new(),
            image_url: String::new(),
            gallery_images: Vec::new(),
        }
    }
}

impl From<&ProductDraft> for ProductForm {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.clone(),
            description: draft.description.clone(),
            price: draft.price.plain(),
            display_rank: draft.display_rank.map(|r| r.to_string()).unwrap_or_default(),
            in_stock: draft.in_stock,
            tags: draft.tags_field(),
            image_url: draft.image_url.clone(),
            gallery_images: draft.gallery_images.clone(),
        }
    }
}

impl ProductForm {
    /// Read the text fields of a submitted form.
    ///
    /// Gallery images ticked for removal are dropped here.
    #[must_use]
    pub fn from_multipart(form: &MultipartForm) -> Self {
        let removed = form.all("remove_gallery");
        Self {
            name: form.text("name").trim().to_owned(),
            category: form.text("category").trim().to_owned(),
            description: form.text("description").to_owned(),
            price: form.text("price").trim().to_owned(),
            display_rank: form.text("display_rank").trim().to_owned(),
            in_stock: form.checked("in_stock"),
            tags: form.text("tags").to_owned(),
            image_url: form.text("image_url").trim().to_owned(),
            gallery_images: form
                .all("gallery_images")
                .iter()
                .filter(|url| !url.trim().is_empty() && !removed.contains(url))
                .cloned()
                .collect(),
        }
    }

    /// Validate into a draft.
    ///
    /// # Errors
    ///
    /// Returns the message to show above the form.
    pub fn to_draft(&self) -> Result<ProductDraft, String> {
        if self.name.is_empty() {
            return Err("Name is required".to_string());
        }
        let price = Price::parse(&self.price).map_err(|e| format!("Invalid price: {e}"))?;
        let display_rank = if self.display_rank.is_empty() {
            None
        } else {
            Some(
                self.display_rank
                    .parse::<i32>()
                    .map_err(|_| "Display rank must be a whole number".to_string())?,
            )
        };

        Ok(ProductDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            price,
            image_url: self.image_url.clone(),
            gallery_images: self.gallery_images.clone(),
            in_stock: self.in_stock,
            display_rank,
            tags: ProductDraft::parse_tags(&self.tags),
        })
    }
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub products: Vec<ProductRowView>,
    pub error: Option<String>,
}

/// Product create/edit form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    /// `None` when creating.
    pub product_id: Option<String>,
    pub form: ProductForm,
    pub error: Option<String>,
}

impl ProductFormTemplate {
    fn action(&self) -> String {
        self.product_id
            .as_ref()
            .map_or_else(|| "/products".to_string(), |id| format!("/products/{id}"))
    }
}

fn form_page(
    admin: AdminUserView,
    product_id: Option<&ProductId>,
    form: ProductForm,
    error: Option<String>,
) -> Html<String> {
    render(&ProductFormTemplate {
        admin_user: admin,
        current_path: "/products".to_string(),
        flash: None,
        product_id: product_id.map(ToString::to_string),
        form,
        error,
    })
}

/// Validate the form and store any new images.
async fn build_draft(state: &AppState, form: &MultipartForm) -> Result<ProductDraft, (ProductForm, String)> {
    let mut values = ProductForm::from_multipart(form);
    let mut draft = values.to_draft().map_err(|e| (values.clone(), e))?;

    if let Some(file) = form.file("image") {
        let url = store_upload(state.media(), MAIN_IMAGE_FOLDER, file)
            .await
            .map_err(|e| (values.clone(), e))?;
        values.image_url.clone_from(&url);
        draft.image_url = url;
    }

    for file in form.files("gallery") {
        let url = store_upload(state.media(), GALLERY_FOLDER, file)
            .await
            .map_err(|e| (values.clone(), e))?;
        values.gallery_images.push(url.clone());
        draft.gallery_images.push(url);
    }

    Ok(draft)
}

/// Products list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (products, error) = match ProductRepository::new(state.pool()).list_all().await {
        Ok(mut products) => {
            sort_for_display(&mut products);
            (products.iter().map(ProductRowView::from).collect(), None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), Some("Error loading products".to_string()))
        }
    };

    render(&ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/products".to_string(),
        flash: take_flash(&session).await,
        products,
        error,
    })
}

/// New product form handler.
#[instrument(skip(admin))]
pub async fn new_product(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    form_page(AdminUserView::from(&admin), None, ProductForm::default(), None)
}

/// Create product handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let draft = match build_draft(&state, &form).await {
        Ok(draft) => draft,
        Err((values, error)) => {
            return Ok(form_page(AdminUserView::from(&admin), None, values, Some(error)).into_response());
        }
    };

    match ProductRepository::new(state.pool()).create(&draft).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, name = %product.name, "Product created");
            set_flash(&session, Flash::Success(format!("Created {}", product.name))).await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::error!(name = %draft.name, error = %e, "Failed to create product");
            Ok(form_page(
                AdminUserView::from(&admin),
                None,
                ProductForm::from(&draft),
                Some("Failed to save product".to_string()),
            )
            .into_response())
        }
    }
}

/// Edit product form handler.
#[instrument(skip(admin, state))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Html<String>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(&id)
        .await
        .map_err(|e| AppError::from_repository(e, "product"))?;

    Ok(form_page(
        AdminUserView::from(&admin),
        Some(&id),
        ProductForm::from(&ProductDraft::from_product(&product)),
        None,
    ))
}

/// Update product handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let draft = match build_draft(&state, &form).await {
        Ok(draft) => draft,
        Err((values, error)) => {
            return Ok(
                form_page(AdminUserView::from(&admin), Some(&id), values, Some(error))
                    .into_response(),
            );
        }
    };

    match ProductRepository::new(state.pool()).update(&id, &draft).await {
        Ok(product) => {
            tracing::info!(product_id = %id, "Product updated");
            set_flash(&session, Flash::Success(format!("Saved {}", product.name))).await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(e) => {
            tracing::error!(product_id = %id, error = %e, "Failed to update product");
            Ok(form_page(
                AdminUserView::from(&admin),
                Some(&id),
                ProductForm::from(&draft),
                Some("Failed to save product".to_string()),
            )
            .into_response())
        }
    }
}

/// Delete product handler.
#[instrument(skip(_admin, state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    ProductRepository::new(state.pool())
        .delete(&id)
        .await
        .map_err(|e| AppError::from_repository(e, "product"))?;

    tracing::info!(product_id = %id, "Product deleted");
    set_flash(&session, Flash::Success("Product deleted".to_string())).await;
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn submitted() -> MultipartForm {
        let mut form = MultipartForm::default();
        form.push_text("name", " Canvas tote ");
        form.push_text("price", "$45");
        form.push_text("display_rank", "");
        form.push_text("tags", "canvas, bags");
        form.push_text("gallery_images", "/media/products/gallery/1-a.jpg");
        form.push_text("gallery_images", "/media/products/gallery/2-b.jpg");
        form.push_text("remove_gallery", "/media/products/gallery/1-a.jpg");
        form
    }

    #[test]
    fn test_form_without_rank_stays_unranked() {
        let draft = ProductForm::from_multipart(&submitted()).to_draft().unwrap();
        assert_eq!(draft.name, "Canvas tote");
        assert_eq!(draft.display_rank, None);
        assert_eq!(draft.price.plain(), "45.00");
        assert_eq!(draft.tags, vec!["canvas".to_string(), "bags".to_string()]);
        assert!(!draft.in_stock);
    }

    #[test]
    fn test_removed_gallery_images_are_dropped() {
        let values = ProductForm::from_multipart(&submitted());
        assert_eq!(values.gallery_images, vec!["/media/products/gallery/2-b.jpg".to_string()]);
    }

    #[test]
    fn test_zero_rank_is_kept() {
        let mut form = MultipartForm::default();
        form.push_text("name", "Tote");
        form.push_text("price", "1");
        form.push_text("display_rank", "0");
        let draft = ProductForm::from_multipart(&form).to_draft().unwrap();
        assert_eq!(draft.display_rank, Some(0));
    }

    #[test]
    fn test_validation_messages() {
        let mut values = ProductForm::from_multipart(&submitted());
        values.price = "abc".to_string();
        assert_eq!(values.to_draft().unwrap_err(), "Invalid price: price must be a number");

        values.price = "1".to_string();
        values.display_rank = "first".to_string();
        assert_eq!(values.to_draft().unwrap_err(), "Display rank must be a whole number");

        values.name = String::new();
        assert_eq!(values.to_draft().unwrap_err(), "Name is required");
    }
}
