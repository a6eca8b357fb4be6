//! Product order manager.
//!
//! The admin rearranges products in a [`ReorderDraft`] kept in their session.
//! Moves only touch the draft. Saving writes every product's positional rank
//! in one concurrent batch. A draft without unsaved moves is not stored, so
//! opening the page after a save (or a reset) starts from the database.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, Redirect},
    routing::{get, post},
};
use serde::Deserialize;
use sqlx::PgPool;
use tower_sessions::Session;
use tracing::instrument;

use tezukuri_core::ProductId;
use tezukuri_core::ordering::{Direction, ReorderDraft, ReorderEntry};

use crate::db::{BatchUpdateError, ProductRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::{Flash, session_keys};
use crate::state::AppState;

use super::{AdminUserView, render};

const ORDER_PATH: &str = "/products/order";

/// Order manager routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(ORDER_PATH, get(index))
        .route("/products/order/move", post(move_step))
        .route("/products/order/drag", post(drag))
        .route("/products/order/reset", post(reset))
        .route("/products/order/save", post(save))
}

/// One row of the order list.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub position: usize,
    pub rank: Option<i32>,
    pub is_first: bool,
    pub is_last: bool,
}

/// Order manager page template.
#[derive(Template)]
#[template(path = "products/order.html")]
pub struct ProductOrderTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub rows: Vec<OrderRowView>,
    pub has_changes: bool,
}

/// Single-step move form.
#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub id: ProductId,
    pub direction: Direction,
}

/// Drag-and-drop form with zero-based positions.
#[derive(Debug, Deserialize)]
pub struct DragForm {
    pub from: usize,
    pub to: usize,
}

fn rows(draft: &ReorderDraft) -> Vec<OrderRowView> {
    let last = draft.len().saturating_sub(1);
    draft
        .entries()
        .iter()
        .enumerate()
        .map(|(position, entry)| OrderRowView {
            id: entry.id.to_string(),
            name: entry.name.clone(),
            image_url: entry.image_url.clone(),
            position,
            rank: entry.display_rank,
            is_first: position == 0,
            is_last: position == last,
        })
        .collect()
}

/// The session draft, or a fresh one built from the database.
async fn load_draft(session: &Session, pool: &PgPool) -> Result<ReorderDraft, AppError> {
    if let Some(draft) = session
        .get::<ReorderDraft>(session_keys::REORDER_DRAFT)
        .await?
    {
        return Ok(draft);
    }

    let products = ProductRepository::new(pool)
        .list_all()
        .await
        .map_err(AppError::Database)?;
    Ok(ReorderDraft::from_items(
        products.iter().map(ReorderEntry::from),
    ))
}

async fn store_draft(session: &Session, draft: &ReorderDraft) -> Result<(), AppError> {
    if draft.has_changes() {
        session.insert(session_keys::REORDER_DRAFT, draft).await?;
    } else {
        session
            .remove::<ReorderDraft>(session_keys::REORDER_DRAFT)
            .await?;
    }
    Ok(())
}

/// Order manager page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let draft = load_draft(&session, state.pool()).await?;

    Ok(render(&ProductOrderTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/products".to_string(),
        flash: take_flash(&session).await,
        rows: rows(&draft),
        has_changes: draft.has_changes(),
    }))
}

/// Move one product a single step.
#[instrument(skip(_admin, state, session))]
pub async fn move_step(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MoveForm>,
) -> Result<Redirect, AppError> {
    let mut draft = load_draft(&session, state.pool()).await?;
    if draft.step(&form.id, form.direction) {
        store_draft(&session, &draft).await?;
    }
    Ok(Redirect::to(ORDER_PATH))
}

/// Drop the product at `from` onto position `to`.
#[instrument(skip(_admin, state, session))]
pub async fn drag(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DragForm>,
) -> Result<Redirect, AppError> {
    let mut draft = load_draft(&session, state.pool()).await?;
    match draft.move_item(form.from, form.to) {
        Ok(()) => store_draft(&session, &draft).await?,
        Err(e) => {
            tracing::warn!(from = form.from, to = form.to, error = %e, "Rejected product drag");
            set_flash(
                &session,
                Flash::Error("The product list changed, please try again".to_string()),
            )
            .await;
        }
    }
    Ok(Redirect::to(ORDER_PATH))
}

/// Discard unsaved moves.
#[instrument(skip(_admin, session))]
pub async fn reset(
    RequireAdminAuth(_admin): RequireAdminAuth,
    session: Session,
) -> Result<Redirect, AppError> {
    session
        .remove::<ReorderDraft>(session_keys::REORDER_DRAFT)
        .await?;
    Ok(Redirect::to(ORDER_PATH))
}

/// Persist the draft order.
///
/// Ranks that were written stay written even when others fail. The draft is
/// kept on failure so the admin can retry, minus any products that were
/// deleted since it was loaded.
#[instrument(skip(_admin, state, session))]
pub async fn save(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let mut draft = load_draft(&session, state.pool()).await?;
    let assignments = draft.assignments();

    match ProductRepository::new(state.pool())
        .save_display_ranks(&assignments)
        .await
    {
        Ok(()) => {
            tracing::info!(count = assignments.len(), "Saved product display order");
            draft.mark_saved();
            store_draft(&session, &draft).await?;
            set_flash(&session, Flash::Success("Display order saved".to_string())).await;
        }
        Err(e) => {
            let message = save_failure_message(&mut draft, &e);
            store_draft(&session, &draft).await?;
            set_flash(&session, Flash::Error(message)).await;
        }
    }

    Ok(Redirect::to(ORDER_PATH))
}

/// Flash text for a partly failed save.
///
/// Products that no longer exist are dropped from the draft so the next save
/// can succeed.
fn save_failure_message(draft: &mut ReorderDraft, err: &BatchUpdateError) -> String {
    let removed = draft.remove_products(&err.missing);
    if removed == 0 {
        return format!("Some ranks were not saved: {err}");
    }
    if removed == err.failed.len() {
        format!("{removed} deleted product(s) were removed from the list. Review the order and save again.")
    } else {
        format!(
            "{removed} deleted product(s) were removed from the list and some ranks were not saved: {err}"
        )
    }
}
