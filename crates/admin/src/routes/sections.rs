//! Home and about page section editors.
//!
//! Each section is its own form. Structural edits (adding or removing value
//! cards, reordering or removing slider images) re-render the form with the
//! change applied. Nothing is written until the section is saved.

use askama::Template;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::instrument;

use tezukuri_core::rich_text::normalize_document;
use tezukuri_core::{ContentSection, SectionKey, SectionPage, SectionUpdate, ValueItem};

use crate::db::SectionRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::{CurrentAdmin, Flash};
use crate::state::AppState;

use super::form::{MultipartForm, store_upload};
use super::{AdminUserView, render};

const IMAGE_FOLDER: &str = "sections";

/// Section editor routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sections/{page}", get(edit_page))
        .route("/sections/{page}/{key}", post(submit))
}

/// Button pressed to submit a section form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionAction {
    Save,
    AddValue,
    RemoveValue(usize),
    SlideUp(usize),
    SlideDown(usize),
    SlideRemove(usize),
}

impl SectionAction {
    /// Parse a button value such as `save` or `slide_up:2`.
    ///
    /// A form submitted without a button (enter key) saves.
    ///
    /// # Errors
    ///
    /// Returns a message naming the unknown action.
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        let (name, index) = match value.split_once(':') {
            Some((name, index)) => {
                let index = index
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid action: {value}"))?;
                (name, Some(index))
            }
            None => (value, None),
        };

        match (name, index) {
            ("" | "save", None) => Ok(Self::Save),
            ("add_value", None) => Ok(Self::AddValue),
            ("remove_value", Some(i)) => Ok(Self::RemoveValue(i)),
            ("slide_up", Some(i)) => Ok(Self::SlideUp(i)),
            ("slide_down", Some(i)) => Ok(Self::SlideDown(i)),
            ("slide_remove", Some(i)) => Ok(Self::SlideRemove(i)),
            _ => Err(format!("Invalid action: {value}")),
        }
    }
}

/// One section form.
///
/// The `shows_*` flags decide which inputs the template draws.
#[derive(Debug, Clone)]
pub struct SectionFormView {
    pub key: String,
    pub label: String,
    pub plain_text: bool,
    pub shows_subtitle: bool,
    pub shows_image: bool,
    pub shows_slider: bool,
    pub shows_values: bool,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub image_url: String,
    pub image_urls: Vec<String>,
    pub value_items: Vec<ValueItem>,
    pub error: Option<String>,
}

impl SectionFormView {
    /// Empty form for a section that has no row yet.
    #[must_use]
    pub fn blank(page: SectionPage, key: SectionKey) -> Self {
        Self {
            key: key.as_str().to_string(),
            label: key.label().to_string(),
            plain_text: key.is_plain_text(),
            shows_subtitle: matches!(key, SectionKey::Hero | SectionKey::Intro),
            shows_image: matches!(
                (page, key),
                (SectionPage::About, SectionKey::Hero) | (_, SectionKey::Intro | SectionKey::AboutPreview)
            ),
            shows_slider: matches!((page, key), (SectionPage::Home, SectionKey::Hero)),
            shows_values: key == SectionKey::Values,
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            image_url: String::new(),
            image_urls: Vec::new(),
            value_items: Vec::new(),
            error: None,
        }
    }

    /// Form filled from a stored section.
    #[must_use]
    pub fn from_section(page: SectionPage, section: &ContentSection) -> Self {
        Self {
            title: section.title.clone(),
            subtitle: section.subtitle.clone().unwrap_or_default(),
            content: section.content_or_empty().to_string(),
            image_url: section.image_url.clone().unwrap_or_default(),
            image_urls: section.image_urls.clone(),
            value_items: section.value_items.clone(),
            ..Self::blank(page, section.key)
        }
    }

    /// Form filled from submitted values.
    #[must_use]
    pub fn from_multipart(page: SectionPage, key: SectionKey, form: &MultipartForm) -> Self {
        let image_url = if form.checked("remove_image") {
            String::new()
        } else {
            form.text("image_url").trim().to_owned()
        };
        let value_items = form
            .all("value_title")
            .iter()
            .zip(form.all("value_description"))
            .map(|(title, description)| ValueItem {
                title: title.trim().to_owned(),
                description: description.trim().to_owned(),
            })
            .collect();

        Self {
            title: form.text("title").trim().to_owned(),
            subtitle: form.text("subtitle").trim().to_owned(),
            content: form.text("content").to_owned(),
            image_url,
            image_urls: form
                .all("image_urls")
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned()
                .collect(),
            value_items,
            ..Self::blank(page, key)
        }
    }

    /// Apply a structural edit. Out-of-range indexes change nothing.
    pub fn apply(&mut self, action: SectionAction) {
        match action {
            SectionAction::Save => {}
            SectionAction::AddValue => self.value_items.push(ValueItem::default()),
            SectionAction::RemoveValue(i) => {
                if i < self.value_items.len() {
                    self.value_items.remove(i);
                }
            }
            SectionAction::SlideUp(i) => {
                if i > 0 && i < self.image_urls.len() {
                    self.image_urls.swap(i, i - 1);
                }
            }
            SectionAction::SlideDown(i) => {
                if i + 1 < self.image_urls.len() {
                    self.image_urls.swap(i, i + 1);
                }
            }
            SectionAction::SlideRemove(i) => {
                if i < self.image_urls.len() {
                    self.image_urls.remove(i);
                }
            }
        }
    }

    /// Validate into an update. Fields this form does not show are cleared.
    ///
    /// # Errors
    ///
    /// Returns the message to show above the form.
    pub fn to_update(&self) -> Result<SectionUpdate, String> {
        if self.title.is_empty() {
            return Err("Title is required".to_string());
        }

        let content = if self.plain_text {
            self.content.trim().to_owned()
        } else {
            normalize_document(self.content.trim())
        };

        Ok(SectionUpdate {
            title: self.title.clone(),
            subtitle: non_empty(self.shows_subtitle, &self.subtitle),
            content: non_empty(true, &content),
            image_url: non_empty(self.shows_image, &self.image_url),
            image_urls: if self.shows_slider {
                self.image_urls.clone()
            } else {
                Vec::new()
            },
            value_items: if self.shows_values {
                self.value_items.clone()
            } else {
                Vec::new()
            },
        })
    }
}

fn non_empty(shown: bool, value: &str) -> Option<String> {
    (shown && !value.is_empty()).then(|| value.to_owned())
}

/// Section editor page template.
#[derive(Template)]
#[template(path = "sections/edit.html")]
pub struct SectionsEditTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub page: String,
    pub page_title: String,
    pub sections: Vec<SectionFormView>,
}

fn page_title(page: SectionPage) -> &'static str {
    match page {
        SectionPage::Home => "Home page",
        SectionPage::About => "About page",
    }
}

/// Render every section of `page`, substituting `pending` for its stored form.
async fn page_response(
    state: &AppState,
    session: &Session,
    admin: &CurrentAdmin,
    page: SectionPage,
    pending: Option<SectionFormView>,
) -> Result<Html<String>, AppError> {
    let stored = SectionRepository::new(state.pool())
        .list_for_page(page)
        .await
        .map_err(AppError::Database)?;

    let sections = page
        .keys()
        .iter()
        .map(|&key| match &pending {
            Some(view) if view.key == key.as_str() => view.clone(),
            _ => stored.get(key).map_or_else(
                || SectionFormView::blank(page, key),
                |section| SectionFormView::from_section(page, section),
            ),
        })
        .collect();

    Ok(render(&SectionsEditTemplate {
        admin_user: AdminUserView::from(admin),
        current_path: format!("/sections/{page}"),
        flash: take_flash(session).await,
        page: page.to_string(),
        page_title: page_title(page).to_string(),
        sections,
    }))
}

/// Section editor page handler.
#[instrument(skip(admin, state, session))]
pub async fn edit_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(page): Path<SectionPage>,
) -> Result<Html<String>, AppError> {
    page_response(&state, &session, &admin, page, None).await
}

/// Section form submission handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn submit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path((page, key)): Path<(SectionPage, SectionKey)>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    if !page.contains(key) {
        return Err(AppError::NotFound(format!("section {key} on the {page} page")));
    }

    let form = MultipartForm::read(multipart).await?;
    let action = SectionAction::parse(form.text("action")).map_err(AppError::BadRequest)?;
    let mut view = SectionFormView::from_multipart(page, key, &form);

    if action != SectionAction::Save {
        view.apply(action);
        return Ok(page_response(&state, &session, &admin, page, Some(view))
            .await?
            .into_response());
    }

    if let Err(error) = store_section_uploads(&state, &form, &mut view).await {
        view.error = Some(error);
        return Ok(page_response(&state, &session, &admin, page, Some(view))
            .await?
            .into_response());
    }

    let update = match view.to_update() {
        Ok(update) => update,
        Err(error) => {
            view.error = Some(error);
            return Ok(page_response(&state, &session, &admin, page, Some(view))
                .await?
                .into_response());
        }
    };

    match SectionRepository::new(state.pool())
        .save(page, key, &update)
        .await
    {
        Ok(_) => {
            tracing::info!(page = %page, key = %key, "Section saved");
            set_flash(&session, Flash::Success(format!("Saved {}", key.label()))).await;
            Ok(Redirect::to(&format!("/sections/{page}#{key}")).into_response())
        }
        Err(e) => {
            tracing::error!(page = %page, key = %key, error = %e, "Failed to save section");
            view.error = Some("Failed to save section".to_string());
            Ok(page_response(&state, &session, &admin, page, Some(view))
                .await?
                .into_response())
        }
    }
}

/// Store the side image and any new slider images, updating `view` with their URLs.
async fn store_section_uploads(
    state: &AppState,
    form: &MultipartForm,
    view: &mut SectionFormView,
) -> Result<(), String> {
    if view.shows_image
        && let Some(file) = form.file("image")
    {
        view.image_url = store_upload(state.media(), IMAGE_FOLDER, file).await?;
    }

    if view.shows_slider {
        for file in form.files("slides") {
            let url = store_upload(state.media(), IMAGE_FOLDER, file).await?;
            view.image_urls.push(url);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!(SectionAction::parse("").unwrap(), SectionAction::Save);
        assert_eq!(SectionAction::parse("save").unwrap(), SectionAction::Save);
        assert_eq!(SectionAction::parse("add_value").unwrap(), SectionAction::AddValue);
        assert_eq!(
            SectionAction::parse("slide_down:2").unwrap(),
            SectionAction::SlideDown(2)
        );
        assert_eq!(
            SectionAction::parse("remove_value:0").unwrap(),
            SectionAction::RemoveValue(0)
        );
        assert!(SectionAction::parse("slide_up").is_err());
        assert!(SectionAction::parse("save:1").is_err());
        assert!(SectionAction::parse("publish").is_err());
    }

    #[test]
    fn test_visibility_per_page() {
        let home_hero = SectionFormView::blank(SectionPage::Home, SectionKey::Hero);
        assert!(home_hero.shows_slider && home_hero.shows_subtitle && !home_hero.shows_image);
        assert!(home_hero.plain_text);

        let about_hero = SectionFormView::blank(SectionPage::About, SectionKey::Hero);
        assert!(about_hero.shows_image && !about_hero.shows_slider);

        let intro = SectionFormView::blank(SectionPage::About, SectionKey::Intro);
        assert!(intro.shows_image && !intro.plain_text);

        let values = SectionFormView::blank(SectionPage::Home, SectionKey::Values);
        assert!(values.shows_values && !values.shows_image);
    }

    fn slider() -> SectionFormView {
        let mut view = SectionFormView::blank(SectionPage::Home, SectionKey::Hero);
        view.title = "Handmade in a van".to_string();
        view.image_urls = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        view
    }

    #[test]
    fn test_slider_edits() {
        let mut view = slider();
        view.apply(SectionAction::SlideUp(2));
        assert_eq!(view.image_urls, vec!["a", "c", "b"]);
        view.apply(SectionAction::SlideDown(0));
        assert_eq!(view.image_urls, vec!["c", "a", "b"]);
        view.apply(SectionAction::SlideRemove(1));
        assert_eq!(view.image_urls, vec!["c", "b"]);
        view.apply(SectionAction::SlideUp(0));
        view.apply(SectionAction::SlideDown(1));
        view.apply(SectionAction::SlideRemove(5));
        assert_eq!(view.image_urls, vec!["c", "b"]);
    }

    #[test]
    fn test_value_cards_from_form() {
        let mut form = MultipartForm::default();
        form.push_text("title", "What we value");
        form.push_text("value_title", "Craft");
        form.push_text("value_description", "Every piece sewn by hand");
        form.push_text("value_title", "");
        form.push_text("value_description", " ");

        let mut view = SectionFormView::from_multipart(SectionPage::About, SectionKey::Values, &form);
        assert_eq!(view.value_items.len(), 2);
        view.apply(SectionAction::AddValue);
        assert_eq!(view.value_items.len(), 3);
        view.apply(SectionAction::RemoveValue(0));
        assert_eq!(view.value_items[0], ValueItem::default());

        let update = view.to_update().unwrap();
        assert_eq!(update.value_items.len(), 2);
        assert!(update.cleaned_value_items().is_empty());
        assert_eq!(update.image_url, None);
    }

    #[test]
    fn test_update_clears_hidden_fields() {
        let mut view = slider();
        view.image_url = "/media/sections/1-side.jpg".to_string();
        view.content = "  Come find us  ".to_string();
        let update = view.to_update().unwrap();
        assert_eq!(update.image_url, None);
        assert_eq!(update.image_urls.len(), 3);
        assert_eq!(update.content.as_deref(), Some("Come find us"));
    }

    #[test]
    fn test_title_required() {
        let view = SectionFormView::blank(SectionPage::Home, SectionKey::ContactCta);
        assert_eq!(view.to_update().unwrap_err(), "Title is required");
    }
}
