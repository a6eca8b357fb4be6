//! Event management route handlers.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use tezukuri_core::models::event::FORM_DATETIME_FORMAT;
use tezukuri_core::rich_text::normalize_document;
use tezukuri_core::{Event, EventDraft, EventId};

use crate::db::EventRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdminAuth, set_flash, take_flash};
use crate::models::Flash;
use crate::state::AppState;

use super::form::{MultipartForm, store_upload};
use super::{AdminUserView, render};

const IMAGE_FOLDER: &str = "events";

/// Event row for the listing.
#[derive(Debug, Clone)]
pub struct EventRowView {
    pub id: String,
    pub title: String,
    pub date_label: String,
    pub time_label: String,
    pub image_url: Option<String>,
}

impl From<&Event> for EventRowView {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            date_label: event.date_label(),
            time_label: event.time_label(),
            image_url: event.image_url.clone(),
        }
    }
}

/// Raw event form values.
///
/// Dates hold `datetime-local` strings.
#[derive(Debug, Clone, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub image_url: String,
}

impl From<&EventDraft> for EventForm {
    fn from(draft: &EventDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            start_date: draft.start_date.format(FORM_DATETIME_FORMAT).to_string(),
            end_date: draft.end_date.format(FORM_DATETIME_FORMAT).to_string(),
            image_url: draft.image_url.clone().unwrap_or_default(),
        }
    }
}

impl EventForm {
    /// Read the text fields of a submitted form.
    #[must_use]
    pub fn from_multipart(form: &MultipartForm) -> Self {
        let image_url = if form.checked("remove_image") {
            String::new()
        } else {
            form.text("image_url").trim().to_owned()
        };

        Self {
            title: form.text("title").trim().to_owned(),
            description: form.text("description").to_owned(),
            start_date: form.text("start_date").trim().to_owned(),
            end_date: form.text("end_date").trim().to_owned(),
            image_url,
        }
    }

    /// Validate into a draft with a normalized description.
    ///
    /// # Errors
    ///
    /// Returns the message to show above the form.
    pub fn to_draft(&self) -> Result<EventDraft, String> {
        if self.title.is_empty() {
            return Err("Title is required".to_string());
        }
        let start_date = EventDraft::parse_form_datetime(&self.start_date)
            .map_err(|_| "Start date is required".to_string())?;
        let end_date = EventDraft::parse_form_datetime(&self.end_date)
            .map_err(|_| "End date is required".to_string())?;
        if end_date < start_date {
            return Err("End date must be after start date".to_string());
        }

        Ok(EventDraft {
            title: self.title.clone(),
            description: normalize_document(&self.description),
            image_url: (!self.image_url.is_empty()).then(|| self.image_url.clone()),
            start_date,
            end_date,
        })
    }
}

/// Events list page template.
#[derive(Template)]
#[template(path = "events/index.html")]
pub struct EventsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    pub events: Vec<EventRowView>,
    pub error: Option<String>,
}

/// Event create/edit form template.
#[derive(Template)]
#[template(path = "events/form.html")]
pub struct EventFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub flash: Option<Flash>,
    /// `None` when creating.
    pub event_id: Option<String>,
    pub form: EventForm,
    pub error: Option<String>,
}

impl EventFormTemplate {
    fn action(&self) -> String {
        self.event_id
            .as_ref()
            .map_or_else(|| "/events".to_string(), |id| format!("/events/{id}"))
    }
}

fn form_page(
    admin: AdminUserView,
    event_id: Option<&EventId>,
    form: EventForm,
    error: Option<String>,
) -> Html<String> {
    render(&EventFormTemplate {
        admin_user: admin,
        current_path: "/events".to_string(),
        flash: None,
        event_id: event_id.map(ToString::to_string),
        form,
        error,
    })
}

async fn build_draft(state: &AppState, form: &MultipartForm) -> Result<EventDraft, (EventForm, String)> {
    let mut values = EventForm::from_multipart(form);
    let mut draft = values.to_draft().map_err(|e| (values.clone(), e))?;

    if let Some(file) = form.file("image") {
        let url = store_upload(state.media(), IMAGE_FOLDER, file)
            .await
            .map_err(|e| (values.clone(), e))?;
        values.image_url.clone_from(&url);
        draft.image_url = Some(url);
    }

    Ok(draft)
}

/// Events list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let (events, error) = match EventRepository::new(state.pool()).list_newest_first().await {
        Ok(events) => (events.iter().map(EventRowView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch events: {e}");
            (Vec::new(), Some("Error loading events".to_string()))
        }
    };

    render(&EventsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/events".to_string(),
        flash: take_flash(&session).await,
        events,
        error,
    })
}

/// New event form handler.
#[instrument(skip(admin))]
pub async fn new_event(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    form_page(AdminUserView::from(&admin), None, EventForm::default(), None)
}

/// Create event handler.
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

    match EventRepository::new(state.pool()).create(&draft).await {
        Ok(event) => {
            tracing::info!(event_id = %event.id, title = %event.title, "Event created");
            set_flash(&session, Flash::Success(format!("Created {}", event.title))).await;
            Ok(Redirect::to("/events").into_response())
        }
        Err(e) => {
            tracing::error!(title = %draft.title, error = %e, "Failed to create event");
            Ok(form_page(
                AdminUserView::from(&admin),
                None,
                EventForm::from(&draft),
                Some("Failed to save event".to_string()),
            )
            .into_response())
        }
    }
}

/// Edit event form handler.
#[instrument(skip(admin, state))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<EventId>,
) -> Result<Html<String>, AppError> {
    let event = EventRepository::new(state.pool())
        .get_by_id(&id)
        .await
        .map_err(|e| AppError::from_repository(e, "event"))?;

    Ok(form_page(
        AdminUserView::from(&admin),
        Some(&id),
        EventForm::from(&EventDraft::from_event(&event)),
        None,
    ))
}

/// Update event handler.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<EventId>,
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

    match EventRepository::new(state.pool()).update(&id, &draft).await {
        Ok(event) => {
            tracing::info!(event_id = %id, "Event updated");
            set_flash(&session, Flash::Success(format!("Saved {}", event.title))).await;
            Ok(Redirect::to("/events").into_response())
        }
        Err(e) => {
            tracing::error!(event_id = %id, error = %e, "Failed to update event");
            Ok(form_page(
                AdminUserView::from(&admin),
                Some(&id),
                EventForm::from(&draft),
                Some("Failed to save event".to_string()),
            )
            .into_response())
        }
    }
}

/// Delete event handler.
#[instrument(skip(_admin, state, session))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<EventId>,
) -> Result<Redirect, AppError> {
    EventRepository::new(state.pool())
        .delete(&id)
        .await
        .map_err(|e| AppError::from_repository(e, "event"))?;

    tracing::info!(event_id = %id, "Event deleted");
    set_flash(&session, Flash::Success("Event deleted".to_string())).await;
    Ok(Redirect::to("/events"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn values(start: &str, end: &str) -> EventForm {
        EventForm {
            title: "Winter Market".to_string(),
            description: "<p>Indoor</p>".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let err = values("2025-11-16T10:00", "2025-11-15T17:00")
            .to_draft()
            .unwrap_err();
        assert_eq!(err, "End date must be after start date");
    }

    #[test]
    fn test_same_day_event_is_valid() {
        let draft = values("2025-11-15T10:00", "2025-11-15T17:00")
            .to_draft()
            .unwrap();
        assert_eq!(draft.image_url, None);
        assert_eq!(EventForm::from(&draft).end_date, "2025-11-15T17:00");
    }

    #[test]
    fn test_missing_dates_are_reported() {
        assert_eq!(
            values("", "2025-11-15T17:00").to_draft().unwrap_err(),
            "Start date is required"
        );
        assert_eq!(
            values("2025-11-15T10:00", "soon").to_draft().unwrap_err(),
            "End date is required"
        );
    }

    #[test]
    fn test_remove_image_clears_url() {
        let mut form = MultipartForm::default();
        form.push_text("title", "Market");
        form.push_text("image_url", "/media/events/1-poster.jpg");
        form.push_text("remove_image", "on");
        assert_eq!(EventForm::from_multipart(&form).image_url, "");
    }
}
