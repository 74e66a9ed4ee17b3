//! Admin event management.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use uuid::Uuid;

use steeple_core::calendar::{validate_event_input, Event};
use steeple_core::storage::RepositoryError;

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::models::EventForm;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "events_admin.html")]
struct EventListTemplate {
    events: Vec<Event>,
}

/// Handler for the admin event list (GET /events/admin).
pub async fn list(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list_events().await?;
    Ok(HtmlTemplate(EventListTemplate { events }))
}

#[derive(Template)]
#[template(path = "event_form.html")]
struct EventFormTemplate {
    heading: &'static str,
    action: String,
    errors: Vec<String>,
    form: EventForm,
}

/// Handler for the new-event form (GET /events/admin/new).
pub async fn new_form(AdminUser(_admin): AdminUser) -> impl IntoResponse {
    HtmlTemplate(EventFormTemplate {
        heading: "New Event",
        action: "/events/admin".to_string(),
        errors: Vec::new(),
        form: EventForm::default(),
    })
}

/// Handler for event creation (POST /events/admin).
pub async fn create(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let validated = validate_event_input(&form.as_input());
    let cleaned = validated.cleaned;

    let Some(start_date) = cleaned.start_date.filter(|_| validated.errors.is_empty()) else {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            EventFormTemplate {
                heading: "New Event",
                action: "/events/admin".to_string(),
                errors: validated.errors,
                form,
            },
        ));
    };

    let mut event = Event::new(cleaned.title, start_date)
        .with_description(cleaned.description)
        .with_location(cleaned.location)
        .with_recurrence(cleaned.recurrence);
    event.start_time = cleaned.start_time;

    state.events.create_event(&event).await?;
    tracing::info!(event = %event.id, title = %event.title, "Event created");

    Ok(Redirect::to("/events/admin").into_response())
}

/// Handler for the edit form (GET /events/admin/{id}/edit).
pub async fn edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = state
        .events
        .get_event(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Event",
            id: id.to_string(),
        })?;

    Ok(HtmlTemplate(EventFormTemplate {
        heading: "Edit Event",
        action: format!("/events/admin/{id}"),
        errors: Vec::new(),
        form: EventForm::from_event(&event),
    }))
}

/// Handler for event updates (POST /events/admin/{id}).
pub async fn update(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<EventForm>,
) -> Result<Response, AppError> {
    let mut event = state
        .events
        .get_event(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Event",
            id: id.to_string(),
        })?;

    let validated = validate_event_input(&form.as_input());
    let cleaned = validated.cleaned;

    let Some(start_date) = cleaned.start_date.filter(|_| validated.errors.is_empty()) else {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            EventFormTemplate {
                heading: "Edit Event",
                action: format!("/events/admin/{id}"),
                errors: validated.errors,
                form,
            },
        ));
    };

    event.title = cleaned.title;
    event.description = cleaned.description;
    event.location = cleaned.location;
    event.start_date = start_date;
    event.start_time = cleaned.start_time;
    event.recurrence = cleaned.recurrence;
    event.updated_at = Utc::now();

    state.events.update_event(&event).await?;

    Ok(Redirect::to("/events/admin").into_response())
}

/// Handler for event deletion (POST /events/admin/{id}/delete). An invalid
/// or unknown id logs a warning and redirects rather than failing the page.
pub async fn delete(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    match id.parse::<Uuid>() {
        Ok(id) => {
            if let Err(err) = state.events.delete_event(id).await {
                tracing::warn!(event = %id, error = %err, "Event delete skipped");
            }
        }
        Err(_) => {
            tracing::warn!(id = %id, "Event delete requested with invalid id");
        }
    }

    Ok(Redirect::to("/events/admin"))
}
