//! Callings (volunteer assignments).

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use uuid::Uuid;

use steeple_core::directory::{validate_calling_input, Calling, Member};
use steeple_core::storage::{MemberQuery, MemberSort, RepositoryError};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::models::CallingForm;
use crate::state::AppState;

/// One row of the callings table with its holder's name resolved.
struct CallingRow {
    calling: Calling,
    member_name: String,
}

#[derive(Template)]
#[template(path = "callings.html")]
struct CallingListTemplate {
    rows: Vec<CallingRow>,
}

/// Handler for the callings list (GET /callings).
pub async fn list(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let callings = state.callings.list_callings().await?;

    let ids: Vec<Uuid> = callings.iter().filter_map(|c| c.member_id).collect();
    let names: HashMap<Uuid, String> = state
        .members
        .get_members(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.full_name()))
        .collect();

    let rows = callings
        .into_iter()
        .map(|calling| {
            let member_name = calling
                .member_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| "—".to_string());
            CallingRow {
                calling,
                member_name,
            }
        })
        .collect();

    Ok(HtmlTemplate(CallingListTemplate { rows }))
}

#[derive(Template)]
#[template(path = "calling_form.html")]
struct CallingFormTemplate {
    heading: &'static str,
    action: String,
    errors: Vec<String>,
    form: CallingForm,
    members: Vec<Member>,
}

async fn member_options(state: &AppState) -> Result<Vec<Member>, AppError> {
    Ok(state
        .members
        .list_members(&MemberQuery::sorted(MemberSort::LastAsc))
        .await?)
}

/// Handler for the new-calling form (GET /callings/new).
pub async fn new_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(HtmlTemplate(CallingFormTemplate {
        heading: "New Calling",
        action: "/callings".to_string(),
        errors: Vec::new(),
        form: CallingForm::default(),
        members: member_options(&state).await?,
    }))
}

/// Handler for calling creation (POST /callings).
pub async fn create(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<CallingForm>,
) -> Result<Response, AppError> {
    let validated = validate_calling_input(&form.as_input());
    if !validated.is_ok() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            CallingFormTemplate {
                heading: "New Calling",
                action: "/callings".to_string(),
                errors: validated.errors,
                form,
                members: member_options(&state).await?,
            },
        ));
    }

    let cleaned = validated.cleaned;
    let mut calling = Calling::new(cleaned.title, cleaned.organization);
    calling.member_id = cleaned.member_id;
    calling.notes = cleaned.notes;
    calling.active = cleaned.active;

    state.callings.create_calling(&calling).await?;
    tracing::info!(calling = %calling.id, "Calling created");

    Ok(Redirect::to("/callings").into_response())
}

/// Handler for the calling edit form (GET /callings/{id}/edit).
pub async fn edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let calling = state
        .callings
        .get_calling(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Calling",
            id: id.to_string(),
        })?;

    Ok(HtmlTemplate(CallingFormTemplate {
        heading: "Edit Calling",
        action: format!("/callings/{id}"),
        errors: Vec::new(),
        form: CallingForm::from_calling(&calling),
        members: member_options(&state).await?,
    }))
}

/// Handler for calling updates (POST /callings/{id}).
pub async fn update(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<CallingForm>,
) -> Result<Response, AppError> {
    let mut calling = state
        .callings
        .get_calling(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Calling",
            id: id.to_string(),
        })?;

    let validated = validate_calling_input(&form.as_input());
    if !validated.is_ok() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            CallingFormTemplate {
                heading: "Edit Calling",
                action: format!("/callings/{id}"),
                errors: validated.errors,
                form,
                members: member_options(&state).await?,
            },
        ));
    }

    let cleaned = validated.cleaned;
    calling.title = cleaned.title;
    calling.organization = cleaned.organization;
    calling.member_id = cleaned.member_id;
    calling.notes = cleaned.notes;
    calling.active = cleaned.active;
    calling.updated_at = Utc::now();

    state.callings.update_calling(&calling).await?;

    Ok(Redirect::to("/callings").into_response())
}

/// Handler for calling deletion (POST /callings/{id}/delete).
pub async fn delete(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    match id.parse::<Uuid>() {
        Ok(id) => {
            if let Err(err) = state.callings.delete_calling(id).await {
                tracing::warn!(calling = %id, error = %err, "Calling delete skipped");
            }
        }
        Err(_) => {
            tracing::warn!(id = %id, "Calling delete requested with invalid id");
        }
    }

    Ok(Redirect::to("/callings"))
}
