//! The ward directory.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use steeple_core::directory::{validate_member_input, Calling, Gender, Member};
use steeple_core::storage::{MemberQuery, MemberSort, RepositoryError};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::models::MemberForm;
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct DirectoryQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Template)]
#[template(path = "members.html")]
struct MemberListTemplate {
    members: Vec<Member>,
    q: String,
    sort: String,
}

/// Handler for the directory listing (GET /members).
pub async fn list(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let q = query.q.unwrap_or_default().trim().to_string();
    let sort = query.sort.unwrap_or_default();

    let members = state
        .members
        .list_members(&MemberQuery {
            search: (!q.is_empty()).then(|| q.clone()),
            sort: MemberSort::parse(&sort),
        })
        .await?;

    Ok(HtmlTemplate(MemberListTemplate { members, q, sort }))
}

#[derive(Template)]
#[template(path = "members_report.html")]
struct MemberReportTemplate {
    total: usize,
    males: usize,
    females: usize,
    others: usize,
    unknowns: usize,
    recent: Vec<Member>,
}

/// Handler for the directory report (GET /members/report).
pub async fn report(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let members = state.members.list_members(&MemberQuery::default()).await?;

    let count = |gender: Gender| members.iter().filter(|m| m.gender == gender).count();
    let males = count(Gender::Male);
    let females = count(Gender::Female);
    let others = count(Gender::Other);
    let unknowns = count(Gender::Unknown);

    let mut recent = members.clone();
    recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    recent.truncate(5);

    Ok(HtmlTemplate(MemberReportTemplate {
        total: members.len(),
        males,
        females,
        others,
        unknowns,
        recent,
    }))
}

#[derive(Template)]
#[template(path = "member_show.html")]
struct MemberShowTemplate {
    member: Member,
    callings: Vec<Calling>,
}

/// Handler for a single member page (GET /members/{id}).
pub async fn show(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .members
        .get_member(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: id.to_string(),
        })?;

    let callings = state
        .callings
        .list_callings()
        .await?
        .into_iter()
        .filter(|c| c.member_id == Some(id))
        .collect();

    Ok(HtmlTemplate(MemberShowTemplate { member, callings }))
}

#[derive(Template)]
#[template(path = "member_form.html")]
struct MemberFormTemplate {
    heading: &'static str,
    action: String,
    errors: Vec<String>,
    form: MemberForm,
}

/// Handler for the new-member form (GET /members/new).
pub async fn new_form(AdminUser(_admin): AdminUser) -> impl IntoResponse {
    HtmlTemplate(MemberFormTemplate {
        heading: "Add Member",
        action: "/members".to_string(),
        errors: Vec::new(),
        form: MemberForm::default(),
    })
}

/// Handler for member creation (POST /members).
pub async fn create(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<MemberForm>,
) -> Result<Response, AppError> {
    let validated = validate_member_input(&form.as_input());
    if !validated.is_ok() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            MemberFormTemplate {
                heading: "Add Member",
                action: "/members".to_string(),
                errors: validated.errors,
                form,
            },
        ));
    }

    let cleaned = validated.cleaned;
    let mut member = Member::new(cleaned.first_name, cleaned.last_name)
        .with_gender(cleaned.gender);
    member.email = cleaned.email;
    member.phone = cleaned.phone;

    state.members.create_member(&member).await?;
    tracing::info!(member = %member.id, "Member created");

    Ok(Redirect::to("/members").into_response())
}

/// Handler for the member edit form (GET /members/{id}/edit).
pub async fn edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .members
        .get_member(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: id.to_string(),
        })?;

    Ok(HtmlTemplate(MemberFormTemplate {
        heading: "Edit Member",
        action: format!("/members/{id}"),
        errors: Vec::new(),
        form: MemberForm::from_member(&member),
    }))
}

/// Handler for member updates (POST /members/{id}).
pub async fn update(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<MemberForm>,
) -> Result<Response, AppError> {
    let mut member = state
        .members
        .get_member(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: id.to_string(),
        })?;

    let validated = validate_member_input(&form.as_input());
    if !validated.is_ok() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            MemberFormTemplate {
                heading: "Edit Member",
                action: format!("/members/{id}"),
                errors: validated.errors,
                form,
            },
        ));
    }

    let cleaned = validated.cleaned;
    member.first_name = cleaned.first_name;
    member.last_name = cleaned.last_name;
    member.email = cleaned.email;
    member.phone = cleaned.phone;
    member.gender = cleaned.gender;
    member.updated_at = Utc::now();

    state.members.update_member(&member).await?;

    Ok(Redirect::to(&format!("/members/{id}")).into_response())
}

#[derive(Template)]
#[template(path = "member_delete.html")]
struct MemberDeleteTemplate {
    member: Member,
}

/// Handler for the delete confirmation page (GET /members/{id}/delete-confirm).
pub async fn delete_confirm(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .members
        .get_member(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: id.to_string(),
        })?;

    Ok(HtmlTemplate(MemberDeleteTemplate { member }))
}

/// Handler for member deletion (POST /members/{id}/delete). Clears the
/// member's attendance records and unlinks callings and accounts first.
pub async fn delete(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    state.attendance.delete_for_member(id).await?;

    for mut calling in state.callings.list_callings().await? {
        if calling.member_id == Some(id) {
            calling.member_id = None;
            calling.updated_at = Utc::now();
            state.callings.update_calling(&calling).await?;
        }
    }

    for mut user in state.users.list_users().await? {
        if user.member_id == Some(id) {
            user.member_id = None;
            user.updated_at = Utc::now();
            state.users.update_user(&user).await?;
        }
    }

    state.members.delete_member(id).await?;
    tracing::info!(member = %id, "Member deleted");

    Ok(Redirect::to("/members"))
}
