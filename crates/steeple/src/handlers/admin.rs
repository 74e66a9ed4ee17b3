//! Account administration.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use steeple_core::directory::Role;

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::state::AppState;

/// One account row with the linked member's name resolved.
struct UserRow {
    id: String,
    email: String,
    role: &'static str,
    member_name: String,
}

#[derive(Template)]
#[template(path = "admin_users.html")]
struct UserListTemplate {
    rows: Vec<UserRow>,
    message: String,
    error: String,
}

async fn user_rows(state: &AppState) -> Result<Vec<UserRow>, AppError> {
    let users = state.users.list_users().await?;

    let ids: Vec<Uuid> = users.iter().filter_map(|u| u.member_id).collect();
    let names: HashMap<Uuid, String> = state
        .members
        .get_members(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.full_name()))
        .collect();

    Ok(users
        .into_iter()
        .map(|user| UserRow {
            id: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str(),
            member_name: user
                .member_id
                .and_then(|id| names.get(&id).cloned())
                .unwrap_or_else(|| "—".to_string()),
        })
        .collect())
}

/// Handler for the account list (GET /admin/users).
pub async fn list(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(HtmlTemplate(UserListTemplate {
        rows: user_rows(&state).await?,
        message: String::new(),
        error: String::new(),
    }))
}

#[derive(Debug, Deserialize, Default)]
pub struct RoleForm {
    #[serde(default)]
    pub role: String,
}

/// Handler for role changes (POST /admin/users/{id}/role). Re-renders the
/// list with a success or error banner.
pub async fn set_role(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<RoleForm>,
) -> Result<Response, AppError> {
    let Some(role) = Role::parse(&form.role) else {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            UserListTemplate {
                rows: user_rows(&state).await?,
                message: String::new(),
                error: format!("Invalid role: {}", form.role),
            },
        ));
    };

    let Some(mut user) = state.users.get_user(id).await? else {
        return Ok(render_with_status(
            StatusCode::NOT_FOUND,
            UserListTemplate {
                rows: user_rows(&state).await?,
                message: String::new(),
                error: "Account not found.".to_string(),
            },
        ));
    };

    user.role = role;
    user.updated_at = Utc::now();
    state.users.update_user(&user).await?;
    tracing::info!(user = %user.id, role = role.as_str(), "Role updated");

    Ok(HtmlTemplate(UserListTemplate {
        rows: user_rows(&state).await?,
        message: format!("Updated {} to {}.", user.email, role.as_str()),
        error: String::new(),
    })
    .into_response())
}
