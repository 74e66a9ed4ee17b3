//! The logged-in user's own profile.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use chrono::Utc;

use steeple_core::directory::{validate_profile_input, Member, User};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::models::{PasswordForm, ProfileForm};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    errors: Vec<String>,
    message: String,
    account_email: String,
    has_member: bool,
    form: ProfileForm,
}

async fn linked_member(state: &AppState, user: &User) -> Result<Option<Member>, AppError> {
    match user.member_id {
        Some(id) => Ok(state.members.get_member(id).await?),
        None => Ok(None),
    }
}

fn profile_page_template(user: &User, member: Option<&Member>) -> ProfileTemplate {
    ProfileTemplate {
        errors: Vec::new(),
        message: String::new(),
        account_email: user.email.clone(),
        has_member: member.is_some(),
        form: member.map(ProfileForm::from_member).unwrap_or_default(),
    }
}

/// Handler for the profile page (GET /profile).
pub async fn show(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let member = linked_member(&state, &user).await?;
    Ok(HtmlTemplate(profile_page_template(&user, member.as_ref())))
}

/// Handler for profile updates (POST /profile). Keeps the account email in
/// step with the member record's email.
pub async fn update(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let Some(mut member) = linked_member(&state, &user).await? else {
        let mut template = profile_page_template(&user, None);
        template.errors = vec!["No member record is linked to your account.".to_string()];
        return Ok(render_with_status(StatusCode::BAD_REQUEST, template));
    };

    let validated = validate_profile_input(&form.as_input());
    if !validated.is_ok() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            ProfileTemplate {
                errors: validated.errors,
                message: String::new(),
                account_email: user.email.clone(),
                has_member: true,
                form,
            },
        ));
    }

    let cleaned = validated.cleaned;
    member.first_name = cleaned.first_name;
    member.last_name = cleaned.last_name;
    member.email = cleaned.email.clone();
    member.phone = cleaned.phone;
    member.updated_at = Utc::now();
    state.members.update_member(&member).await?;

    let mut user = user;
    if let Some(email) = cleaned.email {
        if email != user.email {
            user.email = email;
            user.updated_at = Utc::now();
            state.users.update_user(&user).await?;
        }
    }

    let mut template = profile_page_template(&user, Some(&member));
    template.message = "Profile updated.".to_string();
    Ok(HtmlTemplate(template).into_response())
}

/// Handler for password changes (POST /profile/password).
pub async fn change_password(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    let member = linked_member(&state, &user).await?;

    let mut errors = Vec::new();
    if !bcrypt::verify(&form.current_password, &user.password_hash).unwrap_or(false) {
        errors.push("Current password is incorrect.".to_string());
    }
    if form.new_password.trim().len() < MIN_PASSWORD_LEN {
        errors.push("New password must be at least 6 characters long.".to_string());
    }
    if form.new_password != form.confirm_password {
        errors.push("New passwords do not match.".to_string());
    }

    if !errors.is_empty() {
        let mut template = profile_page_template(&user, member.as_ref());
        template.errors = errors;
        return Ok(render_with_status(StatusCode::BAD_REQUEST, template));
    }

    let mut user = user;
    user.password_hash = bcrypt::hash(form.new_password.as_bytes(), bcrypt::DEFAULT_COST)?;
    user.updated_at = Utc::now();
    state.users.update_user(&user).await?;
    tracing::info!(user = %user.id, "Password changed");

    let mut template = profile_page_template(&user, member.as_ref());
    template.message = "Password changed.".to_string();
    Ok(HtmlTemplate(template).into_response())
}
