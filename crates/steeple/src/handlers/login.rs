//! Login, signup, and logout.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use steeple_core::directory::{Member, Role, User};
use steeple_core::validation::is_valid_email;

use crate::error::AppError;
use crate::handlers::{render_with_status, HtmlTemplate};
use crate::models::{LoginForm, SignupForm};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

/// Only same-site paths are allowed as post-login targets, so a crafted
/// link cannot bounce a user to another origin.
fn sanitize_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/"
    }
}

fn session_cookie(name: String, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    errors: Vec<String>,
    email: String,
    next: String,
}

/// Handler for the login page (GET /auth/login).
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    HtmlTemplate(LoginTemplate {
        errors: Vec::new(),
        email: String::new(),
        next: query.next.unwrap_or_default(),
    })
}

/// Handler for login submissions (POST /auth/login). Failed attempts get
/// one generic message at 401, never a hint about which field was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_lowercase();
    let failed = |email: String, next: String| {
        render_with_status(
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                errors: vec!["Invalid email or password.".to_string()],
                email,
                next,
            },
        )
    };

    if email.is_empty() || form.password.is_empty() {
        return Ok(failed(email, form.next));
    }

    let Some(user) = state.users.get_user_by_email(&email).await? else {
        tracing::debug!(email = %email, "Login attempt for unknown account");
        return Ok(failed(email, form.next));
    };

    if !bcrypt::verify(&form.password, &user.password_hash).unwrap_or(false) {
        tracing::debug!(user = %user.id, "Login attempt with wrong password");
        return Ok(failed(email, form.next));
    }

    let session = state.sessions.create(user.id).await;
    let jar = jar.add(session_cookie(
        state.config.session_cookie.clone(),
        session.id,
    ));
    tracing::info!(user = %user.id, "User logged in");

    let target = sanitize_next(&form.next).to_string();
    Ok((jar, Redirect::to(&target)).into_response())
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupTemplate {
    errors: Vec<String>,
    form: SignupForm,
}

/// Handler for the signup page (GET /auth/signup).
pub async fn signup_page() -> impl IntoResponse {
    HtmlTemplate(SignupTemplate {
        errors: Vec::new(),
        form: SignupForm::default(),
    })
}

fn validate_signup(form: &SignupForm) -> Vec<String> {
    let mut errors = Vec::new();

    if form.first_name.trim().is_empty()
        || form.last_name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.password.is_empty()
    {
        errors.push("First name, last name, email, and password are required.".to_string());
        return errors;
    }

    if !is_valid_email(&form.email) {
        errors.push("Please enter a valid email address.".to_string());
    }
    if form.password.trim().len() < MIN_PASSWORD_LEN {
        errors.push("Password must be at least 6 characters long.".to_string());
    }
    if form.password != form.confirm_password {
        errors.push("Passwords do not match.".to_string());
    }

    errors
}

/// Handler for signups (POST /auth/signup). Creates a directory member, a
/// linked member-role account, and logs the new user straight in.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let errors = validate_signup(&form);
    if !errors.is_empty() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            SignupTemplate { errors, form },
        ));
    }

    let email = form.email.trim().to_lowercase();
    if state.users.get_user_by_email(&email).await?.is_some() {
        return Ok(render_with_status(
            StatusCode::BAD_REQUEST,
            SignupTemplate {
                errors: vec!["That email is already registered.".to_string()],
                form,
            },
        ));
    }

    let mut member = Member::new(form.first_name.trim(), form.last_name.trim())
        .with_email(email.clone())
        .with_gender(steeple_core::directory::Gender::parse(&form.gender));
    let phone = form.phone.trim();
    if !phone.is_empty() {
        member.phone = Some(phone.to_string());
    }
    state.members.create_member(&member).await?;

    let password_hash = bcrypt::hash(form.password.as_bytes(), bcrypt::DEFAULT_COST)?;
    let user = User::new(email, password_hash)
        .with_role(Role::Member)
        .with_member(member.id);
    state.users.create_user(&user).await?;

    let session = state.sessions.create(user.id).await;
    let jar = jar.add(session_cookie(
        state.config.session_cookie.clone(),
        session.id,
    ));
    tracing::info!(user = %user.id, member = %member.id, "Account created");

    Ok((jar, Redirect::to("/")).into_response())
}

/// Handler for logout (POST /auth/logout).
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(cookie) = jar.get(&state.config.session_cookie) {
        state.sessions.delete(cookie.value()).await;
    }

    let jar = jar.remove(Cookie::from(state.config.session_cookie.clone()));
    (jar, Redirect::to("/")).into_response()
}
