//! Axum extractors for the session cookie.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use steeple_core::directory::User;

use crate::state::AppState;

/// Resolves the request's session cookie to its user, if any.
async fn user_from_parts(parts: &Parts, state: &AppState) -> Option<User> {
    let jar = CookieJar::from_headers(&parts.headers);
    let cookie = jar.get(&state.config.session_cookie)?;
    let session = state.sessions.get(cookie.value()).await?;
    state.users.get_user(session.user_id).await.ok().flatten()
}

/// Redirect to the login page, carrying the original path so a successful
/// login can return to it.
fn login_redirect(parts: &Parts) -> Response {
    let next = urlencoding::encode(parts.uri.path()).into_owned();
    Redirect::to(&format!("/auth/login?next={next}")).into_response()
}

/// The logged-in user. Requests without a live session are redirected to
/// the login page.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        match user_from_parts(parts, &app).await {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(login_redirect(parts)),
        }
    }
}

/// The logged-in user when one exists, `None` otherwise. Never rejects.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        Ok(OptionalUser(user_from_parts(parts, &app).await))
    }
}

/// A logged-in admin. Anonymous requests are sent to the login page;
/// logged-in non-admins get a 403.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        match user_from_parts(parts, &app).await {
            Some(user) if user.role.is_admin() => Ok(AdminUser(user)),
            Some(_) => Err((StatusCode::FORBIDDEN, "Forbidden: Admins only").into_response()),
            None => Err(login_redirect(parts)),
        }
    }
}
