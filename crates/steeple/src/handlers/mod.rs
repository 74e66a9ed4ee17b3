//! HTTP handlers, grouped by page family. All HTML pages extend the shared
//! layout template; form-validation failures re-render the form with the
//! error list at status 400.

pub mod admin;
pub mod api;
pub mod attendance;
pub mod calendar;
pub mod callings;
pub mod events;
pub mod login;
pub mod members;
pub mod pages;
pub mod profile;
pub mod programs;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Template wrapper that converts Askama templates into HTML responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {err}"),
            )
                .into_response(),
        }
    }
}

/// Renders a template at an explicit status code; used when re-rendering a
/// form with validation errors.
pub fn render_with_status<T: Template>(status: StatusCode, template: T) -> Response {
    (status, HtmlTemplate(template)).into_response()
}
