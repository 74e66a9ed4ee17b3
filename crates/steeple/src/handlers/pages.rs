//! Public pages: home and church info.

use askama::Template;
use axum::{extract::State, response::IntoResponse};
use chrono::{Datelike, Local};

use steeple_core::calendar::Event;

use crate::auth::OptionalUser;
use crate::error::AppError;
use crate::handlers::HtmlTemplate;
use crate::state::AppState;

/// Rotating scripture passages for the home page, cycled by day of year.
const SCRIPTURES: &[(&str, &str)] = &[
    (
        "Mosiah 2:17",
        "When ye are in the service of your fellow beings ye are only in the service of your God.",
    ),
    (
        "Proverbs 3:5",
        "Trust in the Lord with all thine heart; and lean not unto thine own understanding.",
    ),
    (
        "2 Nephi 2:25",
        "Adam fell that men might be; and men are, that they might have joy.",
    ),
    (
        "Matthew 5:16",
        "Let your light so shine before men, that they may see your good works.",
    ),
    (
        "Alma 37:6",
        "By small and simple things are great things brought to pass.",
    ),
    (
        "John 13:34",
        "A new commandment I give unto you, That ye love one another.",
    ),
    (
        "Ether 12:27",
        "If men come unto me I will show unto them their weakness.",
    ),
];

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    greeting: Option<String>,
    events: Vec<Event>,
    verse_reference: &'static str,
    verse_text: &'static str,
}

/// Handler for the home page (GET /).
pub async fn home(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let events = state.events.upcoming_events(today, 3).await?;
    let (verse_reference, verse_text) =
        SCRIPTURES[today.ordinal0() as usize % SCRIPTURES.len()];

    // Greet by the linked member's name when one exists, else the email.
    let greeting = match &user {
        Some(user) => match user.member_id {
            Some(member_id) => Some(
                state
                    .members
                    .get_member(member_id)
                    .await?
                    .map(|m| m.full_name())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| user.email.clone()),
            ),
            None => Some(user.email.clone()),
        },
        None => None,
    };

    Ok(HtmlTemplate(HomeTemplate {
        greeting,
        events,
        verse_reference,
        verse_text,
    }))
}

#[derive(Template)]
#[template(path = "church_info.html")]
struct ChurchInfoTemplate {
    events: Vec<Event>,
}

/// Handler for the church info page (GET /church-info).
pub async fn church_info(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let events = state.events.upcoming_events(today, 5).await?;

    Ok(HtmlTemplate(ChurchInfoTemplate { events }))
}
