//! The public month-grid calendar page.

use askama::Template;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::{Datelike, Local};
use serde::Deserialize;

use steeple_core::calendar::{build_month_calendar, MonthCalendar};
use steeple_core::storage::DateRange;

use crate::error::AppError;
use crate::handlers::HtmlTemplate;
use crate::state::AppState;

/// Raw query strings; anything unparseable falls back to the current month.
#[derive(Debug, Deserialize, Default)]
pub struct CalendarQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Template)]
#[template(path = "calendar.html")]
struct CalendarTemplate {
    calendar: MonthCalendar,
}

/// Handler for the calendar page (GET /events).
pub async fn month_view(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();

    let year = query
        .year
        .as_deref()
        .and_then(|y| y.trim().parse::<i32>().ok())
        .unwrap_or(0);
    let month = query
        .month
        .as_deref()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .unwrap_or(0);

    // The same defaulting the grid builder applies, done here first so the
    // event query covers the month that will actually be displayed.
    let year = if (1900..=2100).contains(&year) {
        year
    } else {
        today.year()
    };
    let month = if (1..=12).contains(&month) {
        month
    } else {
        today.month()
    };

    let range = DateRange::month(year, month)
        .ok_or_else(|| anyhow::anyhow!("invalid month {year}-{month}"))?;
    let events = state.events.events_in_range(range).await?;
    let calendar = build_month_calendar(year, month, events, today);

    Ok(HtmlTemplate(CalendarTemplate { calendar }))
}
