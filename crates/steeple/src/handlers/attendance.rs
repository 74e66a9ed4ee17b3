//! Attendance: the admin take-page, self check-in, and histories.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use steeple_core::directory::{
    AttendanceRecord, MeetingType, Member, User, NOTES_MAX_LEN,
};
use steeple_core::storage::{MemberQuery, MemberSort, RepositoryError};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::handlers::HtmlTemplate;
use crate::models::{AttendanceSheet, CheckinForm};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct TakeQuery {
    pub date: Option<String>,
    pub sort: Option<String>,
}

/// Accepts only `YYYY-MM-DD`; anything else means today.
fn selected_date(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .unwrap_or(today)
}

/// One member row on the take-page, with any existing record's state.
struct TakeRow {
    member: Member,
    present: bool,
    notes: String,
}

#[derive(Template)]
#[template(path = "attendance_take.html")]
struct TakeTemplate {
    date: String,
    sort: String,
    rows: Vec<TakeRow>,
}

/// Handler for the take-attendance page (GET /attendance).
pub async fn take(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Query(query): Query<TakeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let date = selected_date(query.date.as_deref(), today);
    let sort = query.sort.unwrap_or_default();

    let members = state
        .members
        .list_members(&MemberQuery::sorted(MemberSort::parse(&sort)))
        .await?;
    let existing: HashMap<Uuid, AttendanceRecord> = state
        .attendance
        .records_for_date(date)
        .await?
        .into_iter()
        .map(|r| (r.member_id, r))
        .collect();

    let rows = members
        .into_iter()
        .map(|member| {
            let record = existing.get(&member.id);
            TakeRow {
                present: record.map(|r| r.present).unwrap_or(false),
                notes: record.map(|r| r.notes.clone()).unwrap_or_default(),
                member,
            }
        })
        .collect();

    Ok(HtmlTemplate(TakeTemplate {
        date: date.to_string(),
        sort,
        rows,
    }))
}

/// Handler for the bulk save (POST /attendance). Upserts one record per
/// submitted row, preserving a row's recorded meeting type.
pub async fn save(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Redirect, AppError> {
    let today = Local::now().date_naive();
    let sheet = AttendanceSheet::from_fields(&fields);
    let date = sheet.date.unwrap_or(today);

    for mark in &sheet.marks {
        let mut record = state
            .attendance
            .get_record(mark.member_id, date)
            .await?
            .unwrap_or_else(|| AttendanceRecord::new(mark.member_id, date, mark.present));
        record.present = mark.present;
        record.notes = mark.notes.clone();
        record.updated_at = chrono::Utc::now();

        state.attendance.upsert_record(&record).await?;
    }

    tracing::debug!(date = %date, rows = sheet.marks.len(), "Attendance saved");
    Ok(Redirect::to(&format!("/attendance?date={date}")))
}

#[derive(Template)]
#[template(path = "attendance_checkin.html")]
struct CheckinTemplate {
    member_name: String,
    date: String,
    checked_in: bool,
    meeting_label: String,
}

/// Loads the logged-in user's linked member, or explains why they cannot
/// check in.
async fn linked_member(state: &AppState, user: &User) -> Result<Result<Member, Response>, AppError> {
    let Some(member_id) = user.member_id else {
        return Ok(Err((
            StatusCode::FORBIDDEN,
            "You must be linked to a member to check in.",
        )
            .into_response()));
    };

    let member = state
        .members
        .get_member(member_id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: member_id.to_string(),
        })?;

    Ok(Ok(member))
}

/// Handler for the self check-in page (GET /attendance/checkin).
pub async fn checkin_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let member = match linked_member(&state, &user).await? {
        Ok(member) => member,
        Err(response) => return Ok(response),
    };

    let today = Local::now().date_naive();
    let record = state.attendance.get_record(member.id, today).await?;

    Ok(HtmlTemplate(CheckinTemplate {
        member_name: member.full_name(),
        date: today.to_string(),
        checked_in: record.as_ref().map(|r| r.present).unwrap_or(false),
        meeting_label: record
            .map(|r| r.meeting_type.label().to_string())
            .unwrap_or_default(),
    })
    .into_response())
}

/// Handler for the self check-in save (POST /attendance/checkin).
pub async fn checkin_save(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Form(form): Form<CheckinForm>,
) -> Result<Response, AppError> {
    let member = match linked_member(&state, &user).await? {
        Ok(member) => member,
        Err(response) => return Ok(response),
    };

    let today = Local::now().date_naive();
    let mut record = AttendanceRecord::new(member.id, today, true);
    record.meeting_type = MeetingType::parse(&form.meeting_type);
    // Arrives trimmed; empty submissions already collapsed to None.
    record.notes = form
        .notes
        .unwrap_or_default()
        .chars()
        .take(NOTES_MAX_LEN)
        .collect();

    state.attendance.upsert_record(&record).await?;
    tracing::debug!(member = %member.id, "Self check-in saved");

    Ok(Redirect::to("/attendance/checkin").into_response())
}

/// One history row with the member's name resolved.
struct HistoryRow {
    record: AttendanceRecord,
    member_name: String,
}

#[derive(Template)]
#[template(path = "attendance_history.html")]
struct HistoryTemplate {
    rows: Vec<HistoryRow>,
}

/// Handler for the full attendance history (GET /attendance/history).
pub async fn history(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let records = state.attendance.history().await?;

    let ids: Vec<Uuid> = records.iter().map(|r| r.member_id).collect();
    let names: HashMap<Uuid, String> = state
        .members
        .get_members(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.full_name()))
        .collect();

    let rows = records
        .into_iter()
        .map(|record| HistoryRow {
            member_name: names
                .get(&record.member_id)
                .cloned()
                .unwrap_or_else(|| "—".to_string()),
            record,
        })
        .collect();

    Ok(HtmlTemplate(HistoryTemplate { rows }))
}

#[derive(Template)]
#[template(path = "attendance_member_history.html")]
struct MemberHistoryTemplate {
    member: Member,
    records: Vec<AttendanceRecord>,
}

/// Handler for one member's history (GET /attendance/history/{member_id}).
pub async fn member_history(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let member = state
        .members
        .get_member(member_id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Member",
            id: member_id.to_string(),
        })?;

    let records = state.attendance.member_history(member_id).await?;

    Ok(HtmlTemplate(MemberHistoryTemplate { member, records }))
}
