//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types,
//! testable without touching a database.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use steeple_core::calendar::{Event, Recurrence};
use steeple_core::directory::{
    AttendanceRecord, Calling, Gender, MeetingType, Member, Role, User,
};
use steeple_core::program::{Hymn, Program, Speaker};
use steeple_core::storage::RepositoryError;

fn conversion_err(err: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

fn parse_uuid(value: &str) -> rusqlite::Result<Uuid> {
    value.parse().map_err(conversion_err)
}

fn parse_optional_uuid(value: Option<String>) -> rusqlite::Result<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

fn parse_datetime(value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_err)
}

fn parse_date(value: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(conversion_err)
}

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub fn format_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

pub fn format_time(value: &NaiveTime) -> String {
    value.format("%H:%M").to_string()
}

/// Expected columns: id, title, description, location, start_date,
/// start_time, recurrence, created_at, updated_at
pub fn row_to_event(row: &Row) -> rusqlite::Result<Event> {
    let id: String = row.get(0)?;
    let start_date: String = row.get(4)?;
    let start_time: Option<String> = row.get(5)?;
    let recurrence: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(Event {
        id: parse_uuid(&id)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        start_date: parse_date(&start_date)?,
        start_time: start_time
            .map(|t| NaiveTime::parse_from_str(&t, "%H:%M").map_err(conversion_err))
            .transpose()?,
        recurrence: Recurrence::parse(&recurrence),
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, first_name, last_name, email, phone, gender,
/// photo, created_at, updated_at
pub fn row_to_member(row: &Row) -> rusqlite::Result<Member> {
    let id: String = row.get(0)?;
    let gender: String = row.get(5)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok(Member {
        id: parse_uuid(&id)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        gender: Gender::parse(&gender),
        photo: row.get(6)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, title, organization, member_id, notes, active,
/// created_at, updated_at
pub fn row_to_calling(row: &Row) -> rusqlite::Result<Calling> {
    let id: String = row.get(0)?;
    let member_id: Option<String> = row.get(3)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Calling {
        id: parse_uuid(&id)?,
        title: row.get(1)?,
        organization: row.get(2)?,
        member_id: parse_optional_uuid(member_id)?,
        notes: row.get(4)?,
        active: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, member_id, date, present, meeting_type, notes,
/// created_at, updated_at
pub fn row_to_attendance(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let id: String = row.get(0)?;
    let member_id: String = row.get(1)?;
    let date: String = row.get(2)?;
    let meeting_type: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(AttendanceRecord {
        id: parse_uuid(&id)?,
        member_id: parse_uuid(&member_id)?,
        date: parse_date(&date)?,
        present: row.get(3)?,
        meeting_type: MeetingType::parse(&meeting_type),
        notes: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Serializes an optional hymn to its JSON column value.
pub fn hymn_to_json(hymn: Option<&Hymn>) -> Result<Option<String>, RepositoryError> {
    hymn.map(|h| serde_json::to_string(h))
        .transpose()
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Serializes the speaker list to its JSON column value.
pub fn speakers_to_json(speakers: &[Speaker]) -> Result<String, RepositoryError> {
    serde_json::to_string(speakers).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn hymn_from_json(value: Option<String>) -> rusqlite::Result<Option<Hymn>> {
    value
        .map(|v| serde_json::from_str(&v).map_err(conversion_err))
        .transpose()
}

/// Expected columns: the full `PROGRAM_COLUMNS` list, in order.
pub fn row_to_program(row: &Row) -> rusqlite::Result<Program> {
    let id: String = row.get(0)?;
    let date: String = row.get(2)?;
    let presiding: Option<String> = row.get(4)?;
    let conducting: Option<String> = row.get(5)?;
    let chorister: Option<String> = row.get(6)?;
    let organist: Option<String> = row.get(7)?;
    let opening_hymn: Option<String> = row.get(8)?;
    let sacrament_hymn: Option<String> = row.get(9)?;
    let intermediate_hymn: Option<String> = row.get(10)?;
    let closing_hymn: Option<String> = row.get(11)?;
    let opening_prayer: Option<String> = row.get(12)?;
    let closing_prayer: Option<String> = row.get(13)?;
    let speakers: String = row.get(14)?;
    let created_by: Option<String> = row.get(22)?;
    let created_at: String = row.get(23)?;
    let updated_at: String = row.get(24)?;

    Ok(Program {
        id: parse_uuid(&id)?,
        title: row.get(1)?,
        date: parse_date(&date)?,
        theme: row.get(3)?,
        presiding: parse_optional_uuid(presiding)?,
        conducting: parse_optional_uuid(conducting)?,
        chorister: parse_optional_uuid(chorister)?,
        organist: parse_optional_uuid(organist)?,
        opening_hymn: hymn_from_json(opening_hymn)?,
        sacrament_hymn: hymn_from_json(sacrament_hymn)?,
        intermediate_hymn: hymn_from_json(intermediate_hymn)?,
        closing_hymn: hymn_from_json(closing_hymn)?,
        opening_prayer: parse_optional_uuid(opening_prayer)?,
        closing_prayer: parse_optional_uuid(closing_prayer)?,
        speakers: serde_json::from_str(&speakers).map_err(conversion_err)?,
        announcements: row.get(15)?,
        stake_business: row.get(16)?,
        ward_business: row.get(17)?,
        greeter: row.get(18)?,
        include_bearing_of_testimonies: row.get(19)?,
        second_hour_type: row.get(20)?,
        second_hour_other_text: row.get(21)?,
        created_by: parse_optional_uuid(created_by)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Expected columns: id, email, password_hash, role, member_id,
/// created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let role: String = row.get(3)?;
    let member_id: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(User {
        id: parse_uuid(&id)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: Role::parse(&role).unwrap_or_default(),
        member_id: parse_optional_uuid(member_id)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        assert_eq!(parse_date(&format_date(&date)).unwrap(), date);
    }

    #[test]
    fn test_datetime_round_trip() {
        let now = Utc::now();
        let parsed = parse_datetime(&format_datetime(&now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_hymn_json_round_trip() {
        let hymn = Hymn {
            number: "98".to_string(),
            title: "I Need Thee Every Hour".to_string(),
        };
        let json = hymn_to_json(Some(&hymn)).unwrap().unwrap();
        assert_eq!(hymn_from_json(Some(json)).unwrap(), Some(hymn));

        assert_eq!(hymn_to_json(None).unwrap(), None);
        assert_eq!(hymn_from_json(None).unwrap(), None);
    }
}
