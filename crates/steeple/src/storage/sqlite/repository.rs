//! SQLite repository implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use steeple_core::calendar::Event;
use steeple_core::directory::{AttendanceRecord, Calling, Member, User};
use steeple_core::program::Program;
use steeple_core::storage::{
    AttendanceRepository, CallingRepository, DateRange, EventRepository, MemberQuery,
    MemberRepository, MemberSort, ProgramRepository, RepositoryError, Result, UserRepository,
};

use super::conversions::{
    format_date, format_datetime, format_time, hymn_to_json, row_to_attendance, row_to_calling,
    row_to_event, row_to_member, row_to_program, row_to_user, speakers_to_json,
};
use super::error::map_sqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn query_failed(e: tokio_rusqlite::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

/// SQLite-based repository implementation.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a repository over a file-based database, creating the file
    /// and schema as needed.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository over an in-memory database; data is lost when
    /// the connection drops. Used by tests.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(query_failed)
    }

    /// Runs a single-row select, mapping "no rows" to `None`.
    async fn select_one<T, F>(&self, sql: String, id: String, convert: F) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                match stmt.query_row([&id], |row| convert(row)) {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(query_failed)
    }

    /// Runs a multi-row select with string parameters.
    async fn select_many<T, F>(&self, sql: String, params: Vec<String>, convert: F) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: Fn(&rusqlite::Row) -> rusqlite::Result<T> + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                        convert(row)
                    })
                    .map_err(wrap_err)?;

                let mut items = Vec::new();
                for row in rows {
                    items.push(row.map_err(wrap_err)?);
                }
                Ok(items)
            })
            .await
            .map_err(query_failed)
    }
}

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE id = ?1",
            schema::EVENT_COLUMNS
        );
        self.select_one(sql, id.to_string(), row_to_event).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events ORDER BY start_date, start_time",
            schema::EVENT_COLUMNS
        );
        self.select_many(sql, Vec::new(), row_to_event).await
    }

    async fn events_in_range(&self, range: DateRange) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE start_date >= ?1 AND start_date <= ?2 \
             ORDER BY start_date, start_time",
            schema::EVENT_COLUMNS
        );
        let params = vec![format_date(&range.start), format_date(&range.end)];
        self.select_many(sql, params, row_to_event).await
    }

    async fn upcoming_events(&self, from: NaiveDate, limit: usize) -> Result<Vec<Event>> {
        let sql = format!(
            "SELECT {} FROM events WHERE start_date >= ?1 \
             ORDER BY start_date, start_time LIMIT {limit}",
            schema::EVENT_COLUMNS
        );
        self.select_many(sql, vec![format_date(&from)], row_to_event)
            .await
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let event = event.clone();
        let id = event.id;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EVENT,
                    rusqlite::params![
                        event.id.to_string(),
                        event.title,
                        event.description,
                        event.location,
                        format_date(&event.start_date),
                        event.start_time.as_ref().map(format_time),
                        event.recurrence.as_str(),
                        format_datetime(&event.created_at),
                        format_datetime(&event.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Event", id.to_string()))
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let event = event.clone();
        let id = event.id;

        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_EVENT,
                    rusqlite::params![
                        event.id.to_string(),
                        event.title,
                        event.description,
                        event.location,
                        format_date(&event.start_date),
                        event.start_time.as_ref().map(format_time),
                        event.recurrence.as_str(),
                        format_datetime(&event.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

fn member_order_clause(sort: MemberSort) -> &'static str {
    match sort {
        MemberSort::LastAsc => "LOWER(last_name), LOWER(first_name)",
        MemberSort::LastDesc => "LOWER(last_name) DESC, LOWER(first_name) DESC",
        MemberSort::FirstAsc => "LOWER(first_name), LOWER(last_name)",
        MemberSort::FirstDesc => "LOWER(first_name) DESC, LOWER(last_name) DESC",
        MemberSort::Gender => "gender, LOWER(last_name), LOWER(first_name)",
    }
}

#[async_trait]
impl MemberRepository for SqliteRepository {
    async fn get_member(&self, id: Uuid) -> Result<Option<Member>> {
        let sql = format!(
            "SELECT {} FROM members WHERE id = ?1",
            schema::MEMBER_COLUMNS
        );
        self.select_one(sql, id.to_string(), row_to_member).await
    }

    async fn get_members(&self, ids: &[Uuid]) -> Result<Vec<Member>> {
        let mut members = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(member) = self.get_member(*id).await? {
                members.push(member);
            }
        }
        Ok(members)
    }

    async fn list_members(&self, query: &MemberQuery) -> Result<Vec<Member>> {
        let order = member_order_clause(query.sort);

        match query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(search) => {
                let sql = format!(
                    "SELECT {} FROM members WHERE \
                     LOWER(first_name) LIKE ?1 OR LOWER(last_name) LIKE ?1 \
                     OR LOWER(COALESCE(email, '')) LIKE ?1 OR COALESCE(phone, '') LIKE ?1 \
                     ORDER BY {order}",
                    schema::MEMBER_COLUMNS
                );
                let needle = format!("%{}%", search.to_lowercase());
                self.select_many(sql, vec![needle], row_to_member).await
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM members ORDER BY {order}",
                    schema::MEMBER_COLUMNS
                );
                self.select_many(sql, Vec::new(), row_to_member).await
            }
        }
    }

    async fn create_member(&self, member: &Member) -> Result<()> {
        let member = member.clone();
        let id = member.id;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_MEMBER,
                    rusqlite::params![
                        member.id.to_string(),
                        member.first_name,
                        member.last_name,
                        member.email,
                        member.phone,
                        member.gender.as_str(),
                        member.photo,
                        format_datetime(&member.created_at),
                        format_datetime(&member.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Member", id.to_string()))
    }

    async fn update_member(&self, member: &Member) -> Result<()> {
        let member = member.clone();
        let id = member.id;

        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_MEMBER,
                    rusqlite::params![
                        member.id.to_string(),
                        member.first_name,
                        member.last_name,
                        member.email,
                        member.phone,
                        member.gender.as_str(),
                        member.photo,
                        format_datetime(&member.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Member",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_member(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_MEMBER, [&id_str])
                    .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Member",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CallingRepository for SqliteRepository {
    async fn get_calling(&self, id: Uuid) -> Result<Option<Calling>> {
        let sql = format!(
            "SELECT {} FROM callings WHERE id = ?1",
            schema::CALLING_COLUMNS
        );
        self.select_one(sql, id.to_string(), row_to_calling).await
    }

    async fn list_callings(&self) -> Result<Vec<Calling>> {
        let sql = format!(
            "SELECT {} FROM callings ORDER BY LOWER(organization), LOWER(title)",
            schema::CALLING_COLUMNS
        );
        self.select_many(sql, Vec::new(), row_to_calling).await
    }

    async fn create_calling(&self, calling: &Calling) -> Result<()> {
        let calling = calling.clone();
        let id = calling.id;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CALLING,
                    rusqlite::params![
                        calling.id.to_string(),
                        calling.title,
                        calling.organization,
                        calling.member_id.map(|m| m.to_string()),
                        calling.notes,
                        calling.active,
                        format_datetime(&calling.created_at),
                        format_datetime(&calling.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Calling", id.to_string()))
    }

    async fn update_calling(&self, calling: &Calling) -> Result<()> {
        let calling = calling.clone();
        let id = calling.id;

        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_CALLING,
                    rusqlite::params![
                        calling.id.to_string(),
                        calling.title,
                        calling.organization,
                        calling.member_id.map(|m| m.to_string()),
                        calling.notes,
                        calling.active,
                        format_datetime(&calling.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Calling",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_calling(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(schema::DELETE_CALLING, [&id_str])
                    .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Calling",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for SqliteRepository {
    async fn get_record(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE member_id = ?1 AND date = ?2",
            schema::ATTENDANCE_COLUMNS
        );
        let params = vec![member_id.to_string(), format_date(&date)];
        let records = self.select_many(sql, params, row_to_attendance).await?;
        Ok(records.into_iter().next())
    }

    async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE date = ?1",
            schema::ATTENDANCE_COLUMNS
        );
        self.select_many(sql, vec![format_date(&date)], row_to_attendance)
            .await
    }

    async fn upsert_record(&self, record: &AttendanceRecord) -> Result<()> {
        let record = record.clone();
        let id = record.id;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_ATTENDANCE,
                    rusqlite::params![
                        record.id.to_string(),
                        record.member_id.to_string(),
                        format_date(&record.date),
                        record.present,
                        record.meeting_type.as_str(),
                        record.notes,
                        format_datetime(&record.created_at),
                        format_datetime(&record.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "AttendanceRecord", id.to_string()))
    }

    async fn history(&self) -> Result<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance ORDER BY date DESC, member_id",
            schema::ATTENDANCE_COLUMNS
        );
        self.select_many(sql, Vec::new(), row_to_attendance).await
    }

    async fn member_history(&self, member_id: Uuid) -> Result<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE member_id = ?1 ORDER BY date DESC",
            schema::ATTENDANCE_COLUMNS
        );
        self.select_many(sql, vec![member_id.to_string()], row_to_attendance)
            .await
    }

    async fn delete_for_member(&self, member_id: Uuid) -> Result<()> {
        let id_str = member_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(schema::DELETE_ATTENDANCE_FOR_MEMBER, [&id_str])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(query_failed)
    }
}

#[async_trait]
impl ProgramRepository for SqliteRepository {
    async fn get_program(&self, id: Uuid) -> Result<Option<Program>> {
        let sql = format!(
            "SELECT {} FROM programs WHERE id = ?1",
            schema::PROGRAM_COLUMNS
        );
        self.select_one(sql, id.to_string(), row_to_program).await
    }

    async fn list_programs(&self) -> Result<Vec<Program>> {
        let sql = format!(
            "SELECT {} FROM programs ORDER BY date DESC",
            schema::PROGRAM_COLUMNS
        );
        self.select_many(sql, Vec::new(), row_to_program).await
    }

    async fn create_program(&self, program: &Program) -> Result<()> {
        let program = program.clone();
        let id = program.id;
        let opening = hymn_to_json(program.opening_hymn.as_ref())?;
        let sacrament = hymn_to_json(program.sacrament_hymn.as_ref())?;
        let intermediate = hymn_to_json(program.intermediate_hymn.as_ref())?;
        let closing = hymn_to_json(program.closing_hymn.as_ref())?;
        let speakers = speakers_to_json(&program.speakers)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PROGRAM,
                    rusqlite::params![
                        program.id.to_string(),
                        program.title,
                        format_date(&program.date),
                        program.theme,
                        program.presiding.map(|m| m.to_string()),
                        program.conducting.map(|m| m.to_string()),
                        program.chorister.map(|m| m.to_string()),
                        program.organist.map(|m| m.to_string()),
                        opening,
                        sacrament,
                        intermediate,
                        closing,
                        program.opening_prayer.map(|m| m.to_string()),
                        program.closing_prayer.map(|m| m.to_string()),
                        speakers,
                        program.announcements,
                        program.stake_business,
                        program.ward_business,
                        program.greeter,
                        program.include_bearing_of_testimonies,
                        program.second_hour_type,
                        program.second_hour_other_text,
                        program.created_by.map(|u| u.to_string()),
                        format_datetime(&program.created_at),
                        format_datetime(&program.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Program", id.to_string()))
    }

    async fn update_program(&self, program: &Program) -> Result<()> {
        let program = program.clone();
        let id = program.id;
        let opening = hymn_to_json(program.opening_hymn.as_ref())?;
        let sacrament = hymn_to_json(program.sacrament_hymn.as_ref())?;
        let intermediate = hymn_to_json(program.intermediate_hymn.as_ref())?;
        let closing = hymn_to_json(program.closing_hymn.as_ref())?;
        let speakers = speakers_to_json(&program.speakers)?;

        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_PROGRAM,
                    rusqlite::params![
                        program.id.to_string(),
                        program.title,
                        format_date(&program.date),
                        program.theme,
                        program.presiding.map(|m| m.to_string()),
                        program.conducting.map(|m| m.to_string()),
                        program.chorister.map(|m| m.to_string()),
                        program.organist.map(|m| m.to_string()),
                        opening,
                        sacrament,
                        intermediate,
                        closing,
                        program.opening_prayer.map(|m| m.to_string()),
                        program.closing_prayer.map(|m| m.to_string()),
                        speakers,
                        program.announcements,
                        program.stake_business,
                        program.ward_business,
                        program.greeter,
                        program.include_bearing_of_testimonies,
                        program.second_hour_type,
                        program.second_hour_other_text,
                        format_datetime(&program.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "Program",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", schema::USER_COLUMNS);
        self.select_one(sql, id.to_string(), row_to_user).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE email = ?1",
            schema::USER_COLUMNS
        );
        self.select_one(sql, email.trim().to_lowercase(), row_to_user)
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users ORDER BY (role = 'admin') DESC, email",
            schema::USER_COLUMNS
        );
        self.select_many(sql, Vec::new(), row_to_user).await
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        let email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        user.id.to_string(),
                        user.email,
                        user.password_hash,
                        user.role.as_str(),
                        user.member_id.map(|m| m.to_string()),
                        format_datetime(&user.created_at),
                        format_datetime(&user.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "User", email))
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let user = user.clone();
        let id = user.id;

        let changed = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::UPDATE_USER,
                    rusqlite::params![
                        user.id.to_string(),
                        user.email,
                        user.password_hash,
                        user.role.as_str(),
                        user.member_id.map(|m| m.to_string()),
                        format_datetime(&user.updated_at),
                    ],
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(query_failed)?;

        if changed == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
