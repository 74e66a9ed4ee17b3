use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::calendar::Event;
use crate::directory::{AttendanceRecord, Calling, Member, User};
use crate::program::Program;

use super::{DateRange, MemberQuery, Result};

/// Repository for calendar events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>>;

    /// All events, ascending by date then time.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Events inside the range, ascending by date then time. The calendar
    /// grid builder relies on this ordering.
    async fn events_in_range(&self, range: DateRange) -> Result<Vec<Event>>;

    /// The next `limit` events on or after `from`, ascending.
    async fn upcoming_events(&self, from: NaiveDate, limit: usize) -> Result<Vec<Event>>;

    async fn create_event(&self, event: &Event) -> Result<()>;

    async fn update_event(&self, event: &Event) -> Result<()>;

    async fn delete_event(&self, id: Uuid) -> Result<()>;
}

/// Repository for directory members.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn get_member(&self, id: Uuid) -> Result<Option<Member>>;

    /// Members for the given ids; missing ids are silently skipped.
    async fn get_members(&self, ids: &[Uuid]) -> Result<Vec<Member>>;

    /// Filtered and sorted directory listing.
    async fn list_members(&self, query: &MemberQuery) -> Result<Vec<Member>>;

    async fn create_member(&self, member: &Member) -> Result<()>;

    async fn update_member(&self, member: &Member) -> Result<()>;

    async fn delete_member(&self, id: Uuid) -> Result<()>;
}

/// Repository for callings.
#[async_trait]
pub trait CallingRepository: Send + Sync {
    async fn get_calling(&self, id: Uuid) -> Result<Option<Calling>>;

    /// All callings, ascending by organization then title.
    async fn list_callings(&self) -> Result<Vec<Calling>>;

    async fn create_calling(&self, calling: &Calling) -> Result<()>;

    async fn update_calling(&self, calling: &Calling) -> Result<()>;

    async fn delete_calling(&self, id: Uuid) -> Result<()>;
}

/// Repository for attendance records. Uniqueness on (member, date) is this
/// trait's contract: `upsert_record` replaces any existing record for the
/// same member and date.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn get_record(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>>;

    /// All records for one date.
    async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>>;

    async fn upsert_record(&self, record: &AttendanceRecord) -> Result<()>;

    /// Full history, newest dates first.
    async fn history(&self) -> Result<Vec<AttendanceRecord>>;

    /// One member's history, newest dates first.
    async fn member_history(&self, member_id: Uuid) -> Result<Vec<AttendanceRecord>>;

    /// Removes every record for a member; used when the member is deleted.
    async fn delete_for_member(&self, member_id: Uuid) -> Result<()>;
}

/// Repository for sacrament programs.
#[async_trait]
pub trait ProgramRepository: Send + Sync {
    async fn get_program(&self, id: Uuid) -> Result<Option<Program>>;

    /// All programs, newest meeting date first.
    async fn list_programs(&self) -> Result<Vec<Program>>;

    async fn create_program(&self, program: &Program) -> Result<()>;

    async fn update_program(&self, program: &Program) -> Result<()>;
}

/// Repository for login accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Case-insensitive email lookup.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// All users, admins first, then ascending by email.
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn create_user(&self, user: &User) -> Result<()>;

    async fn update_user(&self, user: &User) -> Result<()>;
}
