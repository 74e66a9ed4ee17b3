//! In-memory repository implementation.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use steeple_core::calendar::Event;
use steeple_core::directory::{AttendanceRecord, Calling, Member, User};
use steeple_core::program::Program;
use steeple_core::storage::{
    AttendanceRepository, CallingRepository, DateRange, EventRepository, MemberQuery,
    MemberRepository, MemberSort, ProgramRepository, RepositoryError, Result, UserRepository,
};

/// In-memory storage backend.
///
/// HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access. Data is not
/// persisted and is lost when the repository is dropped; the default
/// deployment reseeds demo data at startup.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
    members: Arc<RwLock<HashMap<Uuid, Member>>>,
    callings: Arc<RwLock<HashMap<Uuid, Calling>>>,
    attendance: Arc<RwLock<HashMap<(Uuid, NaiveDate), AttendanceRecord>>>,
    programs: Arc<RwLock<HashMap<Uuid, Program>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
            members: Arc::new(RwLock::new(HashMap::new())),
            callings: Arc::new(RwLock::new(HashMap::new())),
            attendance: Arc::new(RwLock::new(HashMap::new())),
            programs: Arc::new(RwLock::new(HashMap::new())),
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// Events sort by date, then time; untimed events come before timed ones on
/// the same day.
fn event_sort_key(event: &Event) -> (NaiveDate, Option<chrono::NaiveTime>) {
    (event.start_date, event.start_time)
}

fn member_matches(member: &Member, search: &str) -> bool {
    let needle = search.to_lowercase();
    member.first_name.to_lowercase().contains(&needle)
        || member.last_name.to_lowercase().contains(&needle)
        || member
            .email
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&needle))
        || member.phone.as_deref().is_some_and(|p| p.contains(&needle))
}

fn compare_members(a: &Member, b: &Member, sort: MemberSort) -> Ordering {
    let last = |m: &Member| m.last_name.to_lowercase();
    let first = |m: &Member| m.first_name.to_lowercase();

    match sort {
        MemberSort::LastAsc => (last(a), first(a)).cmp(&(last(b), first(b))),
        MemberSort::LastDesc => (last(b), first(b)).cmp(&(last(a), first(a))),
        MemberSort::FirstAsc => (first(a), last(a)).cmp(&(first(b), last(b))),
        MemberSort::FirstDesc => (first(b), last(b)).cmp(&(first(a), last(a))),
        MemberSort::Gender => {
            (a.gender.as_str(), last(a), first(a)).cmp(&(b.gender.as_str(), last(b), first(b)))
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut all: Vec<Event> = events.values().cloned().collect();
        all.sort_by_key(event_sort_key);
        Ok(all)
    }

    async fn events_in_range(&self, range: DateRange) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut matching: Vec<Event> = events
            .values()
            .filter(|e| range.contains(e.start_date))
            .cloned()
            .collect();
        matching.sort_by_key(event_sort_key);
        Ok(matching)
    }

    async fn upcoming_events(&self, from: NaiveDate, limit: usize) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        let mut upcoming: Vec<Event> = events
            .values()
            .filter(|e| e.start_date >= from)
            .cloned()
            .collect();
        upcoming.sort_by_key(event_sort_key);
        upcoming.truncate(limit);
        Ok(upcoming)
    }

    async fn create_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if !events.contains_key(&event.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: event.id.to_string(),
            });
        }
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn delete_event(&self, id: Uuid) -> Result<()> {
        let mut events = self.events.write().await;
        if events.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Event",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MemberRepository for InMemoryRepository {
    async fn get_member(&self, id: Uuid) -> Result<Option<Member>> {
        let members = self.members.read().await;
        Ok(members.get(&id).cloned())
    }

    async fn get_members(&self, ids: &[Uuid]) -> Result<Vec<Member>> {
        let members = self.members.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| members.get(id).cloned())
            .collect())
    }

    async fn list_members(&self, query: &MemberQuery) -> Result<Vec<Member>> {
        let members = self.members.read().await;
        let mut listed: Vec<Member> = members
            .values()
            .filter(|m| {
                query
                    .search
                    .as_deref()
                    .map(|s| member_matches(m, s))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        listed.sort_by(|a, b| compare_members(a, b, query.sort));
        Ok(listed)
    }

    async fn create_member(&self, member: &Member) -> Result<()> {
        let mut members = self.members.write().await;
        if members.contains_key(&member.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Member",
                id: member.id.to_string(),
            });
        }
        members.insert(member.id, member.clone());
        Ok(())
    }

    async fn update_member(&self, member: &Member) -> Result<()> {
        let mut members = self.members.write().await;
        if !members.contains_key(&member.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Member",
                id: member.id.to_string(),
            });
        }
        members.insert(member.id, member.clone());
        Ok(())
    }

    async fn delete_member(&self, id: Uuid) -> Result<()> {
        let mut members = self.members.write().await;
        if members.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Member",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CallingRepository for InMemoryRepository {
    async fn get_calling(&self, id: Uuid) -> Result<Option<Calling>> {
        let callings = self.callings.read().await;
        Ok(callings.get(&id).cloned())
    }

    async fn list_callings(&self) -> Result<Vec<Calling>> {
        let callings = self.callings.read().await;
        let mut all: Vec<Calling> = callings.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.organization.to_lowercase(), a.title.to_lowercase())
                .cmp(&(b.organization.to_lowercase(), b.title.to_lowercase()))
        });
        Ok(all)
    }

    async fn create_calling(&self, calling: &Calling) -> Result<()> {
        let mut callings = self.callings.write().await;
        if callings.contains_key(&calling.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Calling",
                id: calling.id.to_string(),
            });
        }
        callings.insert(calling.id, calling.clone());
        Ok(())
    }

    async fn update_calling(&self, calling: &Calling) -> Result<()> {
        let mut callings = self.callings.write().await;
        if !callings.contains_key(&calling.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Calling",
                id: calling.id.to_string(),
            });
        }
        callings.insert(calling.id, calling.clone());
        Ok(())
    }

    async fn delete_calling(&self, id: Uuid) -> Result<()> {
        let mut callings = self.callings.write().await;
        if callings.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Calling",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn get_record(
        &self,
        member_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        Ok(attendance.get(&(member_id, date)).cloned())
    }

    async fn records_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        Ok(attendance
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    async fn upsert_record(&self, record: &AttendanceRecord) -> Result<()> {
        let mut attendance = self.attendance.write().await;
        attendance.insert((record.member_id, record.date), record.clone());
        Ok(())
    }

    async fn history(&self) -> Result<Vec<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        let mut all: Vec<AttendanceRecord> = attendance.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date).then(a.member_id.cmp(&b.member_id)));
        Ok(all)
    }

    async fn member_history(&self, member_id: Uuid) -> Result<Vec<AttendanceRecord>> {
        let attendance = self.attendance.read().await;
        let mut records: Vec<AttendanceRecord> = attendance
            .values()
            .filter(|r| r.member_id == member_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn delete_for_member(&self, member_id: Uuid) -> Result<()> {
        let mut attendance = self.attendance.write().await;
        attendance.retain(|(member, _), _| *member != member_id);
        Ok(())
    }
}

#[async_trait]
impl ProgramRepository for InMemoryRepository {
    async fn get_program(&self, id: Uuid) -> Result<Option<Program>> {
        let programs = self.programs.read().await;
        Ok(programs.get(&id).cloned())
    }

    async fn list_programs(&self) -> Result<Vec<Program>> {
        let programs = self.programs.read().await;
        let mut all: Vec<Program> = programs.values().cloned().collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }

    async fn create_program(&self, program: &Program) -> Result<()> {
        let mut programs = self.programs.write().await;
        if programs.contains_key(&program.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Program",
                id: program.id.to_string(),
            });
        }
        programs.insert(program.id, program.clone());
        Ok(())
    }

    async fn update_program(&self, program: &Program) -> Result<()> {
        let mut programs = self.programs.write().await;
        if !programs.contains_key(&program.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Program",
                id: program.id.to_string(),
            });
        }
        programs.insert(program.id, program.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let needle = email.trim().to_lowercase();
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email == needle).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        // Admins first, then ascending by email.
        all.sort_by(|a, b| {
            b.role
                .is_admin()
                .cmp(&a.role.is_admin())
                .then_with(|| a.email.cmp(&b.email))
        });
        Ok(all)
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "User",
                id: user.id.to_string(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use steeple_core::directory::{Gender, Role};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[tokio::test]
    async fn test_event_create_and_get() {
        let repo = InMemoryRepository::new();
        let event = Event::new("Ward Council", date(2025, 6, 15));

        repo.create_event(&event).await.unwrap();

        let retrieved = repo.get_event(event.id).await.unwrap();
        assert_eq!(retrieved, Some(event));
    }

    #[tokio::test]
    async fn test_event_update_nonexistent() {
        let repo = InMemoryRepository::new();
        let event = Event::new("Ward Council", date(2025, 6, 15));

        let result = repo.update_event(&event).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_event_delete() {
        let repo = InMemoryRepository::new();
        let event = Event::new("Ward Council", date(2025, 6, 15));

        repo.create_event(&event).await.unwrap();
        repo.delete_event(event.id).await.unwrap();

        assert!(repo.get_event(event.id).await.unwrap().is_none());
        let result = repo.delete_event(event.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_events_in_range_sorted_by_date_then_time() {
        let repo = InMemoryRepository::new();
        let later = Event::new("Evening Fireside", date(2025, 6, 8))
            .with_time(NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        let earlier = Event::new("Sacrament Meeting", date(2025, 6, 8))
            .with_time(NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        let outside = Event::new("July Activity", date(2025, 7, 1));

        repo.create_event(&later).await.unwrap();
        repo.create_event(&earlier).await.unwrap();
        repo.create_event(&outside).await.unwrap();

        let range = DateRange::month(2025, 6).unwrap();
        let events = repo.events_in_range(range).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, earlier.id);
        assert_eq!(events[1].id, later.id);
    }

    #[tokio::test]
    async fn test_upcoming_events_limit() {
        let repo = InMemoryRepository::new();
        for day in 1..=5 {
            repo.create_event(&Event::new(format!("Event {day}"), date(2025, 6, day)))
                .await
                .unwrap();
        }

        let upcoming = repo.upcoming_events(date(2025, 6, 2), 3).await.unwrap();
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[0].start_date, date(2025, 6, 2));
    }

    #[tokio::test]
    async fn test_member_search_and_sort() {
        let repo = InMemoryRepository::new();
        let adams = Member::new("Zoe", "Adams").with_email("zoe@example.com");
        let brooks = Member::new("Amy", "Brooks");
        let call = Member::new("Ben", "Call");

        repo.create_member(&adams).await.unwrap();
        repo.create_member(&brooks).await.unwrap();
        repo.create_member(&call).await.unwrap();

        let all = repo.list_members(&MemberQuery::default()).await.unwrap();
        let last_names: Vec<&str> = all.iter().map(|m| m.last_name.as_str()).collect();
        assert_eq!(last_names, vec!["Adams", "Brooks", "Call"]);

        let found = repo
            .list_members(&MemberQuery {
                search: Some("zoe@".to_string()),
                sort: MemberSort::LastAsc,
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, adams.id);

        let by_first = repo
            .list_members(&MemberQuery::sorted(MemberSort::FirstAsc))
            .await
            .unwrap();
        assert_eq!(by_first[0].first_name, "Amy");
    }

    #[tokio::test]
    async fn test_member_gender_sort_groups() {
        let repo = InMemoryRepository::new();
        let sister = Member::new("Ann", "Young").with_gender(Gender::Female);
        let brother = Member::new("Bob", "Allen").with_gender(Gender::Male);

        repo.create_member(&sister).await.unwrap();
        repo.create_member(&brother).await.unwrap();

        let sorted = repo
            .list_members(&MemberQuery::sorted(MemberSort::Gender))
            .await
            .unwrap();
        // "female" sorts before "male".
        assert_eq!(sorted[0].id, sister.id);
    }

    #[tokio::test]
    async fn test_get_members_skips_missing_ids() {
        let repo = InMemoryRepository::new();
        let member = Member::new("June", "Parker");
        repo.create_member(&member).await.unwrap();

        let found = repo
            .get_members(&[member.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_callings_sorted_by_organization_then_title() {
        let repo = InMemoryRepository::new();
        let clerk = Calling::new("Ward Clerk", "Bishopric");
        let teacher = Calling::new("Teacher", "Sunday School");
        let president = Calling::new("President", "Sunday School");

        repo.create_calling(&teacher).await.unwrap();
        repo.create_calling(&clerk).await.unwrap();
        repo.create_calling(&president).await.unwrap();

        let all = repo.list_callings().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Ward Clerk", "President", "Teacher"]);
    }

    #[tokio::test]
    async fn test_attendance_upsert_replaces() {
        let repo = InMemoryRepository::new();
        let member_id = Uuid::new_v4();
        let day = date(2025, 6, 8);

        let first = AttendanceRecord::new(member_id, day, true);
        repo.upsert_record(&first).await.unwrap();

        let mut second = AttendanceRecord::new(member_id, day, false);
        second.notes = "Out of town".to_string();
        repo.upsert_record(&second).await.unwrap();

        let records = repo.records_for_date(day).await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].present);
        assert_eq!(records[0].notes, "Out of town");
    }

    #[tokio::test]
    async fn test_attendance_history_newest_first() {
        let repo = InMemoryRepository::new();
        let member_id = Uuid::new_v4();

        repo.upsert_record(&AttendanceRecord::new(member_id, date(2025, 6, 1), true))
            .await
            .unwrap();
        repo.upsert_record(&AttendanceRecord::new(member_id, date(2025, 6, 8), false))
            .await
            .unwrap();

        let history = repo.member_history(member_id).await.unwrap();
        assert_eq!(history[0].date, date(2025, 6, 8));
        assert_eq!(history[1].date, date(2025, 6, 1));
    }

    #[tokio::test]
    async fn test_attendance_delete_for_member() {
        let repo = InMemoryRepository::new();
        let member_id = Uuid::new_v4();
        let other_id = Uuid::new_v4();

        repo.upsert_record(&AttendanceRecord::new(member_id, date(2025, 6, 1), true))
            .await
            .unwrap();
        repo.upsert_record(&AttendanceRecord::new(other_id, date(2025, 6, 1), true))
            .await
            .unwrap();

        repo.delete_for_member(member_id).await.unwrap();

        assert!(repo.member_history(member_id).await.unwrap().is_empty());
        assert_eq!(repo.member_history(other_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_programs_listed_newest_first() {
        let repo = InMemoryRepository::new();
        let older = Program::new(date(2025, 6, 1));
        let newer = Program::new(date(2025, 6, 8));

        repo.create_program(&older).await.unwrap();
        repo.create_program(&newer).await.unwrap();

        let all = repo.list_programs().await.unwrap();
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);
    }

    #[tokio::test]
    async fn test_user_duplicate_email_rejected() {
        let repo = InMemoryRepository::new();
        let first = User::new("sue@example.com", "hash");
        let second = User::new("Sue@Example.com", "other-hash");

        repo.create_user(&first).await.unwrap();
        let result = repo.create_user(&second).await;
        assert!(matches!(result, Err(RepositoryError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_user_email_lookup_is_case_insensitive() {
        let repo = InMemoryRepository::new();
        let user = User::new("sue@example.com", "hash");
        repo.create_user(&user).await.unwrap();

        let found = repo.get_user_by_email(" Sue@Example.COM ").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_users_listed_admins_first() {
        let repo = InMemoryRepository::new();
        let member = User::new("zeke@example.com", "hash");
        let admin = User::new("admin@example.com", "hash").with_role(Role::Admin);

        repo.create_user(&member).await.unwrap();
        repo.create_user(&admin).await.unwrap();

        let all = repo.list_users().await.unwrap();
        assert_eq!(all[0].id, admin.id);
    }
}
