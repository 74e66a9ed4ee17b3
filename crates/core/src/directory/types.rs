use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attendance and calling notes are capped at this many characters.
pub const NOTES_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl Gender {
    /// Parses a form value. Unknown values fall back to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            "other" => Gender::Other,
            _ => Gender::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::Unknown => "unknown",
        }
    }
}

/// A member of the ward directory. Referenced (never owned) by programs,
/// callings, attendance records, and login accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
    /// Path to an uploaded portrait, when one exists.
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            gender: Gender::Unknown,
            photo: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// First and last name space-joined, trimmed. Empty when both are blank.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A volunteer assignment held by a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calling {
    pub id: Uuid,
    pub title: String,
    pub organization: String,
    pub member_id: Option<Uuid>,
    pub notes: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Calling {
    pub fn new(title: impl Into<String>, organization: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            organization: organization.into(),
            member_id: None,
            notes: String::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_member(mut self, member_id: Uuid) -> Self {
        self.member_id = Some(member_id);
        self
    }
}

/// Which meeting a self check-in was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    ElderQuorum,
    ReliefSociety,
    SundaySchool,
    #[default]
    Other,
}

impl MeetingType {
    /// Parses a form value. Unknown values fall back to `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "elder_quorum" => MeetingType::ElderQuorum,
            "relief_society" => MeetingType::ReliefSociety,
            "sunday_school" => MeetingType::SundaySchool,
            _ => MeetingType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::ElderQuorum => "elder_quorum",
            MeetingType::ReliefSociety => "relief_society",
            MeetingType::SundaySchool => "sunday_school",
            MeetingType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingType::ElderQuorum => "Elders Quorum",
            MeetingType::ReliefSociety => "Relief Society",
            MeetingType::SundaySchool => "Sunday School",
            MeetingType::Other => "Other",
        }
    }
}

/// One member's attendance on one date. The stores enforce uniqueness on
/// (member, date) with upsert semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    pub date: NaiveDate,
    pub present: bool,
    pub meeting_type: MeetingType,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn new(member_id: Uuid, date: NaiveDate, present: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            member_id,
            date,
            present,
            meeting_type: MeetingType::Other,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    /// Parses a form value; `None` for anything but the two known roles.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "member" => Some(Role::Member),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// A login account, optionally linked to a directory member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Stored lowercased; unique across accounts.
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub member_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into().to_lowercase(),
            password_hash: password_hash.into(),
            role: Role::Member,
            member_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_member(mut self, member_id: Uuid) -> Self {
        self.member_id = Some(member_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_trims() {
        let member = Member::new("June", "Parker");
        assert_eq!(member.full_name(), "June Parker");

        let blank = Member::new("", "");
        assert_eq!(blank.full_name(), "");

        let only_first = Member::new("June", "");
        assert_eq!(only_first.full_name(), "June");
    }

    #[test]
    fn test_gender_parse_fallback() {
        assert_eq!(Gender::parse("female"), Gender::Female);
        assert_eq!(Gender::parse("  male "), Gender::Male);
        assert_eq!(Gender::parse("robot"), Gender::Unknown);
        assert_eq!(Gender::parse(""), Gender::Unknown);
    }

    #[test]
    fn test_meeting_type_parse_fallback() {
        assert_eq!(MeetingType::parse("relief_society"), MeetingType::ReliefSociety);
        assert_eq!(MeetingType::parse("bingo"), MeetingType::Other);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("member"), Some(Role::Member));
        assert_eq!(Role::parse("leader"), None);
    }

    #[test]
    fn test_user_email_lowercased() {
        let user = User::new("Sue@Example.COM", "hash");
        assert_eq!(user.email, "sue@example.com");
    }
}
