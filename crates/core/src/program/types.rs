use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::Member;

pub const DEFAULT_PROGRAM_TITLE: &str = "Sacrament Meeting";
pub const DEFAULT_SECOND_HOUR: &str = "Sunday School";

/// A numbered hymn reference. Both fields are always non-empty; a form
/// submission with only one of the two is treated as no hymn at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    pub number: String,
    pub title: String,
}

impl Hymn {
    /// Builds a hymn from the paired form fields. Returns `None` unless
    /// both trim to something non-empty.
    pub fn from_form(number: &str, title: &str) -> Option<Self> {
        let number = number.trim();
        let title = title.trim();
        if number.is_empty() || title.is_empty() {
            return None;
        }
        Some(Self {
            number: number.to_string(),
            title: title.to_string(),
        })
    }
}

/// One entry in the speaking order. Either a directory member or a
/// free-text name; `order` drives the rendered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Speaker {
    pub member_id: Option<Uuid>,
    pub other_name: Option<String>,
    pub topic: Option<String>,
    pub order: Option<i32>,
}

/// The stored program document. Member roles hold references only; the
/// handler layer resolves them into a [`ResolvedProgram`] before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    pub theme: Option<String>,

    pub presiding: Option<Uuid>,
    pub conducting: Option<Uuid>,
    pub chorister: Option<Uuid>,
    pub organist: Option<Uuid>,

    pub opening_hymn: Option<Hymn>,
    pub sacrament_hymn: Option<Hymn>,
    pub intermediate_hymn: Option<Hymn>,
    pub closing_hymn: Option<Hymn>,

    pub opening_prayer: Option<Uuid>,
    pub closing_prayer: Option<Uuid>,

    pub speakers: Vec<Speaker>,

    pub announcements: String,
    pub stake_business: String,
    pub ward_business: String,
    pub greeter: String,

    pub include_bearing_of_testimonies: bool,

    pub second_hour_type: String,
    pub second_hour_other_text: String,

    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// Creates an empty program for the given meeting date.
    pub fn new(date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_PROGRAM_TITLE.to_string(),
            date,
            theme: None,
            presiding: None,
            conducting: None,
            chorister: None,
            organist: None,
            opening_hymn: None,
            sacrament_hymn: None,
            intermediate_hymn: None,
            closing_hymn: None,
            opening_prayer: None,
            closing_prayer: None,
            speakers: Vec::new(),
            announcements: String::new(),
            stake_business: String::new(),
            ward_business: String::new(),
            greeter: String::new(),
            include_bearing_of_testimonies: false,
            second_hour_type: DEFAULT_SECOND_HOUR.to_string(),
            second_hour_other_text: String::new(),
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Every member id this program references, for batch resolution.
    pub fn referenced_member_ids(&self) -> Vec<Uuid> {
        self.presiding
            .iter()
            .chain(self.conducting.iter())
            .chain(self.chorister.iter())
            .chain(self.organist.iter())
            .chain(self.opening_prayer.iter())
            .chain(self.closing_prayer.iter())
            .chain(self.speakers.iter().filter_map(|s| s.member_id.as_ref()))
            .copied()
            .collect()
    }
}

/// A speaker with its member reference swapped for the loaded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpeaker {
    pub speaker: Speaker,
    pub member: Option<Member>,
}

/// A program with every member reference dereferenced, as the renderer and
/// the show template consume it. Missing members simply stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgram {
    pub program: Program,
    pub presiding: Option<Member>,
    pub conducting: Option<Member>,
    pub chorister: Option<Member>,
    pub organist: Option<Member>,
    pub opening_prayer: Option<Member>,
    pub closing_prayer: Option<Member>,
    pub speakers: Vec<ResolvedSpeaker>,
}

impl ResolvedProgram {
    /// Wraps a program with nothing resolved; tests and empty programs use
    /// this directly.
    pub fn unresolved(program: Program) -> Self {
        let speakers = program
            .speakers
            .iter()
            .cloned()
            .map(|speaker| ResolvedSpeaker {
                speaker,
                member: None,
            })
            .collect();
        Self {
            program,
            presiding: None,
            conducting: None,
            chorister: None,
            organist: None,
            opening_prayer: None,
            closing_prayer: None,
            speakers,
        }
    }
}

/// Who a speaker entry actually names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerIdentity<'a> {
    Member(&'a Member),
    FreeText(&'a str),
    Unnamed,
}

impl<'a> SpeakerIdentity<'a> {
    /// Classifies a resolved speaker. Free text wins over a member
    /// reference, matching the edit form's precedence.
    pub fn of(resolved: &'a ResolvedSpeaker) -> Self {
        if let Some(name) = resolved.speaker.other_name.as_deref() {
            if !name.trim().is_empty() {
                return SpeakerIdentity::FreeText(name);
            }
        }
        match resolved.member.as_ref() {
            Some(member) if !member.full_name().is_empty() => SpeakerIdentity::Member(member),
            _ => SpeakerIdentity::Unnamed,
        }
    }

    /// Display string, with the 1-indexed positional fallback for unnamed
    /// speakers.
    pub fn display_name(&self, index: usize) -> String {
        match self {
            SpeakerIdentity::Member(member) => member.full_name(),
            SpeakerIdentity::FreeText(name) => name.trim().to_string(),
            SpeakerIdentity::Unnamed => format!("Speaker {}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hymn_from_form_requires_both_fields() {
        assert_eq!(
            Hymn::from_form("3", "Nearer My God to Thee"),
            Some(Hymn {
                number: "3".to_string(),
                title: "Nearer My God to Thee".to_string(),
            })
        );
        assert_eq!(Hymn::from_form("3", ""), None);
        assert_eq!(Hymn::from_form("", "Nearer My God to Thee"), None);
        assert_eq!(Hymn::from_form("  ", "  "), None);
    }

    #[test]
    fn test_new_program_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        let program = Program::new(date);
        assert_eq!(program.title, "Sacrament Meeting");
        assert_eq!(program.second_hour_type, "Sunday School");
        assert!(program.speakers.is_empty());
        assert!(!program.include_bearing_of_testimonies);
    }

    #[test]
    fn test_referenced_member_ids_collects_roles_and_speakers() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 8).unwrap();
        let mut program = Program::new(date);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        program.presiding = Some(a);
        program.speakers.push(Speaker {
            member_id: Some(b),
            ..Default::default()
        });
        program.speakers.push(Speaker::default());

        let ids = program.referenced_member_ids();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_speaker_identity_precedence() {
        let member = Member::new("June", "Parker");
        let resolved = ResolvedSpeaker {
            speaker: Speaker {
                other_name: Some("Brother Lee".to_string()),
                ..Default::default()
            },
            member: Some(member.clone()),
        };
        assert_eq!(
            SpeakerIdentity::of(&resolved).display_name(0),
            "Brother Lee"
        );

        let resolved = ResolvedSpeaker {
            speaker: Speaker::default(),
            member: Some(member),
        };
        assert_eq!(
            SpeakerIdentity::of(&resolved).display_name(0),
            "June Parker"
        );

        let resolved = ResolvedSpeaker {
            speaker: Speaker::default(),
            member: None,
        };
        assert_eq!(SpeakerIdentity::of(&resolved).display_name(2), "Speaker 3");
    }

    #[test]
    fn test_blank_member_name_falls_back_to_position() {
        let resolved = ResolvedSpeaker {
            speaker: Speaker::default(),
            member: Some(Member::new("", "")),
        };
        assert_eq!(SpeakerIdentity::of(&resolved).display_name(0), "Speaker 1");
    }
}
