use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use steeple_core::directory::NOTES_MAX_LEN;
use steeple_core::serde::deserialize_optional_string;

/// One parsed row of the bulk attendance form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceMark {
    pub member_id: Uuid,
    pub present: bool,
    pub notes: String,
}

/// The bulk "take attendance" submission: a `date` field, a `member_ids`
/// row marker per listed member, and dynamic `present_<id>` / `notes_<id>`
/// fields. Checkboxes are absent when unchecked, so the row markers decide
/// which members the sheet covers.
#[derive(Debug, Clone, Default)]
pub struct AttendanceSheet {
    pub date: Option<NaiveDate>,
    pub marks: Vec<AttendanceMark>,
}

impl AttendanceSheet {
    /// Parses the raw urlencoded fields. Rows with an unparseable member id
    /// are skipped; overlong notes are truncated.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let date = fields
            .get("date")
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

        let mut marks = Vec::new();
        let mut member_keys: Vec<&String> = fields
            .keys()
            .filter(|k| k.starts_with("member_"))
            .collect();
        member_keys.sort();

        for key in member_keys {
            let Ok(member_id) = key["member_".len()..].parse::<Uuid>() else {
                continue;
            };

            let present = fields.contains_key(&format!("present_{member_id}"));
            let notes: String = fields
                .get(&format!("notes_{member_id}"))
                .map(|n| n.trim().chars().take(NOTES_MAX_LEN).collect())
                .unwrap_or_default();

            marks.push(AttendanceMark {
                member_id,
                present,
                notes,
            });
        }

        Self { date, marks }
    }
}

/// The self check-in form.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CheckinForm {
    #[serde(default)]
    pub meeting_type: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sheet_parses_rows_and_date() {
        let id = Uuid::new_v4();
        let member_key = format!("member_{id}");
        let present_key = format!("present_{id}");
        let notes_key = format!("notes_{id}");
        let sheet = AttendanceSheet::from_fields(&fields(&[
            ("date", "2025-06-08"),
            (member_key.as_str(), "1"),
            (present_key.as_str(), "on"),
            (notes_key.as_str(), "  visiting family  "),
        ]));

        assert_eq!(sheet.date, NaiveDate::from_ymd_opt(2025, 6, 8));
        assert_eq!(
            sheet.marks,
            vec![AttendanceMark {
                member_id: id,
                present: true,
                notes: "visiting family".to_string(),
            }]
        );
    }

    #[test]
    fn test_unchecked_row_is_absent_not_present() {
        let id = Uuid::new_v4();
        let member_key = format!("member_{id}");
        let sheet = AttendanceSheet::from_fields(&fields(&[
            ("date", "2025-06-08"),
            (member_key.as_str(), "1"),
        ]));

        assert_eq!(sheet.marks.len(), 1);
        assert!(!sheet.marks[0].present);
    }

    #[test]
    fn test_bad_date_and_bad_ids_are_skipped() {
        let sheet = AttendanceSheet::from_fields(&fields(&[
            ("date", "june 8"),
            ("member_not-a-uuid", "1"),
        ]));

        assert_eq!(sheet.date, None);
        assert!(sheet.marks.is_empty());
    }

    #[test]
    fn test_notes_truncated() {
        let id = Uuid::new_v4();
        let long = "n".repeat(600);
        let member_key = format!("member_{id}");
        let notes_key = format!("notes_{id}");
        let sheet = AttendanceSheet::from_fields(&fields(&[
            (member_key.as_str(), "1"),
            (notes_key.as_str(), long.as_str()),
        ]));

        assert_eq!(sheet.marks[0].notes.len(), NOTES_MAX_LEN);
    }
}
