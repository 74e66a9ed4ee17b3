//! Form-field deserializers.
//!
//! HTML forms submit untouched optional inputs as empty strings. The
//! adapters here turn those into `None` at the serde boundary, so form
//! structs for fields with no validation-message path (the program
//! editor's theme and date, check-in notes) hold real `Option`s. Fields
//! whose parse failures must come back as form errors — the event form's
//! date and time — stay raw strings and go through the validation helpers
//! instead.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Trims the submitted value and drops it entirely when nothing is left.
fn submitted_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// An optional text field: empty or whitespace-only submissions become
/// `None`, everything else arrives trimmed.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    submitted_value(deserializer)
}

/// An optional `YYYY-MM-DD` field: empty submissions become `None`, and a
/// value that is present must parse. Date inputs only ever submit empty or
/// ISO dates, so a parse failure here means a hand-crafted request.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match submitted_value(deserializer)? {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The shape the program editor's optional fields come in as.
    #[derive(Debug, Deserialize, PartialEq)]
    struct EditorFields {
        #[serde(default, deserialize_with = "deserialize_optional_string")]
        theme: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date: Option<NaiveDate>,
    }

    fn parse(json: &str) -> EditorFields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_untouched_fields_become_none() {
        assert_eq!(
            parse(r#"{"theme": "", "date": ""}"#),
            EditorFields {
                theme: None,
                date: None,
            }
        );
        assert_eq!(
            parse("{}"),
            EditorFields {
                theme: None,
                date: None,
            }
        );
    }

    #[test]
    fn test_whitespace_counts_as_untouched() {
        assert_eq!(parse(r#"{"theme": "   "}"#).theme, None);
    }

    #[test]
    fn test_submitted_values_arrive_trimmed() {
        let fields = parse(r#"{"theme": "  Gratitude ", "date": "2025-06-08"}"#);
        assert_eq!(fields.theme.as_deref(), Some("Gratitude"));
        assert_eq!(fields.date, NaiveDate::from_ymd_opt(2025, 6, 8));
    }

    #[test]
    fn test_date_tolerates_surrounding_whitespace() {
        assert_eq!(
            parse(r#"{"date": " 2025-06-08 "}"#).date,
            NaiveDate::from_ymd_opt(2025, 6, 8)
        );
    }

    #[test]
    fn test_present_but_malformed_date_is_rejected() {
        let result: Result<EditorFields, _> = serde_json::from_str(r#"{"date": "June 8th"}"#);
        assert!(result.is_err());
    }
}
