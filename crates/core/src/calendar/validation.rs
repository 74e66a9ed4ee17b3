use chrono::{NaiveDate, NaiveTime};

use super::types::Recurrence;
use crate::validation::Validated;

/// Raw event form fields, exactly as submitted.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub start_date: String,
    pub start_time: String,
    pub location: String,
    pub recurrence: String,
}

/// Trimmed and parsed event fields, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanEvent {
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub location: String,
    pub recurrence: Recurrence,
}

/// Validates the event form. `start_date` stays `None` when missing or
/// unparseable, with a matching error pushed.
pub fn validate_event_input(input: &EventInput) -> Validated<CleanEvent> {
    let mut errors = Vec::new();

    let title = input.title.trim().to_string();
    let description = input.description.trim().to_string();
    let location = input.location.trim().to_string();
    let raw_date = input.start_date.trim();
    let raw_time = input.start_time.trim();

    if title.is_empty() {
        errors.push("Event title is required.".to_string());
    } else if title.len() < 2 || title.len() > 120 {
        errors.push("Event title must be between 2 and 120 characters.".to_string());
    }

    let start_date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").ok();
    if start_date.is_none() {
        errors.push("A valid event date is required.".to_string());
    }

    let start_time = if raw_time.is_empty() {
        None
    } else {
        match NaiveTime::parse_from_str(raw_time, "%H:%M") {
            Ok(time) => Some(time),
            Err(_) => {
                errors.push("Event time must be in HH:MM format.".to_string());
                None
            }
        }
    };

    if description.len() > 1000 {
        errors.push("Description must be 1000 characters or fewer.".to_string());
    }

    if location.len() > 200 {
        errors.push("Location must be 200 characters or fewer.".to_string());
    }

    Validated {
        errors,
        cleaned: CleanEvent {
            title,
            description,
            start_date,
            start_time,
            location,
            recurrence: Recurrence::parse(&input.recurrence),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> EventInput {
        EventInput {
            title: "Ward Activity".to_string(),
            description: "Dinner and games".to_string(),
            start_date: "2025-06-20".to_string(),
            start_time: "18:30".to_string(),
            location: "Cultural hall".to_string(),
            recurrence: "none".to_string(),
        }
    }

    #[test]
    fn test_valid_event_passes() {
        let result = validate_event_input(&valid_input());
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert_eq!(
            result.cleaned.start_date,
            NaiveDate::from_ymd_opt(2025, 6, 20)
        );
        assert_eq!(
            result.cleaned.start_time,
            NaiveTime::from_hms_opt(18, 30, 0)
        );
    }

    #[test]
    fn test_missing_title_and_date() {
        let input = EventInput::default();
        let result = validate_event_input(&input);
        assert!(result.errors.iter().any(|e| e.contains("title")));
        assert!(result.errors.iter().any(|e| e.contains("date")));
        assert_eq!(result.cleaned.start_date, None);
    }

    #[test]
    fn test_bad_time_format() {
        let mut input = valid_input();
        input.start_time = "6:30 pm".to_string();
        let result = validate_event_input(&input);
        assert!(result.errors.iter().any(|e| e.contains("HH:MM")));
        assert_eq!(result.cleaned.start_time, None);
    }

    #[test]
    fn test_blank_time_is_fine() {
        let mut input = valid_input();
        input.start_time = "  ".to_string();
        let result = validate_event_input(&input);
        assert!(result.is_ok());
        assert_eq!(result.cleaned.start_time, None);
    }

    #[test]
    fn test_unknown_recurrence_falls_back() {
        let mut input = valid_input();
        input.recurrence = "fortnightly".to_string();
        let result = validate_event_input(&input);
        assert_eq!(result.cleaned.recurrence, Recurrence::None);
    }

    #[test]
    fn test_overlong_fields() {
        let mut input = valid_input();
        input.description = "x".repeat(1001);
        input.location = "y".repeat(201);
        let result = validate_event_input(&input);
        assert_eq!(result.errors.len(), 2);
    }
}
