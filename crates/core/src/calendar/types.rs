use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often an event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Parses a form value. Unknown values fall back to `None`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "weekly" => Recurrence::Weekly,
            "monthly" => Recurrence::Monthly,
            "yearly" => Recurrence::Yearly,
            _ => Recurrence::None,
        }
    }

    /// The form value for this recurrence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

/// A calendar event shown on the public calendar and managed by admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with the given title and date.
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            location: String::new(),
            start_date,
            start_time: None,
            recurrence: Recurrence::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the start time for this event.
    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    /// Sets the location for this event.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the description for this event.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the recurrence for this event.
    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// The event's start time formatted as `HH:MM`, or an empty string.
    pub fn time_label(&self) -> String {
        self.start_time
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// One day cell in the month grid. Never persisted; rebuilt per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// Day of month, 1-based.
    pub day: u32,
    /// Date key in `YYYY-MM-DD` form, used to match events to days.
    pub date_key: String,
    /// Events on this day, in the order the caller supplied them.
    pub events: Vec<Event>,
}

/// One week row: exactly 7 slots, `None` for cells outside the month.
pub type CalendarWeek = Vec<Option<CalendarDay>>;

/// A month/year pair used for prev/next navigation links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRef {
    pub month: u32,
    pub year: i32,
}

/// The full month grid handed to the calendar template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCalendar {
    pub year: i32,
    /// Month number, 1-12.
    pub month: u32,
    pub month_name: &'static str,
    pub weeks: Vec<CalendarWeek>,
    pub prev: MonthRef,
    pub next: MonthRef,
}
