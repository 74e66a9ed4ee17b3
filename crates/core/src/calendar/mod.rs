//! Event calendar: entity types, input validation, and the month-grid
//! builder that turns a month's events into a renderable week/day layout.

mod grid;
mod types;
mod validation;

pub use grid::{build_month_calendar, date_key, MONTH_NAMES};
pub use types::{CalendarDay, CalendarWeek, Event, MonthCalendar, MonthRef, Recurrence};
pub use validation::{validate_event_input, CleanEvent, EventInput};
