use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use super::types::{CalendarDay, CalendarWeek, Event, MonthCalendar, MonthRef};

/// Display names for the calendar header, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Formats a civil date as the `YYYY-MM-DD` key used to group events.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Last day-of-month number, from the first of the following month minus one
/// day. Handles leap February and 30/31-day months without a lookup table.
fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Builds the month grid for the public calendar page.
///
/// `year` outside [1900, 2100] and `month` outside [1, 12] fall back to the
/// corresponding component of `today`; the caller passes the current local
/// date (tests pass a fixed one). `events` must already be limited to the
/// requested month and sorted ascending; the builder groups but does not
/// filter or re-sort.
///
/// Weeks start on Monday. The first week is left-padded and the last week
/// right-padded with `None` so every week holds exactly 7 slots.
pub fn build_month_calendar(
    year: i32,
    month: u32,
    events: Vec<Event>,
    today: NaiveDate,
) -> MonthCalendar {
    let year = if (1900..=2100).contains(&year) {
        year
    } else {
        today.year()
    };
    let month = if (1..=12).contains(&month) {
        month
    } else {
        today.month()
    };

    let mut events_by_date: HashMap<String, Vec<Event>> = HashMap::new();
    for event in events {
        events_by_date
            .entry(date_key(event.start_date))
            .or_default()
            .push(event);
    }

    // The clamped year/month always name a valid first-of-month.
    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap());
    let total_days = days_in_month(year, month);

    // Monday = 0 .. Sunday = 6.
    let offset = first_of_month.weekday().num_days_from_monday() as usize;

    let mut weeks: Vec<CalendarWeek> = Vec::new();
    let mut current_day: u32 = 1;

    while current_day <= total_days {
        let mut week: CalendarWeek = Vec::with_capacity(7);

        for slot in 0..7 {
            if weeks.is_empty() && slot < offset {
                week.push(None);
            } else if current_day > total_days {
                week.push(None);
            } else {
                let key = NaiveDate::from_ymd_opt(year, month, current_day)
                    .map(date_key)
                    .unwrap_or_default();
                week.push(Some(CalendarDay {
                    day: current_day,
                    events: events_by_date.remove(&key).unwrap_or_default(),
                    date_key: key,
                }));
                current_day += 1;
            }
        }

        weeks.push(week);
    }

    let prev = if month == 1 {
        MonthRef {
            month: 12,
            year: year - 1,
        }
    } else {
        MonthRef {
            month: month - 1,
            year,
        }
    };
    let next = if month == 12 {
        MonthRef {
            month: 1,
            year: year + 1,
        }
    } else {
        MonthRef {
            month: month + 1,
            year,
        }
    };

    MonthCalendar {
        year,
        month,
        month_name: MONTH_NAMES[(month - 1) as usize],
        weeks,
        prev,
        next,
    }
}
