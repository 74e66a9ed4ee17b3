use chrono::NaiveDate;

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// The range covering an entire month, or `None` for an invalid
    /// year/month pair. The end is the first of the next month minus a day.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }?
        .pred_opt()?;
        Some(Self { start, end })
    }

    /// Whether the given date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sort orders for the member directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberSort {
    /// Last name, then first name, ascending.
    #[default]
    LastAsc,
    LastDesc,
    FirstAsc,
    FirstDesc,
    /// Gender, then last name, then first name (used by attendance).
    Gender,
}

impl MemberSort {
    /// Parses the `sort` query parameter. Unknown values fall back to the
    /// default order.
    pub fn parse(value: &str) -> Self {
        match value {
            "last_desc" => MemberSort::LastDesc,
            "first_asc" | "first" => MemberSort::FirstAsc,
            "first_desc" => MemberSort::FirstDesc,
            "gender" => MemberSort::Gender,
            _ => MemberSort::LastAsc,
        }
    }
}

/// Search and ordering for the member directory listing.
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    /// Case-insensitive substring matched against names, email, and phone.
    pub search: Option<String>,
    pub sort: MemberSort,
}

impl MemberQuery {
    pub fn sorted(sort: MemberSort) -> Self {
        Self { search: None, sort }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range_construction() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::new(start, end).unwrap();
        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(DateRange::new(start, end), Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_month_factory_boundaries() {
        let january = DateRange::month(2024, 1).unwrap();
        assert_eq!(january.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(january.end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let december = DateRange::month(2024, 12).unwrap();
        assert_eq!(december.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let leap_february = DateRange::month(2024, 2).unwrap();
        assert_eq!(
            leap_february.end,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        assert_eq!(DateRange::month(2024, 13), None);
    }

    #[test]
    fn test_contains() {
        let range = DateRange::month(2024, 6).unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
    }

    #[test]
    fn test_member_sort_parse() {
        assert_eq!(MemberSort::parse("last_desc"), MemberSort::LastDesc);
        assert_eq!(MemberSort::parse("first"), MemberSort::FirstAsc);
        assert_eq!(MemberSort::parse("gender"), MemberSort::Gender);
        assert_eq!(MemberSort::parse("bogus"), MemberSort::LastAsc);
    }
}
