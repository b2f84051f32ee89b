//! Calendar day keys and time-of-day values.
//!
//! Every date crossing a boundary is the fixed-width `YYYY-MM-DD` form, so
//! ordering a [`DayKey`] and ordering its string agree.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// A local calendar day, formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a strict, zero-padded `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let b = s.as_bytes();
        let shape_ok = b.len() == 10
            && b[4] == b'-'
            && b[7] == b'-'
            && b.iter()
                .enumerate()
                .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
        if !shape_ok {
            return Err(ValidationError::InvalidDay(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDay(s.to_string()))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day.
    pub fn pred(&self) -> Self {
        Self(self.0 - Duration::days(1))
    }

    /// The next calendar day.
    pub fn succ(&self) -> Self {
        Self(self.0 + Duration::days(1))
    }

    pub fn first_of_month(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// Number of days in the month containing this day.
    pub fn days_in_month(&self) -> u32 {
        let first = self.first_of_month().0;
        let next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
        };
        next.map(|n| (n - first).num_days() as u32).unwrap_or(31)
    }

    /// Weekday index of this day, 0=Sunday..6=Saturday.
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Weekday index of the 1st of this month, used to align a month grid.
    pub fn weekday_offset(&self) -> u32 {
        self.first_of_month().weekday_index()
    }

    /// The same month, on day `day` (1-based). `None` past the month's end.
    pub fn with_day(&self, day: u32) -> Option<Self> {
        self.0.with_day(day).map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DayKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a `YYYY-MM` month into the key of its first day.
pub fn parse_month(s: &str) -> Result<DayKey, ValidationError> {
    DayKey::parse(&format!("{s}-01")).map_err(|_| ValidationError::InvalidMonth(s.to_string()))
}

/// Validate an `HH:MM` 24-hour, zero-padded time.
pub fn validate_time(s: &str) -> Result<(), ValidationError> {
    let b = s.as_bytes();
    let shape_ok = b.len() == 5
        && b[2] == b':'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || c.is_ascii_digit());
    if shape_ok && NaiveTime::parse_from_str(s, "%H:%M").is_ok() {
        Ok(())
    } else {
        Err(ValidationError::InvalidTime(s.to_string()))
    }
}

/// Wildcard day filter: an item without a day belongs to every day.
pub fn visible_on(item_day: Option<&str>, selected: &str) -> bool {
    match item_day {
        None => true,
        Some(d) if d.is_empty() => true,
        Some(d) => d == selected,
    }
}

/// An item that may be pinned to a calendar day and checked off.
///
/// Tasks and schedule blocks share this shape, which is all the day filter,
/// the streak walk and the monthly aggregation need.
pub trait DayScoped {
    fn id(&self) -> &str;

    fn day(&self) -> Option<&str>;

    /// Absent completion counts as not completed.
    fn is_completed(&self) -> bool;

    fn set_completed(&mut self, completed: bool);

    fn visible_on(&self, selected: &str) -> bool {
        visible_on(self.day(), selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_are_fixed_width() {
        let day = DayKey::parse("2024-01-05").unwrap();
        assert_eq!(day.to_string(), "2024-01-05");
        assert!(DayKey::parse("2024-1-5").is_err());
        assert!(DayKey::parse("2024-02-30").is_err());
        assert!(DayKey::parse("20240105").is_err());
    }

    #[test]
    fn pred_crosses_month_and_year() {
        let day = DayKey::parse("2024-01-01").unwrap();
        assert_eq!(day.pred().to_string(), "2023-12-31");
        assert_eq!(DayKey::parse("2024-03-01").unwrap().pred().to_string(), "2024-02-29");
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(DayKey::parse("2024-02-10").unwrap().days_in_month(), 29);
        assert_eq!(DayKey::parse("2023-02-10").unwrap().days_in_month(), 28);
        assert_eq!(DayKey::parse("2024-12-31").unwrap().days_in_month(), 31);
        assert_eq!(DayKey::parse("2024-04-01").unwrap().days_in_month(), 30);
    }

    #[test]
    fn weekday_offset_is_sunday_based() {
        // 2024-01-01 was a Monday
        assert_eq!(DayKey::parse("2024-01-17").unwrap().weekday_offset(), 1);
        // 2023-10-01 was a Sunday
        assert_eq!(DayKey::parse("2023-10-20").unwrap().weekday_offset(), 0);
        // 2024-06-01 was a Saturday
        assert_eq!(DayKey::parse("2024-06-01").unwrap().weekday_offset(), 6);
    }

    #[test]
    fn ordering_matches_string_ordering() {
        let a = DayKey::parse("2023-12-31").unwrap();
        let b = DayKey::parse("2024-01-01").unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn time_validation() {
        assert!(validate_time("09:00").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("9:00").is_err());
        assert!(validate_time("24:00").is_err());
        assert!(validate_time("12:60").is_err());
    }

    #[test]
    fn wildcard_filter() {
        assert!(visible_on(None, "2024-01-01"));
        assert!(visible_on(Some(""), "2024-01-01"));
        assert!(visible_on(Some("2024-01-01"), "2024-01-01"));
        assert!(!visible_on(Some("2024-01-02"), "2024-01-01"));
    }

    #[test]
    fn month_parsing() {
        assert_eq!(parse_month("2024-02").unwrap().to_string(), "2024-02-01");
        assert!(parse_month("2024-13").is_err());
    }
}
