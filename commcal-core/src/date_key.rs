//! Timezone-free calendar dates.
//!
//! A [`DateKey`] is the identity of a calendar day everywhere in this crate:
//! grid cells, index buckets, recurrence occurrences and the wire format all
//! use it. It carries no time and no offset, so two keys compare equal exactly
//! when their year, month and day components do.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Wire and display format of a [`DateKey`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
pub struct DateKeyParseError(pub String);

/// A calendar day (year, month 1-12, day 1-31), serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Build a key from components. Returns `None` for impossible dates
    /// such as February 30th.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DateKey)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day of week with Sunday = 0 through Saturday = 6.
    pub fn weekday_from_sunday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn first_of_month(&self) -> Self {
        DateKey(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn last_of_month(&self) -> Self {
        let last = days_in_month(self.year(), self.month());
        DateKey(self.0.with_day(last).unwrap_or(self.0))
    }

    /// Shift by a signed number of days. `None` only at the edge of the
    /// representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let magnitude = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.0.checked_add_days(magnitude).map(DateKey)
        } else {
            self.0.checked_sub_days(magnitude).map(DateKey)
        }
    }

    /// Add calendar months, clamping the day to the target month's length
    /// (Jan 31 + 1 month is the last day of February).
    pub fn add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(DateKey)
    }

    /// Number of days from `self` to `other` (negative when `other` is earlier).
    pub fn days_until(&self, other: &DateKey) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Number of whole calendar months from `self`'s month to `other`'s month,
    /// ignoring the day component.
    pub fn months_until(&self, other: &DateKey) -> i64 {
        let from = i64::from(self.year()) * 12 + i64::from(self.month());
        let to = i64::from(other.year()) * 12 + i64::from(other.month());
        to - from
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

/// True when both keys name the same calendar day.
pub fn is_same_day(a: &DateKey, b: &DateKey) -> bool {
    a == b
}

/// Length of the given month in days (28-31). Zero for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.pred_opt().map_or(0, |last| last.day()),
        // December of the last representable year
        None => 31,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d.leap_year())
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        DateKey(date)
    }
}

impl From<DateKey> for NaiveDate {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for DateKey {
    type Err = DateKeyParseError;

    /// Only the canonical zero-padded form is accepted, so that parsing and
    /// formatting round-trip exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| DateKeyParseError(s.to_string()))?;
        let key = DateKey(date);
        if key.to_string() != s {
            return Err(DateKeyParseError(s.to_string()));
        }
        Ok(key)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(DateKey::new(2023, 2, 29).is_none());
        assert!(DateKey::new(2024, 2, 29).is_some());
        assert!(DateKey::new(2024, 13, 1).is_none());
        assert!(DateKey::new(2024, 4, 31).is_none());
    }

    #[test]
    fn test_string_round_trip() {
        let mut d = DateKey::new(1999, 12, 1).unwrap();
        let end = DateKey::new(2001, 3, 1).unwrap();
        while d <= end {
            assert_eq!(d.to_string().parse::<DateKey>().unwrap(), d);
            assert!(is_same_day(&d, &d));
            d = d.add_days(1).unwrap();
        }
    }

    #[test]
    fn test_parse_requires_canonical_form() {
        assert!("2024-1-05".parse::<DateKey>().is_err());
        assert!("2024-01-5".parse::<DateKey>().is_err());
        assert!("2024-01-05T10:00".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
        assert_eq!(key("0999-03-04").to_string(), "0999-03-04");
    }

    #[test]
    fn test_ordering_is_by_components() {
        assert!(key("2024-01-31") < key("2024-02-01"));
        assert!(key("2023-12-31") < key("2024-01-01"));
        assert_eq!(key("2024-05-05"), DateKey::new(2024, 5, 5).unwrap());
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(key("2024-01-31").add_months(1), Some(key("2024-02-29")));
        assert_eq!(key("2023-01-31").add_months(1), Some(key("2023-02-28")));
        assert_eq!(key("2024-02-29").add_months(12), Some(key("2025-02-28")));
        assert_eq!(key("2024-01-31").add_months(2), Some(key("2024-03-31")));
    }

    #[test]
    fn test_add_days_negative() {
        assert_eq!(key("2024-03-01").add_days(-1), Some(key("2024-02-29")));
        assert_eq!(key("2024-03-01").add_days(0), Some(key("2024-03-01")));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(key("2024-02-10").first_of_month(), key("2024-02-01"));
        assert_eq!(key("2024-02-10").last_of_month(), key("2024-02-29"));
        assert_eq!(key("1900-02-10").last_of_month(), key("1900-02-28"));
        assert_eq!(key("2000-02-10").last_of_month(), key("2000-02-29"));
    }

    #[test]
    fn test_months_until() {
        assert_eq!(key("2024-01-31").months_until(&key("2024-03-01")), 2);
        assert_eq!(key("2024-11-15").months_until(&key("2025-01-01")), 2);
        assert_eq!(key("2024-03-15").months_until(&key("2024-01-01")), -2);
    }

    #[test]
    fn test_serde_uses_string_form() {
        let json = serde_json::to_string(&key("2024-07-04")).unwrap();
        assert_eq!(json, "\"2024-07-04\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key("2024-07-04"));
        assert!(serde_json::from_str::<DateKey>("\"2024-02-30\"").is_err());
    }

    #[test]
    fn test_weekday_from_sunday() {
        // 2024-09-01 was a Sunday
        assert_eq!(key("2024-09-01").weekday_from_sunday(), 0);
        assert_eq!(key("2024-09-07").weekday_from_sunday(), 6);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2100));
    }
}
