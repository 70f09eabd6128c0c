//! Month grid construction.
//!
//! A month is laid out as complete Sunday-first weeks: the days of the month
//! itself, padded in front with the tail of the previous month and behind
//! with the head of the next one.

use std::fmt;

use crate::date_key::{DateKey, days_in_month};
use crate::date_range::DateRange;

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

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: DateKey,
    /// False for the padding days borrowed from adjacent months.
    pub in_current_month: bool,
}

/// Build the grid for `(year, month)`.
///
/// `month` may over- or underflow: month 13 is January of the next year and
/// month 0 is December of the previous one. The result always has a length
/// that is a multiple of 7. Years outside the supported date range produce an
/// empty grid.
pub fn build_month_grid(year: i32, month: i32) -> Vec<DayCell> {
    match MonthCursor::normalized(year, month) {
        Some(cursor) => cursor.grid(),
        None => Vec::new(),
    }
}

/// A (year, month) position in the calendar, always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// Normalize a possibly overflowing month number. `None` when the
    /// resulting year is outside the supported date range.
    pub fn normalized(year: i32, month: i32) -> Option<Self> {
        let total = i64::from(year) * 12 + i64::from(month) - 1;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        let month = u32::try_from(total.rem_euclid(12) + 1).ok()?;
        DateKey::new(year, month, 1)?;
        Some(MonthCursor { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: DateKey) -> Self {
        MonthCursor {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Move by `delta` months. Stays put at the edge of the supported range.
    pub fn shift(&self, delta: i32) -> Self {
        let month = i32::try_from(self.month).unwrap_or(1);
        Self::normalized(self.year, month.saturating_add(delta)).unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    pub fn prev(&self) -> Self {
        self.shift(-1)
    }

    pub fn first_day(&self) -> Option<DateKey> {
        DateKey::new(self.year, self.month, 1)
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[(self.month as usize).saturating_sub(1) % 12]
    }

    /// The calendar days of this month, first to last.
    pub fn days(&self) -> DateRange {
        match self.first_day() {
            Some(first) => DateRange::month_of(first),
            None => empty_range(),
        }
    }

    /// Every cell of this month's grid, in display order.
    pub fn grid(&self) -> Vec<DayCell> {
        let Some(first) = self.first_day() else {
            return Vec::new();
        };
        let leading = i64::from(first.weekday_from_sunday());
        let in_month = i64::from(days_in_month(self.year, self.month));
        let total = (leading + in_month + 6) / 7 * 7;

        let Some(start) = first.add_days(-leading) else {
            return Vec::new();
        };

        std::iter::successors(Some(start), |d| d.add_days(1))
            .take(total as usize)
            .map(|date| DayCell {
                date,
                in_current_month: date.year() == self.year && date.month() == self.month,
            })
            .collect()
    }

    /// First to last cell of the grid, padding days included.
    pub fn window(&self) -> DateRange {
        let grid = self.grid();
        match (grid.first(), grid.last()) {
            (Some(first), Some(last)) => DateRange::new(first.date, last.date),
            _ => empty_range(),
        }
    }

    /// The previous, current and next month, for previews that cross the
    /// month boundary.
    pub fn window_with_margin(&self) -> DateRange {
        let before = self.prev().days();
        let after = self.next().days();
        DateRange::new(before.from.min(self.days().from), after.to.max(self.days().to))
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

fn empty_range() -> DateRange {
    let epoch = DateKey::from(chrono::NaiveDate::MIN);
    DateRange::new(epoch.add_days(1).unwrap_or(epoch), epoch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_every_month_is_complete_weeks() {
        for year in 1900..=2100 {
            for month in 1..=12 {
                let grid = build_month_grid(year, month);
                assert_eq!(grid.len() % 7, 0, "{year}-{month}");
                assert_eq!(grid[0].date.weekday_from_sunday(), 0);

                let in_month: Vec<u32> = grid
                    .iter()
                    .filter(|c| c.in_current_month)
                    .map(|c| c.date.day())
                    .collect();
                let expected: Vec<u32> = (1..=days_in_month(year, month as u32)).collect();
                assert_eq!(in_month, expected, "{year}-{month}");

                // Consecutive days with no gaps
                for pair in grid.windows(2) {
                    assert_eq!(pair[0].date.add_days(1), Some(pair[1].date));
                }
            }
        }
    }

    #[test]
    fn test_padding_cells() {
        // March 2024 starts on a Friday and ends on a Sunday
        let grid = build_month_grid(2024, 3);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, key("2024-02-25"));
        assert!(!grid[0].in_current_month);
        assert_eq!(grid[5].date, key("2024-03-01"));
        assert!(grid[5].in_current_month);
        assert_eq!(grid[41].date, key("2024-04-06"));
        assert!(!grid[41].in_current_month);
    }

    #[test]
    fn test_month_that_fills_four_weeks_exactly() {
        // February 2015 starts on a Sunday and has 28 days
        let grid = build_month_grid(2015, 2);
        assert_eq!(grid.len(), 28);
        assert!(grid.iter().all(|c| c.in_current_month));
    }

    #[test]
    fn test_month_overflow_normalizes() {
        assert_eq!(build_month_grid(2023, 13), build_month_grid(2024, 1));
        assert_eq!(build_month_grid(2024, 0), build_month_grid(2023, 12));
        assert_eq!(build_month_grid(2024, -11), build_month_grid(2023, 1));
        assert_eq!(build_month_grid(2024, 25), build_month_grid(2026, 1));
    }

    #[test]
    fn test_grid_is_deterministic() {
        assert_eq!(build_month_grid(2030, 7), build_month_grid(2030, 7));
    }

    #[test]
    fn test_out_of_range_year_is_empty() {
        assert!(build_month_grid(i32::MAX, 1).is_empty());
    }

    #[test]
    fn test_cursor_navigation() {
        let dec = MonthCursor::normalized(2024, 12).unwrap();
        assert_eq!(dec.next(), MonthCursor::normalized(2025, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(dec.to_string(), "December 2024");
        assert_eq!(
            MonthCursor::containing(key("2024-02-29")),
            MonthCursor::normalized(2024, 2).unwrap()
        );
    }

    #[test]
    fn test_cursor_windows() {
        let march = MonthCursor::normalized(2024, 3).unwrap();
        let window = march.window();
        assert_eq!(window.from, key("2024-02-25"));
        assert_eq!(window.to, key("2024-04-06"));

        let wide = march.window_with_margin();
        assert_eq!(wide.from, key("2024-02-01"));
        assert_eq!(wide.to, key("2024-04-30"));
    }
}
