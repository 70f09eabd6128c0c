//! Inclusive date windows for recurrence expansion and indexing.

use std::fmt;

use crate::date_key::{DateKey, DateKeyParseError};

/// Inclusive `[from, to]` range of calendar days.
///
/// A window whose `from` is after its `to` is empty: nothing falls inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateKey,
    pub to: DateKey,
}

impl DateRange {
    pub fn new(from: DateKey, to: DateKey) -> Self {
        DateRange { from, to }
    }

    /// The calendar month containing `date`.
    pub fn month_of(date: DateKey) -> Self {
        DateRange {
            from: date.first_of_month(),
            to: date.last_of_month(),
        }
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.from <= *date && *date <= self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from > self.to
    }

    /// Parse optional YYYY-MM-DD bounds, falling back to `default` for
    /// whichever side is not given.
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        default: DateRange,
    ) -> Result<Self, DateKeyParseError> {
        let from = match from {
            Some(s) => s.parse()?,
            None => default.from,
        };
        let to = match to {
            Some(s) => s.parse()?,
            None => default.to,
        };
        Ok(DateRange { from, to })
    }

    /// Iterate every day in the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = DateKey> + '_ {
        std::iter::successors(Some(self.from), |d| d.add_days(1))
            .take_while(|d| *d <= self.to)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from, self.to)
    }
}
