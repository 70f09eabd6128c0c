//! Recurrence expansion.
//!
//! Expands an event into the calendar days it is visible on within a finite
//! window. Occurrence `k` is always computed from the anchor date
//! (`anchor + k * period`) rather than from occurrence `k - 1`, so a monthly
//! event anchored on the 31st comes back to the 31st after a short month
//! instead of drifting to the 28th.

use std::iter::FusedIterator;

use crate::date_key::DateKey;
use crate::date_range::DateRange;
use crate::event::{Event, Frequency, RecurrenceRule};

/// Lazily expand `event` into its occurrence dates inside `window`.
///
/// The returned iterator is finite, ascending, and can be cloned to restart
/// the expansion from the beginning.
pub fn expand(event: &Event, window: DateRange) -> Occurrences {
    Occurrences::new(event.date, event.recurrence, window)
}

/// Iterator over the occurrence dates of one event.
#[derive(Debug, Clone)]
pub struct Occurrences {
    anchor: DateKey,
    rule: Option<RecurrenceRule>,
    window: DateRange,
    next_index: u64,
    done: bool,
}

impl Occurrences {
    pub fn new(anchor: DateKey, rule: Option<RecurrenceRule>, window: DateRange) -> Self {
        let next_index = match rule {
            Some(rule) => first_candidate(anchor, &rule, window.from),
            None => 0,
        };
        Occurrences {
            anchor,
            rule,
            window,
            next_index,
            done: window.is_empty(),
        }
    }
}

impl Iterator for Occurrences {
    type Item = DateKey;

    fn next(&mut self) -> Option<DateKey> {
        if self.done {
            return None;
        }

        let Some(rule) = self.rule else {
            self.done = true;
            return self.window.contains(&self.anchor).then_some(self.anchor);
        };

        loop {
            let Some(date) = nth_occurrence(self.anchor, &rule, self.next_index) else {
                self.done = true;
                return None;
            };
            let past_end = rule.end_date.is_some_and(|end| date > end);
            if date > self.window.to || past_end {
                self.done = true;
                return None;
            }
            self.next_index += 1;
            if date >= self.window.from {
                return Some(date);
            }
        }
    }
}

impl FusedIterator for Occurrences {}

/// Date of occurrence `k` (`k = 0` is the anchor). `None` past the end of the
/// representable date range.
fn nth_occurrence(anchor: DateKey, rule: &RecurrenceRule, k: u64) -> Option<DateKey> {
    let steps = k.checked_mul(u64::from(rule.interval.get()))?;
    match rule.frequency {
        Frequency::Daily => anchor.add_days(i64::try_from(steps).ok()?),
        Frequency::Weekly => anchor.add_days(i64::try_from(steps.checked_mul(7)?).ok()?),
        Frequency::Monthly => anchor.add_months(u32::try_from(steps).ok()?),
        Frequency::Yearly => anchor.add_months(u32::try_from(steps.checked_mul(12)?).ok()?),
    }
}

/// Lower bound on the first occurrence index that can land on or after
/// `from`. Lets long-running rules skip straight to the window instead of
/// walking every occurrence since the anchor.
fn first_candidate(anchor: DateKey, rule: &RecurrenceRule, from: DateKey) -> u64 {
    let interval = i64::from(rule.interval.get());
    let (gap, period) = match rule.frequency {
        Frequency::Daily => (anchor.days_until(&from), interval),
        Frequency::Weekly => (anchor.days_until(&from), interval * 7),
        Frequency::Monthly => (anchor.months_until(&from) - 1, interval),
        Frequency::Yearly => (anchor.months_until(&from) - 1, interval * 12),
    };
    if gap <= 0 {
        return 0;
    }
    u64::try_from(gap / period).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::event::EventId;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn window(from: &str, to: &str) -> DateRange {
        DateRange::new(key(from), key(to))
    }

    fn event(date: &str, rule: Option<RecurrenceRule>) -> Event {
        Event {
            id: EventId::new("1"),
            title: "Test".to_string(),
            description: None,
            date: key(date),
            time: None,
            organizer: None,
            recurrence: rule,
        }
    }

    fn rule(frequency: Frequency, interval: u32) -> RecurrenceRule {
        RecurrenceRule::new(frequency, NonZeroU32::new(interval).unwrap())
    }

    fn dates(occurrences: Occurrences) -> Vec<String> {
        occurrences.map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_single_event_inside_window() {
        let e = event("2024-03-15", None);
        assert_eq!(dates(expand(&e, window("2024-03-01", "2024-03-31"))), ["2024-03-15"]);
        assert_eq!(dates(expand(&e, window("2024-03-15", "2024-03-15"))), ["2024-03-15"]);
    }

    #[test]
    fn test_single_event_outside_window() {
        let e = event("2024-03-15", None);
        assert!(dates(expand(&e, window("2024-04-01", "2024-04-30"))).is_empty());
        assert!(dates(expand(&e, window("2024-03-01", "2024-03-14"))).is_empty());
    }

    #[test]
    fn test_biweekly() {
        let e = event("2024-01-01", Some(rule(Frequency::Weekly, 2)));
        assert_eq!(
            dates(expand(&e, window("2024-01-01", "2024-02-29"))),
            ["2024-01-01", "2024-01-15", "2024-01-29", "2024-02-12", "2024-02-26"]
        );
    }

    #[test]
    fn test_monthly_clamps_to_month_end() {
        let e = event("2024-01-31", Some(rule(Frequency::Monthly, 1)));
        assert_eq!(dates(expand(&e, window("2024-02-01", "2024-02-29"))), ["2024-02-29"]);
        assert!(dates(expand(&e, window("2024-03-01", "2024-03-05"))).is_empty());
        assert_eq!(
            dates(expand(&e, window("2024-01-01", "2024-06-30"))),
            ["2024-01-31", "2024-02-29", "2024-03-31", "2024-04-30", "2024-05-31", "2024-06-30"]
        );
    }

    #[test]
    fn test_yearly_leap_day_clamps() {
        let e = event("2024-02-29", Some(rule(Frequency::Yearly, 1)));
        assert_eq!(
            dates(expand(&e, window("2024-01-01", "2028-12-31"))),
            ["2024-02-29", "2025-02-28", "2026-02-28", "2027-02-28", "2028-02-29"]
        );
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let e = event("2024-05-01", Some(rule(Frequency::Daily, 1).until(key("2024-05-03"))));
        assert_eq!(
            dates(expand(&e, window("2024-04-01", "2024-05-31"))),
            ["2024-05-01", "2024-05-02", "2024-05-03"]
        );
    }

    #[test]
    fn test_anchor_before_window_is_skipped() {
        let e = event("2024-01-01", Some(rule(Frequency::Daily, 3)));
        assert_eq!(
            dates(expand(&e, window("2024-01-05", "2024-01-12"))),
            ["2024-01-07", "2024-01-10"]
        );
    }

    #[test]
    fn test_far_past_anchor_expands_only_window() {
        let e = event("1900-01-01", Some(rule(Frequency::Daily, 1)));
        let w = window("2024-02-01", "2024-02-29");
        assert_eq!(expand(&e, w).count(), 29);
        assert_eq!(expand(&e, w).next(), Some(key("2024-02-01")));

        let yearly = event("1900-06-15", Some(rule(Frequency::Yearly, 2)));
        assert_eq!(dates(expand(&yearly, window("2024-01-01", "2024-12-31"))), ["2024-06-15"]);
    }

    #[test]
    fn test_monthly_interval_skip_ahead() {
        let e = event("2020-01-15", Some(rule(Frequency::Monthly, 5)));
        // 2020-01, 2020-06, 2020-11, 2021-04, ..., 2023-10, 2024-03
        assert_eq!(dates(expand(&e, window("2024-01-01", "2024-03-31"))), ["2024-03-15"]);
    }

    #[test]
    fn test_anchor_after_window() {
        let e = event("2024-06-01", Some(rule(Frequency::Weekly, 1)));
        assert!(dates(expand(&e, window("2024-05-01", "2024-05-31"))).is_empty());
    }

    #[test]
    fn test_inverted_window_is_empty() {
        let e = event("2024-06-01", Some(rule(Frequency::Daily, 1)));
        assert!(dates(expand(&e, window("2024-06-30", "2024-06-01"))).is_empty());
    }

    #[test]
    fn test_restartable() {
        let e = event("2024-01-01", Some(rule(Frequency::Weekly, 1)));
        let mut occurrences = expand(&e, window("2024-01-01", "2024-01-31"));
        let fresh = occurrences.clone();
        occurrences.next();
        assert_eq!(occurrences.count(), 4);
        assert_eq!(fresh.count(), 5);
    }
}
