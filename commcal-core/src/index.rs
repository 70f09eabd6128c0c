//! Date-keyed index of event occurrences.

use std::collections::BTreeMap;

use crate::date_key::DateKey;
use crate::date_range::DateRange;
use crate::event::Event;
use crate::recurrence;

/// One event as it appears on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub event: Event,
    pub date: DateKey,
}

/// Occurrences bucketed by calendar day for a single window.
///
/// The index is immutable once built; any change to the event collection or
/// the window means building a new one with [`EventIndex::rebuild`].
#[derive(Debug, Clone, Default)]
pub struct EventIndex {
    window: Option<DateRange>,
    buckets: BTreeMap<DateKey, Vec<Occurrence>>,
}

impl EventIndex {
    /// Expand every event over `window` and bucket the occurrences by day.
    ///
    /// Within a day, all-day events come first, then timed events by time of
    /// day. Events with equal times keep the order they have in `events`.
    pub fn rebuild(events: &[Event], window: DateRange) -> Self {
        let mut buckets: BTreeMap<DateKey, Vec<Occurrence>> = BTreeMap::new();

        for event in events {
            for date in recurrence::expand(event, window) {
                buckets.entry(date).or_default().push(Occurrence {
                    event: event.clone(),
                    date,
                });
            }
        }

        for bucket in buckets.values_mut() {
            bucket.sort_by_key(|o| o.event.time);
        }

        EventIndex {
            window: Some(window),
            buckets,
        }
    }

    /// Occurrences on `date`, possibly none.
    pub fn lookup(&self, date: &DateKey) -> &[Occurrence] {
        self.buckets.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn window(&self) -> Option<DateRange> {
        self.window
    }

    /// Days that have at least one occurrence, ascending.
    pub fn days(&self) -> impl Iterator<Item = (&DateKey, &[Occurrence])> {
        self.buckets.iter().map(|(d, o)| (d, o.as_slice()))
    }

    /// Total number of occurrences across all days.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
