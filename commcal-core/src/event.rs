//! Calendar event types.
//!
//! [`Event`] is the confirmed, server-issued representation. [`EventDraft`] is
//! what the user is editing; it only becomes an `Event` by going through
//! [`SyncController`](crate::sync::SyncController), which validates and
//! normalizes it into a wire payload first.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::date_key::DateKey;
use crate::error::ValidationError;
use crate::wire::EventPayload;

/// Opaque event identifier assigned by the remote store.
///
/// The store issues numeric ids, but they are only ever compared and
/// printed, so they are kept in string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        EventId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId(id.to_string())
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        EventId(id)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => EventId(n.to_string()),
            RawId::Str(s) => EventId(s),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!(
                "Unknown frequency '{}'. Expected daily, weekly, monthly or yearly",
                other
            )),
        }
    }
}

/// "Every `interval` `frequency` periods, optionally until `end_date`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: NonZeroU32,
    /// Last date (inclusive) an occurrence may fall on. `None` is unbounded.
    pub end_date: Option<DateKey>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency, interval: NonZeroU32) -> Self {
        RecurrenceRule {
            frequency,
            interval,
            end_date: None,
        }
    }

    pub fn until(mut self, end_date: DateKey) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Human-readable summary, e.g. "every 2 weeks until 2024-06-30".
    pub fn describe(&self) -> String {
        let unit = match self.frequency {
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };
        let mut out = match self.interval.get() {
            1 => format!("every {}", unit),
            n => format!("every {} {}s", n, unit),
        };
        if let Some(end) = self.end_date {
            out.push_str(&format!(" until {}", end));
        }
        out
    }
}

/// A calendar event as confirmed by the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    /// Anchor date; the first occurrence of a recurring event.
    pub date: DateKey,
    /// Local time of day. `None` means all day.
    pub time: Option<NaiveTime>,
    pub organizer: Option<String>,
    /// Present exactly when the event is recurring.
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Recurrence settings as entered by the user, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceDraft {
    pub frequency: Frequency,
    pub interval: i64,
    pub end_date: Option<DateKey>,
}

impl Default for RecurrenceDraft {
    fn default() -> Self {
        RecurrenceDraft {
            frequency: Frequency::Weekly,
            interval: 1,
            end_date: None,
        }
    }
}

/// An event being created or edited.
///
/// Every optional field is an `Option`; empty strings are treated as absent
/// during normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<DateKey>,
    pub time: Option<NaiveTime>,
    pub organizer: Option<String>,
    /// `Some` when the event should repeat.
    pub recurrence: Option<RecurrenceDraft>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: DateKey) -> Self {
        EventDraft {
            title: title.into(),
            date: Some(date),
            ..Default::default()
        }
    }

    /// Check required fields and produce the normalized wire payload.
    ///
    /// Absent optional fields stay present in the payload as explicit nulls.
    pub fn normalize(&self) -> Result<EventPayload, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let date = self.date.ok_or(ValidationError::MissingDate)?;

        let recurrence = match &self.recurrence {
            Some(r) => {
                let interval = u32::try_from(r.interval)
                    .ok()
                    .and_then(NonZeroU32::new)
                    .ok_or(ValidationError::NonPositiveInterval(r.interval))?;
                Some(RecurrenceRule {
                    frequency: r.frequency,
                    interval,
                    end_date: r.end_date,
                })
            }
            None => None,
        };

        Ok(EventPayload {
            title: title.to_string(),
            description: non_empty(&self.description),
            event_date: date,
            event_time: self.time,
            organizer: non_empty(&self.organizer),
            is_recurring: recurrence.is_some(),
            recurrence_type: recurrence.map(|r| r.frequency),
            recurrence_interval: recurrence.map(|r| r.interval.get()),
            recurrence_end_date: recurrence.and_then(|r| r.end_date),
        })
    }
}

/// Pre-fill a draft from an existing event (the edit flow).
impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        EventDraft {
            title: event.title.clone(),
            description: event.description.clone(),
            date: Some(event.date),
            time: event.time,
            organizer: event.organizer.clone(),
            recurrence: event.recurrence.map(|r| RecurrenceDraft {
                frequency: r.frequency,
                interval: i64::from(r.interval.get()),
                end_date: r.end_date,
            }),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
