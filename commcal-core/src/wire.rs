//! JSON shapes exchanged with the remote event store.
//!
//! Dates travel as `YYYY-MM-DD`, times as `HH:MM`. Outgoing payloads never
//! omit optional fields: an absent value is sent as `null` so the store can
//! tell "clear this field" apart from "leave it alone".

use std::num::NonZeroU32;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::error::CalendarError;
use crate::event::{Event, EventId, Frequency, RecurrenceRule};

/// An event as returned by `GET /events`, `POST /events` and `PUT /events/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: DateKey,
    #[serde(default, with = "time_format")]
    pub event_time: Option<NaiveTime>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub recurrence_type: Option<Frequency>,
    #[serde(default)]
    pub recurrence_interval: Option<i64>,
    #[serde(default)]
    pub recurrence_end_date: Option<DateKey>,
}

impl TryFrom<EventRecord> for Event {
    type Error = CalendarError;

    /// A recurring record without a type or interval falls back to weekly,
    /// every period. A non-positive interval is rejected.
    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let recurrence = if record.is_recurring.unwrap_or(false) {
            let raw = record.recurrence_interval.unwrap_or(1);
            let interval = u32::try_from(raw)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    CalendarError::MalformedResponse(format!(
                        "event {} has recurrence interval {}",
                        record.id, raw
                    ))
                })?;
            Some(RecurrenceRule {
                frequency: record.recurrence_type.unwrap_or(Frequency::Weekly),
                interval,
                end_date: record.recurrence_end_date,
            })
        } else {
            None
        };

        Ok(Event {
            id: record.id,
            title: record.title,
            description: record.description,
            date: record.event_date,
            time: record.event_time,
            organizer: record.organizer,
            recurrence,
        })
    }
}

/// Body of `POST /events` and `PUT /events/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub title: String,
    pub description: Option<String>,
    pub event_date: DateKey,
    #[serde(with = "time_format")]
    pub event_time: Option<NaiveTime>,
    pub organizer: Option<String>,
    pub is_recurring: bool,
    pub recurrence_type: Option<Frequency>,
    pub recurrence_interval: Option<u32>,
    pub recurrence_end_date: Option<DateKey>,
}

/// Response of `GET /stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct Stats {
    pub total_events: u64,
    pub events_this_month: u64,
    pub upcoming_events: u64,
}

/// Error body returned with non-2xx responses.
///
/// `detail` is usually a string, but request validation failures return a
/// structured list, so it is kept as raw JSON.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// `HH:MM` on the way out; `HH:MM` or `HH:MM:SS` on the way in.
pub mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub const TIME_FORMAT: &str = "%H:%M";

    pub fn parse(s: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(s, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok()
    }

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.collect_str(&t.format(TIME_FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid time '{}'", s))),
        }
    }
}
