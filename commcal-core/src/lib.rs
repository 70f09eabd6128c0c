//! Core types for the community calendar client.
//!
//! This crate is everything the calendar screen needs apart from drawing:
//! - `grid` and `view` lay out a month as complete weeks
//! - `recurrence` and `index` place events (repeating ones included) on days
//! - `sync` keeps the local event collection in step with the service
//! - `share` builds and reads deep links to a single event

pub mod config;
pub mod date_key;
pub mod date_range;
pub mod error;
pub mod event;
pub mod grid;
pub mod index;
pub mod recurrence;
pub mod share;
pub mod store;
pub mod sync;
pub mod view;
pub mod wire;

pub use config::CommcalConfig;
pub use date_key::DateKey;
pub use date_range::DateRange;
pub use error::{CalendarError, CalendarResult, ValidationError};
pub use event::{Event, EventDraft, EventId, Frequency, RecurrenceDraft, RecurrenceRule};
pub use grid::{DayCell, MonthCursor, build_month_grid};
pub use index::{EventIndex, Occurrence};
pub use share::ShareLinkCodec;
pub use store::{EventStore, HttpStore};
pub use sync::{MutationPhase, Snapshot, SyncController};
pub use view::{MonthView, ViewCell};
pub use wire::Stats;
