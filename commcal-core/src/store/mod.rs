//! Remote event store.
//!
//! [`EventStore`] is the seam between the sync controller and the backend.
//! [`HttpStore`] talks to the real REST service; tests substitute their own
//! implementations.

mod http;

pub use http::HttpStore;

use async_trait::async_trait;

use crate::error::CalendarResult;
use crate::event::{Event, EventId};
use crate::wire::{EventPayload, Stats};

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Check that the service is up.
    async fn ping(&self) -> CalendarResult<()>;

    /// `GET /events`
    async fn list_events(&self) -> CalendarResult<Vec<Event>>;

    /// `POST /events`
    async fn create_event(&self, payload: &EventPayload) -> CalendarResult<Event>;

    /// `PUT /events/{id}`. Fails with `NotFound` when the store has no such id.
    async fn update_event(&self, id: &EventId, payload: &EventPayload) -> CalendarResult<Event>;

    /// `DELETE /events/{id}`. Fails with `NotFound` when the store has no such id.
    async fn delete_event(&self, id: &EventId) -> CalendarResult<()>;

    /// `GET /stats`
    async fn stats(&self) -> CalendarResult<Stats>;

    /// `GET /calendar/export.ics`
    async fn export_ics(&self) -> CalendarResult<Vec<u8>>;
}
