//! Local event collection kept in step with the remote store.
//!
//! [`SyncController`] owns the only mutable copy of the events. Callers read
//! it through [`SyncController::snapshot`] and change it only through
//! `list`, `create`, `update` and `delete`. A mutation is applied locally
//! once the store confirms it, and is then followed by a full `list` from
//! the store so that server-side effects show up too. Whichever full list
//! lands last replaces the local collection.
//!
//! Errors are both returned and recorded in the snapshot. Every operation
//! clears the previous error before it starts. A failed refresh after a
//! successful mutation is recorded as a `warning` instead, because the
//! mutation itself went through.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::date_range::DateRange;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventDraft, EventId};
use crate::index::EventIndex;
use crate::store::EventStore;
use crate::wire::Stats;

const DEFAULT_STARTUP_PROBE_DELAY: Duration = Duration::from_millis(200);

/// Progress of the most recent mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPhase {
    #[default]
    Idle,
    Pending,
    Committed,
    Failed,
}

/// Read-only view of the controller's state.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub events: Vec<Event>,
    /// At least one request is in flight.
    pub loading: bool,
    /// The first connection attempt is taking long; the service is probably
    /// starting up.
    pub waking: bool,
    pub error: Option<CalendarError>,
    /// A post-mutation refresh failed. The mutation itself succeeded.
    pub warning: Option<CalendarError>,
    pub stats: Option<Stats>,
    pub phase: MutationPhase,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<Event>,
    in_flight: usize,
    waking: bool,
    probed: bool,
    error: Option<CalendarError>,
    warning: Option<CalendarError>,
    stats: Option<Stats>,
    phase: MutationPhase,
    pending: HashSet<EventId>,
    closed: bool,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a request as in flight for as long as it lives.
struct LoadingGuard<'a> {
    state: &'a Mutex<State>,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a Mutex<State>) -> Self {
        lock(state).in_flight += 1;
        LoadingGuard { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Holds an event id in the pending set until the mutation's own response
/// has been handled.
struct PendingGuard<'a> {
    state: &'a Mutex<State>,
    id: EventId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).pending.remove(&self.id);
    }
}

pub struct SyncController<S> {
    store: S,
    state: Mutex<State>,
    startup_probe_delay: Duration,
}

impl<S: EventStore> SyncController<S> {
    pub fn new(store: S) -> Self {
        SyncController {
            store,
            state: Mutex::new(State::default()),
            startup_probe_delay: DEFAULT_STARTUP_PROBE_DELAY,
        }
    }

    pub fn with_startup_probe_delay(mut self, delay: Duration) -> Self {
        self.startup_probe_delay = delay;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.state();
        Snapshot {
            events: state.events.clone(),
            loading: state.in_flight > 0,
            waking: state.waking,
            error: state.error.clone(),
            warning: state.warning.clone(),
            stats: state.stats,
            phase: state.phase,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn find(&self, id: &EventId) -> Option<Event> {
        self.state().events.iter().find(|e| &e.id == id).cloned()
    }

    pub fn error(&self) -> Option<CalendarError> {
        self.state().error.clone()
    }

    pub fn warning(&self) -> Option<CalendarError> {
        self.state().warning.clone()
    }

    pub fn is_waking(&self) -> bool {
        self.state().waking
    }

    /// Index the current collection over `window`.
    pub fn index(&self, window: DateRange) -> EventIndex {
        let state = self.state();
        EventIndex::rebuild(&state.events, window)
    }

    /// Stop applying responses. Requests already in flight still complete,
    /// but their results no longer touch local state.
    pub fn shutdown(&self) {
        self.state().closed = true;
    }

    /// Clear the previous error and warning before a new operation.
    fn begin(&self) -> LoadingGuard<'_> {
        {
            let mut state = self.state();
            state.error = None;
            state.warning = None;
        }
        LoadingGuard::new(&self.state)
    }

    fn record_error(&self, err: &CalendarError) {
        let mut state = self.state();
        if state.closed {
            return;
        }
        state.error = Some(err.clone());
    }

    fn fail_mutation(&self, err: CalendarError) -> CalendarError {
        warn!(error = %err, "mutation failed");
        let mut state = self.state();
        if !state.closed {
            state.phase = MutationPhase::Failed;
            state.error = Some(err.clone());
        }
        err
    }

    /// Apply `f` to the state unless the controller has been shut down.
    /// Returns whether it was applied.
    fn apply(&self, what: &str, f: impl FnOnce(&mut State)) -> bool {
        let mut state = self.state();
        if state.closed {
            warn!(what, "discarding response that arrived after shutdown");
            return false;
        }
        f(&mut state);
        true
    }

    fn reserve(&self, id: &EventId) -> CalendarResult<PendingGuard<'_>> {
        let mut state = self.state();
        if !state.pending.insert(id.clone()) {
            warn!(%id, "rejecting change while another one on the same event is pending");
            return Err(CalendarError::Busy(id.clone()));
        }
        Ok(PendingGuard {
            state: &self.state,
            id: id.clone(),
        })
    }

    /// Probe the service, then load events and stats.
    ///
    /// If this is the first probe and it has not answered within the startup
    /// delay, the snapshot reports `waking` until it does.
    pub async fn connect(&self) -> CalendarResult<()> {
        let first = {
            let mut state = self.state();
            state.error = None;
            !std::mem::replace(&mut state.probed, true)
        };

        let result = {
            let _loading = LoadingGuard::new(&self.state);
            let mut ping = self.store.ping();
            if first {
                match tokio::time::timeout(self.startup_probe_delay, &mut ping).await {
                    Ok(result) => result,
                    Err(_) => {
                        info!("calendar service is slow to answer; probably waking up");
                        self.state().waking = true;
                        let result = ping.await;
                        self.state().waking = false;
                        result
                    }
                }
            } else {
                ping.await
            }
        };

        if let Err(err) = result {
            warn!(error = %err, "calendar service unreachable");
            self.record_error(&err);
            return Err(err);
        }

        self.list().await?;
        self.refresh_stats().await;
        Ok(())
    }

    /// Fetch the full collection and replace the local copy with it.
    ///
    /// On failure the local collection is left as it was.
    pub async fn list(&self) -> CalendarResult<Vec<Event>> {
        let _loading = self.begin();
        match self.store.list_events().await {
            Ok(events) => {
                debug!(count = events.len(), "loaded events");
                self.apply("list", |state| state.events = events.clone());
                Ok(events)
            }
            Err(err) => {
                warn!(error = %err, "failed to load events");
                self.record_error(&err);
                Err(err)
            }
        }
    }

    /// Create an event from `draft`.
    ///
    /// Invalid drafts fail without contacting the store. On success the
    /// server's copy is appended locally and the collection is refreshed.
    pub async fn create(&self, draft: &EventDraft) -> CalendarResult<Event> {
        let _loading = self.begin();
        let payload = draft
            .normalize()
            .map_err(|e| self.fail_mutation(e.into()))?;

        self.state().phase = MutationPhase::Pending;
        let event = self
            .store
            .create_event(&payload)
            .await
            .map_err(|e| self.fail_mutation(e))?;

        info!(id = %event.id, title = %event.title, "created event");
        let applied = self.apply("create", |state| {
            state.events.push(event.clone());
            state.phase = MutationPhase::Committed;
        });
        if applied {
            self.refresh_after_mutation().await;
        }
        Ok(event)
    }

    /// Replace event `id` with the contents of `draft`.
    ///
    /// Rejected with `Busy`, leaving the observable state alone, while another
    /// change to the same event is pending.
    pub async fn update(&self, id: &EventId, draft: &EventDraft) -> CalendarResult<Event> {
        let pending = self.reserve(id)?;
        let _loading = self.begin();
        let payload = draft
            .normalize()
            .map_err(|e| self.fail_mutation(e.into()))?;

        self.state().phase = MutationPhase::Pending;
        let event = self
            .store
            .update_event(id, &payload)
            .await
            .map_err(|e| self.fail_mutation(e))?;

        info!(%id, "updated event");
        let applied = self.apply("update", |state| {
            match state.events.iter_mut().find(|e| &e.id == id) {
                Some(existing) => *existing = event.clone(),
                None => state.events.push(event.clone()),
            }
            state.phase = MutationPhase::Committed;
        });
        drop(pending);
        if applied {
            self.refresh_after_mutation().await;
        }
        Ok(event)
    }

    /// Delete event `id`. On failure the event stays in the local collection.
    pub async fn delete(&self, id: &EventId) -> CalendarResult<()> {
        let pending = self.reserve(id)?;
        let _loading = self.begin();
        self.state().phase = MutationPhase::Pending;
        self.store
            .delete_event(id)
            .await
            .map_err(|e| self.fail_mutation(e))?;

        info!(%id, "deleted event");
        let applied = self.apply("delete", |state| {
            state.events.retain(|e| &e.id != id);
            state.phase = MutationPhase::Committed;
        });
        drop(pending);
        if applied {
            self.refresh_after_mutation().await;
        }
        Ok(())
    }

    /// Re-list after a committed mutation. Failure becomes a warning.
    async fn refresh_after_mutation(&self) {
        match self.store.list_events().await {
            Ok(events) => {
                self.apply("refresh", |state| state.events = events);
            }
            Err(err) => {
                warn!(error = %err, "refresh after change failed");
                self.apply("refresh", |state| state.warning = Some(err));
            }
        }
        self.refresh_stats().await;
    }

    /// Fetch summary counts. Informational: failure is only logged and the
    /// previous stats are kept.
    pub async fn refresh_stats(&self) -> Option<Stats> {
        match self.store.stats().await {
            Ok(stats) => {
                self.apply("stats", |state| state.stats = Some(stats));
                Some(stats)
            }
            Err(err) => {
                warn!(error = %err, "failed to load stats");
                None
            }
        }
    }

    /// Download the whole calendar as iCalendar data.
    pub async fn export_ics(&self) -> CalendarResult<Vec<u8>> {
        let _loading = self.begin();
        self.store.export_ics().await.inspect_err(|err| {
            warn!(error = %err, "calendar export failed");
            self.record_error(err);
        })
    }
}
