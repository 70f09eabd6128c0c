//! HTTP client for the community calendar REST service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use tracing::debug;
use url::Url;

use super::EventStore;
use crate::config::CommcalConfig;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventId};
use crate::wire::{ErrorBody, EventPayload, EventRecord, Stats};

/// [`EventStore`] backed by the REST API under `base_url`
/// (e.g. `https://host/api`).
#[derive(Debug, Clone)]
pub struct HttpStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpStore {
    pub fn new(mut base_url: Url, timeout: Duration) -> CalendarResult<Self> {
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalendarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(HttpStore { http, base_url })
    }

    pub fn from_config(config: &CommcalConfig) -> CalendarResult<Self> {
        Self::new(config.api_base_url()?, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> CalendarResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| CalendarError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }

    fn event_endpoint(&self, id: &EventId) -> CalendarResult<Url> {
        self.endpoint(&format!("events/{}", urlencoding::encode(id.as_str())))
    }
}

/// Pass 2xx responses through; turn anything else into a typed error.
///
/// A 404 on a request that targets `id` is reported as `NotFound`.
async fn check(resp: Response, id: Option<&EventId>) -> CalendarResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(CalendarError::NotFound(id.clone()));
        }
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.message(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };

    Err(CalendarError::Remote {
        status: status.as_u16(),
        message,
    })
}

async fn decode_event(resp: Response) -> CalendarResult<Event> {
    let record: EventRecord = resp.json().await?;
    Event::try_from(record)
}

#[async_trait]
impl EventStore for HttpStore {
    async fn ping(&self) -> CalendarResult<()> {
        let url = self.endpoint("/")?;
        debug!(%url, "probing calendar service");
        let resp = self.http.get(url).send().await?;
        check(resp, None).await?;
        Ok(())
    }

    async fn list_events(&self) -> CalendarResult<Vec<Event>> {
        let url = self.endpoint("events")?;
        debug!(%url, "listing events");
        let resp = check(self.http.get(url).send().await?, None).await?;
        let records: Vec<EventRecord> = resp.json().await?;
        records.into_iter().map(Event::try_from).collect()
    }

    async fn create_event(&self, payload: &EventPayload) -> CalendarResult<Event> {
        let url = self.endpoint("events")?;
        debug!(%url, title = %payload.title, "creating event");
        let resp = self.http.post(url).json(payload).send().await?;
        decode_event(check(resp, None).await?).await
    }

    async fn update_event(&self, id: &EventId, payload: &EventPayload) -> CalendarResult<Event> {
        let url = self.event_endpoint(id)?;
        debug!(%url, "updating event");
        let resp = self.http.put(url).json(payload).send().await?;
        decode_event(check(resp, Some(id)).await?).await
    }

    async fn delete_event(&self, id: &EventId) -> CalendarResult<()> {
        let url = self.event_endpoint(id)?;
        debug!(%url, "deleting event");
        let resp = self.http.delete(url).send().await?;
        check(resp, Some(id)).await?;
        Ok(())
    }

    async fn stats(&self) -> CalendarResult<Stats> {
        let url = self.endpoint("stats")?;
        let resp = check(self.http.get(url).send().await?, None).await?;
        Ok(resp.json().await?)
    }

    async fn export_ics(&self) -> CalendarResult<Vec<u8>> {
        let url = self.endpoint("calendar/export.ics")?;
        debug!(%url, "exporting calendar");
        let resp = check(self.http.get(url).send().await?, None).await?;
        Ok(resp.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn store(server: &mockito::ServerGuard) -> HttpStore {
        let base = Url::parse(&format!("{}/api", server.url())).unwrap();
        HttpStore::new(base, Duration::from_secs(5)).unwrap()
    }

    fn payload() -> EventPayload {
        EventPayload {
            title: "Park cleanup".to_string(),
            description: None,
            event_date: "2024-04-20".parse().unwrap(),
            event_time: None,
            organizer: Some("Friends of the Park".to_string()),
            is_recurring: false,
            recurrence_type: None,
            recurrence_interval: None,
            recurrence_end_date: None,
        }
    }

    #[tokio::test]
    async fn list_events_decodes_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/events")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"id": 1, "title": "A", "event_date": "2024-04-01", "event_time": "10:00"},
                    {"id": 2, "title": "B", "event_date": "2024-04-02", "is_recurring": true,
                     "recurrence_type": "daily", "recurrence_interval": 2}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let events = store(&server).list_events().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, EventId::new("1"));
        assert!(events[1].is_recurring());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_event_sends_explicit_nulls() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/events")
            .match_body(Matcher::Json(json!({
                "title": "Park cleanup",
                "description": null,
                "event_date": "2024-04-20",
                "event_time": null,
                "organizer": "Friends of the Park",
                "is_recurring": false,
                "recurrence_type": null,
                "recurrence_interval": null,
                "recurrence_end_date": null
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"id": 9, "title": "Park cleanup", "event_date": "2024-04-20",
                       "organizer": "Friends of the Park"})
                .to_string(),
            )
            .create_async()
            .await;

        let event = store(&server).create_event(&payload()).await.unwrap();
        assert_eq!(event.id, EventId::new("9"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn remote_error_uses_detail() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/events")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(json!({"detail": "Event date is in the past"}).to_string())
            .create_async()
            .await;

        let err = store(&server).create_event(&payload()).await.unwrap_err();
        assert_eq!(
            err,
            CalendarError::Remote {
                status: 400,
                message: "Event date is in the past".to_string()
            }
        );
    }

    #[tokio::test]
    async fn remote_error_without_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/events")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await;

        let err = store(&server).list_events().await.unwrap_err();
        assert!(matches!(err, CalendarError::Remote { status: 503, .. }));
    }

    #[tokio::test]
    async fn update_missing_event_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("PUT", "/api/events/404")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(json!({"detail": "Event not found"}).to_string())
            .create_async()
            .await;

        let id = EventId::new("404");
        let err = store(&server)
            .update_event(&id, &payload())
            .await
            .unwrap_err();
        assert_eq!(err, CalendarError::NotFound(id));
    }

    #[tokio::test]
    async fn delete_event_accepts_no_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/events/5")
            .with_status(204)
            .create_async()
            .await;

        store(&server)
            .delete_event(&EventId::new("5"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn ping_hits_service_root() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("GET", "/").with_status(200).create_async().await;

        store(&server).ping().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn stats_and_export() {
        let mut server = mockito::Server::new_async().await;
        let _stats = server
            .mock("GET", "/api/stats")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"total_events": 12, "events_this_month": 3, "upcoming_events": 5})
                    .to_string(),
            )
            .create_async()
            .await;
        let _export = server
            .mock("GET", "/api/calendar/export.ics")
            .with_status(200)
            .with_header("content-type", "text/calendar")
            .with_body("BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n")
            .create_async()
            .await;

        let store = store(&server);
        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_events, 12);
        assert_eq!(stats.upcoming_events, 5);
        let ics = store.export_ics().await.unwrap();
        assert!(ics.starts_with(b"BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        // Nothing listens on port 9 (discard) on test hosts
        let store = HttpStore::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Duration::from_secs(2),
        )
        .unwrap();
        let err = store.list_events().await.unwrap_err();
        assert!(matches!(err, CalendarError::Transport(_)));
    }
}
