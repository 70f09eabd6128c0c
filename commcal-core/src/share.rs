//! Shareable deep links to a single event.
//!
//! A link is the calendar's own page with the event id in an `id` query
//! parameter. Decoding only consults events that are already loaded; it never
//! fetches.

use url::Url;

use crate::event::{Event, EventId};

const ID_PARAM: &str = "id";
const WHATSAPP_BASE: &str = "https://wa.me/";

#[derive(Debug, Clone)]
pub struct ShareLinkCodec {
    base: Url,
}

impl ShareLinkCodec {
    /// `base` is the origin and path links point at. Any query or fragment
    /// on it is dropped.
    pub fn new(mut base: Url) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        ShareLinkCodec { base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn encode(&self, event: &Event) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair(ID_PARAM, event.id.as_str());
        url
    }

    /// Find the linked event among `events`. `None` when the link carries no
    /// id or the event is not loaded.
    pub fn decode<'a>(&self, url: &Url, events: &'a [Event]) -> Option<&'a Event> {
        let id = event_id(url)?;
        events.iter().find(|e| e.id == id)
    }

    /// `mailto:` link with an invitation subject and the share text as body.
    pub fn mailto_link(&self, event: &Event) -> Option<Url> {
        let subject = format!("Invitation: {}", event.title);
        let body = format!(
            "{}\n\nView event details: {}",
            share_text(event),
            self.encode(event)
        );
        Url::parse(&format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(&subject),
            urlencoding::encode(&body)
        ))
        .ok()
    }

    /// WhatsApp "click to chat" link prefilled with the share text and link.
    pub fn whatsapp_link(&self, event: &Event) -> Option<Url> {
        let text = format!("{}\n{}", share_text(event), self.encode(event));
        Url::parse(&format!(
            "{}?text={}",
            WHATSAPP_BASE,
            urlencoding::encode(&text)
        ))
        .ok()
    }
}

/// The event id carried by a share link, if any.
pub fn event_id(url: &Url) -> Option<EventId> {
    url.query_pairs()
        .find(|(k, _)| k == ID_PARAM)
        .map(|(_, v)| EventId::new(v.into_owned()))
        .filter(|id| !id.as_str().is_empty())
}

/// e.g. "Join me for Book club on 2024-03-10 at 18:30".
pub fn share_text(event: &Event) -> String {
    let mut text = format!("Join me for {} on {}", event.title, event.date);
    if let Some(time) = event.time {
        text.push_str(&format!(" at {}", time.format("%H:%M")));
    }
    text
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn codec() -> ShareLinkCodec {
        ShareLinkCodec::new(Url::parse("https://calendar.example.org/community/?theme=dark#top").unwrap())
    }

    fn event(id: &str, title: &str) -> Event {
        Event {
            id: EventId::new(id),
            title: title.to_string(),
            description: None,
            date: "2024-03-10".parse().unwrap(),
            time: NaiveTime::from_hms_opt(18, 30, 0),
            organizer: None,
            recurrence: None,
        }
    }

    #[test]
    fn test_encode_uses_base_path() {
        let url = codec().encode(&event("17", "Book club"));
        assert_eq!(url.as_str(), "https://calendar.example.org/community/?id=17");
    }

    #[test]
    fn test_decode_finds_encoded_event() {
        let events = vec![event("1", "A"), event("17", "Book club"), event("3", "C")];
        let codec = codec();
        let url = codec.encode(&events[1]);
        assert_eq!(codec.decode(&url, &events), Some(&events[1]));
    }

    #[test]
    fn test_decode_not_loaded() {
        let codec = codec();
        let url = codec.encode(&event("99", "Elsewhere"));
        assert_eq!(codec.decode(&url, &[event("1", "A")]), None);
    }

    #[test]
    fn test_decode_ignores_other_params() {
        let events = vec![event("5", "E")];
        let url = Url::parse("https://other.example/?utm_source=mail&id=5&x=1").unwrap();
        assert_eq!(codec().decode(&url, &events), Some(&events[0]));

        let no_id = Url::parse("https://other.example/?utm_source=mail").unwrap();
        assert_eq!(codec().decode(&no_id, &events), None);
        let empty_id = Url::parse("https://other.example/?id=").unwrap();
        assert_eq!(codec().decode(&empty_id, &events), None);
    }

    #[test]
    fn test_share_text() {
        let mut e = event("1", "Book club");
        assert_eq!(share_text(&e), "Join me for Book club on 2024-03-10 at 18:30");
        e.time = None;
        assert_eq!(share_text(&e), "Join me for Book club on 2024-03-10");
    }

    #[test]
    fn test_mailto_and_whatsapp_links() {
        let e = event("17", "Book club");
        let mailto = codec().mailto_link(&e).unwrap();
        assert_eq!(mailto.scheme(), "mailto");
        assert!(mailto.as_str().contains("subject=Invitation%3A%20Book%20club"));
        assert!(mailto.as_str().contains("%3Fid%3D17"));

        let wa = codec().whatsapp_link(&e).unwrap();
        assert_eq!(wa.host_str(), Some("wa.me"));
        let text = wa.query_pairs().find(|(k, _)| k == "text").unwrap().1;
        assert!(text.starts_with("Join me for Book club"));
        assert!(text.ends_with("https://calendar.example.org/community/?id=17"));
    }
}
