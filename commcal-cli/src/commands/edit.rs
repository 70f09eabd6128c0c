use anyhow::{Result, bail};
use commcal_core::{EventDraft, EventId};
use owo_colors::OwoColorize;

use super::apply_fields;
use crate::EventFields;
use crate::client::Session;
use crate::render::render_event_details;
use crate::utils::tui::with_spinner;

pub async fn run(
    id: EventId,
    title: Option<String>,
    fields: EventFields,
    no_repeat: bool,
    all_day: bool,
) -> Result<()> {
    let session = Session::connect().await?;
    let Some(existing) = session.controller.find(&id) else {
        bail!("Event #{} not found", id);
    };

    let mut draft = EventDraft::from(&existing);
    if let Some(title) = title {
        draft.title = title;
    }
    apply_fields(&mut draft, fields);
    if no_repeat {
        draft.recurrence = None;
    }
    if all_day {
        draft.time = None;
    }

    let event = with_spinner("Saving event...", session.controller.update(&id, &draft)).await?;

    println!("{} {}", "Updated".yellow(), format!("#{}", event.id).dimmed());
    println!("{}", render_event_details(&event));
    session.report_warning();

    Ok(())
}
