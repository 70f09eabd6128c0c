use anyhow::Result;
use commcal_core::EventDraft;
use owo_colors::OwoColorize;

use super::apply_fields;
use crate::EventFields;
use crate::client::Session;
use crate::render::render_event_details;
use crate::utils::tui::with_spinner;

pub async fn run(title: String, fields: EventFields) -> Result<()> {
    let mut draft = EventDraft {
        title,
        ..Default::default()
    };
    apply_fields(&mut draft, fields);

    // Fail before connecting when the draft can never be valid
    draft.normalize()?;

    let session = Session::connect().await?;
    let event = with_spinner("Creating event...", session.controller.create(&draft)).await?;

    println!("{} {}", "Created".green(), format!("#{}", event.id).dimmed());
    println!("{}", render_event_details(&event));
    session.report_warning();

    Ok(())
}
