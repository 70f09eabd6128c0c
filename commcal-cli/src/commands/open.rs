use anyhow::{Context, Result};
use commcal_core::share;
use owo_colors::OwoColorize;
use url::Url;

use crate::client::Session;
use crate::render::render_event_details;

pub async fn run(link: &str) -> Result<()> {
    let url = Url::parse(link).with_context(|| format!("Invalid link '{}'", link))?;
    let Some(id) = share::event_id(&url) else {
        anyhow::bail!("Link does not point at an event");
    };

    let session = Session::connect().await?;
    let events = session.controller.events();

    match session.share_codec()?.decode(&url, &events) {
        Some(event) => println!("{}", render_event_details(event)),
        None => println!("{}", format!("Event #{} not found", id).yellow()),
    }

    Ok(())
}
