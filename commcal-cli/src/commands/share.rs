use anyhow::{Context, Result, bail};
use commcal_core::EventId;
use commcal_core::share::share_text;
use owo_colors::OwoColorize;

use crate::client::Session;

pub async fn run(id: EventId, email: bool, whatsapp: bool, launch: bool) -> Result<()> {
    let session = Session::connect().await?;
    let Some(event) = session.controller.find(&id) else {
        bail!("Event #{} not found", id);
    };
    let codec = session.share_codec()?;

    let link = if email {
        codec.mailto_link(&event)
    } else if whatsapp {
        codec.whatsapp_link(&event)
    } else {
        Some(codec.encode(&event))
    }
    .context("Could not build share link")?;

    if launch {
        open::that(link.as_str()).with_context(|| format!("Could not open {}", link))?;
        println!("{} {}", "Opened".green(), link.as_str().dimmed());
    } else {
        println!("{}", share_text(&event).dimmed());
        println!("{}", link);
    }

    Ok(())
}
