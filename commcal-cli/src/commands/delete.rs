use anyhow::Result;
use commcal_core::EventId;
use owo_colors::OwoColorize;

use crate::client::Session;
use crate::utils::tui::with_spinner;

pub async fn run(id: EventId) -> Result<()> {
    let session = Session::connect().await?;
    let title = session.controller.find(&id).map(|e| e.title);

    with_spinner("Deleting event...", session.controller.delete(&id)).await?;

    match title {
        Some(title) => println!("{} {} {}", "Deleted".red(), title, format!("#{}", id).dimmed()),
        None => println!("{} {}", "Deleted".red(), format!("#{}", id).dimmed()),
    }
    session.report_warning();

    Ok(())
}
