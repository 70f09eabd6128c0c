use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::client::Session;
use crate::utils::tui::with_spinner;

pub async fn run(output: PathBuf) -> Result<()> {
    let session = Session::connect().await?;
    let ics = with_spinner("Exporting calendar...", session.controller.export_ics()).await?;

    std::fs::write(&output, &ics)
        .with_context(|| format!("Could not write {}", output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "Exported to".green(),
        output.display(),
        ics.len()
    );
    Ok(())
}
