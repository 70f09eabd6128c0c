use anyhow::Result;
use owo_colors::OwoColorize;

use crate::client::Session;
use crate::render::Render;

pub async fn run() -> Result<()> {
    let session = Session::connect().await?;

    match session.controller.snapshot().stats {
        Some(stats) => println!("{}", stats.render()),
        None => println!("{}", "Stats are not available right now".yellow()),
    }

    Ok(())
}
