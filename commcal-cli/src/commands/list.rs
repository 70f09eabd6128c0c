use anyhow::Result;
use commcal_core::{DateRange, MonthCursor};
use owo_colors::OwoColorize;

use super::today;
use crate::client::Session;
use crate::render::{Render, pluralize};

pub async fn run(from: Option<String>, to: Option<String>) -> Result<()> {
    let default = MonthCursor::containing(today()).days();
    let range = DateRange::from_args(from.as_deref(), to.as_deref(), default)?;
    if range.is_empty() {
        anyhow::bail!("--from must not be after --to");
    }

    let session = Session::connect().await?;
    let index = session.controller.index(range);

    println!("{}", range.to_string().dimmed());
    if index.is_empty() {
        println!("   {}", "No events".dimmed());
        return Ok(());
    }

    for (date, occurrences) in index.days() {
        println!();
        println!("{} {}", date.to_string().bold(), date.as_naive().format("%A").dimmed());
        for occurrence in occurrences {
            println!("   {}", occurrence.render());
        }
    }

    println!(
        "\n{} {}",
        index.len(),
        pluralize("occurrence", index.len())
    );
    Ok(())
}
