use anyhow::{Context, Result};
use commcal_core::{MonthCursor, MonthView};

use super::today;
use crate::client::Session;
use crate::render::render_month;

pub async fn run(year: Option<i32>, month: Option<i32>, per_day: Option<usize>) -> Result<()> {
    let today = today();
    let cursor = resolve_month(MonthCursor::containing(today), year, month)?;

    let session = Session::connect().await?;
    let per_day = per_day.unwrap_or(session.config.visible_events_per_day);

    let index = session.controller.index(cursor.window());
    let view = MonthView::from_index(cursor, &index, today, per_day);
    println!("{}", render_month(&view));

    Ok(())
}

/// Fill in whichever of `year` / `month` is missing from `current`.
fn resolve_month(current: MonthCursor, year: Option<i32>, month: Option<i32>) -> Result<MonthCursor> {
    let year = year.unwrap_or(current.year());
    let month = month.unwrap_or(current.month() as i32);
    MonthCursor::normalized(year, month)
        .with_context(|| format!("Year {} is outside the supported range", year))
}
