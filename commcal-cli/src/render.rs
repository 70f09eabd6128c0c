//! TUI rendering traits for commcal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to commcal-core types using owo_colors.

use commcal_core::grid::WEEKDAY_NAMES;
use commcal_core::{Event, MonthView, Occurrence, Stats, ViewCell};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Width of one day column in the month grid, separator included.
const CELL_WIDTH: usize = 15;

fn render_time(event: &Event) -> String {
    match event.time {
        Some(t) => t.format("%H:%M").to_string(),
        None => "all day".to_string(),
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let mut line = format!(
            "{} {} {}",
            render_time(self).dimmed(),
            self.title.bold(),
            format!("#{}", self.id).dimmed()
        );
        if let Some(rule) = &self.recurrence {
            line.push_str(&format!(" {}", format!("↻ {}", rule.describe()).cyan()));
        }
        line
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        self.event.render()
    }
}

impl Render for Stats {
    fn render(&self) -> String {
        [
            format!("{} {}", "Total events:".dimmed(), self.total_events),
            format!("{} {}", "This month:".dimmed(), self.events_this_month),
            format!("{} {}", "Upcoming:".dimmed(), self.upcoming_events),
        ]
        .join("\n")
    }
}

/// Multi-line description of a single event.
pub fn render_event_details(event: &Event) -> String {
    let mut lines = vec![
        format!("📅 {}", event.title.bold()),
        format!("   {} {}", "When:".dimmed(), event.date),
    ];
    if let Some(time) = event.time {
        lines[1].push_str(&format!(" at {}", time.format("%H:%M")));
    }
    if let Some(rule) = &event.recurrence {
        lines.push(format!("   {} {}", "Repeats:".dimmed(), rule.describe()));
    }
    if let Some(organizer) = &event.organizer {
        lines.push(format!("   {} {}", "Organizer:".dimmed(), organizer));
    }
    if let Some(description) = &event.description {
        lines.push(String::new());
        lines.extend(description.lines().map(|l| format!("   {}", l)));
    }
    lines.join("\n")
}

fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    if text.chars().count() > width && width > 0 {
        out.pop();
        out.push('…');
    }
    format!("{:<width$}", out, width = width)
}

fn render_day_number(cell: &ViewCell) -> String {
    let text = fit(&format!("{:>2}", cell.date().day()), CELL_WIDTH - 1);
    if cell.is_today {
        text.reversed().bold().to_string()
    } else if cell.day.in_current_month {
        text.bold().to_string()
    } else {
        text.dimmed().to_string()
    }
}

/// Line `row` of a day cell below the day number.
fn render_cell_line(cell: &ViewCell, row: usize) -> String {
    let width = CELL_WIDTH - 1;
    if let Some(occurrence) = cell.visible.get(row) {
        let label = match occurrence.event.time {
            Some(t) => format!("{} {}", t.format("%H:%M"), occurrence.event.title),
            None => occurrence.event.title.clone(),
        };
        let text = fit(&label, width);
        if cell.day.in_current_month {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    } else if row == cell.visible.len() {
        match cell.more_label() {
            Some(more) => fit(&more, width).yellow().to_string(),
            None => " ".repeat(width),
        }
    } else {
        " ".repeat(width)
    }
}

/// The month as a Sunday-first grid, one block of lines per week.
pub fn render_month(view: &MonthView) -> String {
    let mut lines = vec![view.cursor.to_string().bold().to_string()];

    let header: Vec<String> = WEEKDAY_NAMES
        .iter()
        .map(|name| fit(name, CELL_WIDTH - 1).dimmed().to_string())
        .collect();
    lines.push(header.join(" "));

    for week in view.weeks() {
        let numbers: Vec<String> = week.iter().map(render_day_number).collect();
        lines.push(numbers.join(" "));

        let rows = week
            .iter()
            .map(|c| c.visible.len() + usize::from(c.overflow > 0))
            .max()
            .unwrap_or(0);
        for row in 0..rows {
            let cells: Vec<String> = week.iter().map(|c| render_cell_line(c, row)).collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }
    }

    lines.join("\n")
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("Choir", 8), "Choir   ");
        assert_eq!(fit("Community garden", 8), "Communi…");
        assert_eq!(fit("exactly8", 8), "exactly8");
    }

    #[test]
    fn pluralize_event() {
        assert_eq!(pluralize("event", 1), "event");
        assert_eq!(pluralize("event", 3), "events");
    }
}
