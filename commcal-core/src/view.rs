//! Month view model: the grid with each day's occurrences attached.

use crate::date_key::DateKey;
use crate::event::Event;
use crate::grid::{DayCell, MonthCursor};
use crate::index::{EventIndex, Occurrence};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewCell {
    pub day: DayCell,
    pub is_today: bool,
    /// The first occurrences of the day, in index order.
    pub visible: Vec<Occurrence>,
    /// Occurrences that did not fit, shown as "+N more".
    pub overflow: usize,
}

impl ViewCell {
    pub fn date(&self) -> DateKey {
        self.day.date
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.overflow
    }

    pub fn more_label(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{} more", self.overflow))
    }
}

#[derive(Debug, Clone)]
pub struct MonthView {
    pub cursor: MonthCursor,
    pub cells: Vec<ViewCell>,
}

impl MonthView {
    /// Lay out `cursor`'s month with the occurrences of `events`, indexed over
    /// the whole grid so padding days show their events too.
    pub fn build(
        cursor: MonthCursor,
        events: &[Event],
        today: DateKey,
        visible_per_day: usize,
    ) -> Self {
        let index = EventIndex::rebuild(events, cursor.window());
        Self::from_index(cursor, &index, today, visible_per_day)
    }

    pub fn from_index(
        cursor: MonthCursor,
        index: &EventIndex,
        today: DateKey,
        visible_per_day: usize,
    ) -> Self {
        let cells = cursor
            .grid()
            .into_iter()
            .map(|day| {
                let occurrences = index.lookup(&day.date);
                let shown = occurrences.len().min(visible_per_day);
                ViewCell {
                    day,
                    is_today: day.date == today,
                    visible: occurrences[..shown].to_vec(),
                    overflow: occurrences.len() - shown,
                }
            })
            .collect();

        MonthView { cursor, cells }
    }

    /// Cells grouped into Sunday-first weeks.
    pub fn weeks(&self) -> impl Iterator<Item = &[ViewCell]> {
        self.cells.chunks(7)
    }

    pub fn cell(&self, date: &DateKey) -> Option<&ViewCell> {
        self.cells.iter().find(|c| &c.day.date == date)
    }
}
