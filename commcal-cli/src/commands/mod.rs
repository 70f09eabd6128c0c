pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod month;
pub mod new;
pub mod open;
pub mod share;
pub mod stats;

use commcal_core::{DateKey, EventDraft};

use crate::EventFields;

/// Today in the local timezone.
pub fn today() -> DateKey {
    DateKey::from(chrono::Local::now().date_naive())
}

/// Overwrite the draft fields that were given on the command line.
///
/// Any recurrence flag turns recurrence on, starting from the draft's
/// current rule or weekly/1.
pub fn apply_fields(draft: &mut EventDraft, fields: EventFields) {
    if let Some(date) = fields.date {
        draft.date = Some(date);
    }
    if let Some(time) = fields.time {
        draft.time = Some(time);
    }
    if let Some(description) = fields.description {
        draft.description = Some(description);
    }
    if let Some(organizer) = fields.organizer {
        draft.organizer = Some(organizer);
    }

    if fields.repeat.is_some() || fields.every.is_some() || fields.until.is_some() {
        let recurrence = draft.recurrence.get_or_insert_with(Default::default);
        if let Some(frequency) = fields.repeat {
            recurrence.frequency = frequency;
        }
        if let Some(every) = fields.every {
            recurrence.interval = every;
        }
        if let Some(until) = fields.until {
            recurrence.end_date = Some(until);
        }
    }
}
