//! Error types for the community calendar.

use thiserror::Error;

use crate::event::EventId;

/// Bad local input. Never sent over the wire.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event title is required")]
    EmptyTitle,

    #[error("Event date is required")]
    MissingDate,

    #[error("Recurrence interval must be at least 1 (got {0})")]
    NonPositiveInterval(i64),
}

/// Errors that can occur in calendar operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),

    #[error("Could not reach the calendar service: {0}")]
    Transport(String),

    #[error("Calendar service error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Event not found: {0}")]
    NotFound(EventId),

    #[error("Unexpected response from the calendar service: {0}")]
    MalformedResponse(String),

    #[error("Event {0} already has a change in flight")]
    Busy(EventId),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for CalendarError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CalendarError::MalformedResponse(err.to_string())
        } else {
            CalendarError::Transport(err.to_string())
        }
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
