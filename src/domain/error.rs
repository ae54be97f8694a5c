use thiserror::Error;

use crate::domain::calendar::CalendarDay;

/// Rejection raised when an API payload cannot be turned into domain values.
///
/// Missing data is never an error here: empty lists and absent metric values
/// have defined fallbacks. Only payloads of the wrong shape end up as a
/// `DataError`, and the whole call is rejected when they do.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("expected a JSON array of {what}")]
    NotAnArray { what: &'static str },

    #[error("unparsable timestamp {value:?}")]
    MalformedTimestamp { value: String },

    #[error("date interval starts after it ends ({from} > {to})")]
    InvertedInterval { from: CalendarDay, to: CalendarDay },

    #[error("invalid JSON payload")]
    Json(#[from] serde_json::Error),
}
