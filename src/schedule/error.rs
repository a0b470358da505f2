use thiserror::Error;

/// Why a raw provider row could not be turned into a [`crate::schedule::row_filter::ScheduleRow`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowRejection {
    #[error("row is not an array")]
    NotAnArray,

    #[error("missing {field} (index {index})")]
    MissingField { field: &'static str, index: usize },

    #[error("{field} (index {index}) is not text")]
    UnsupportedField { field: &'static str, index: usize },
}

/// The signup fragment could not be parsed cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed signup markup: {}", .messages.join("; "))]
pub struct MarkupError {
    pub messages: Vec<String>,
}

/// The class date or start time did not follow `Weekday, Month Day, Year` + `6pm`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("time text is empty")]
    EmptyTime,

    #[error("cannot parse \"{text}\" as a class start")]
    Format {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}
