//! Turns the provider's date and time texts into the site-local class date.

use crate::schedule::error::DateParseError;
use chrono::{NaiveDate, NaiveDateTime};

/// `Monday, November 23, 2020 6:00pm`
const CLASS_START_FORMAT: &str = "%A, %B %d, %Y %I:%M%p";

/// Parses the class start and returns its calendar date.
///
/// `time_text` is a range such as `"6:00pm-7:00pm"` or `"6pm-7pm"`; only the start is
/// read. Both texts are in the site's local time, so no timezone conversion happens.
///
/// ```
/// use chrono::NaiveDate;
/// use gxp_spots::class_date;
///
/// let date = class_date("Monday, November 23, 2020", "6pm-7pm").unwrap();
/// assert_eq!(date, NaiveDate::from_ymd_opt(2020, 11, 23).unwrap());
/// ```
pub fn class_date(date_text: &str, time_text: &str) -> Result<NaiveDate, DateParseError> {
    class_start(date_text, time_text).map(|start| start.date())
}

/// Parses the class start as a local date and time.
pub fn class_start(date_text: &str, time_text: &str) -> Result<NaiveDateTime, DateParseError> {
    let start_time = time_text.split('-').next().unwrap_or_default().trim();
    if start_time.is_empty() {
        return Err(DateParseError::EmptyTime);
    }

    let text = format!("{} {}", date_text.trim(), with_minutes(start_time));
    NaiveDateTime::parse_from_str(&text, CLASS_START_FORMAT)
        .map_err(|source| DateParseError::Format { text, source })
}

// The feed sometimes drops the minutes ("6pm"); chrono needs them.
fn with_minutes(time: &str) -> String {
    if time.contains(':') {
        return time.to_string();
    }
    let suffix_at = time
        .char_indices()
        .find(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(time.len());
    let (hour, suffix) = time.split_at(suffix_at);
    format!("{}:00{}", hour.trim_end(), suffix)
}
