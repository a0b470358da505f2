//! Presence and type checks for the positional rows of the provider feed.

use crate::provider::jsonp::RawScheduleRow;
use crate::schedule::error::RowRejection;
use serde_json::Value;

// Positions of the fields the pipeline reads. The remaining cells (instructor,
// category, ...) are not used.
const COL_DATE: usize = 0;
const COL_TIME: usize = 1;
const COL_TITLE: usize = 2;
const COL_LOCATION: usize = 8;
const COL_HTML: usize = 9;

/// A provider row that passed validation, with just the fields the pipeline needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    /// e.g. "Monday, November 23, 2020"
    pub date_text: String,
    /// e.g. "6:00pm-7:00pm"
    pub time_text: String,
    pub title: String,
    pub location: String,
    /// Signup widget fragment.
    pub html: String,
}

/// Checks that a raw row carries all five required cells and extracts them.
///
/// A JSON `null` counts as absent. Strings are taken as-is and numbers are rendered
/// as text; any other cell type rejects the row.
pub fn validate_row(raw: &RawScheduleRow) -> Result<ScheduleRow, RowRejection> {
    let cells = raw.as_array().ok_or(RowRejection::NotAnArray)?;
    let field = |index: usize, name: &'static str| cell_text(cells, index, name);

    Ok(ScheduleRow {
        date_text: field(COL_DATE, "date")?,
        time_text: field(COL_TIME, "time")?,
        title: field(COL_TITLE, "title")?,
        location: field(COL_LOCATION, "location")?,
        html: field(COL_HTML, "signup html")?,
    })
}

fn cell_text(cells: &[Value], index: usize, field: &'static str) -> Result<String, RowRejection> {
    match cells.get(index) {
        None | Some(Value::Null) => Err(RowRejection::MissingField { field, index }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(RowRejection::UnsupportedField { field, index }),
    }
}
