//! Row-by-row processing of a fetched schedule table.
//!
//! Each raw row goes through validation, signup scraping and date parsing and ends up
//! either bucketed or skipped with a reason. A bad row never affects its siblings.

pub mod date_bucketer;
pub mod error;
pub mod row_filter;
pub mod spot_extractor;

use crate::events::{EventSink, SpotsEvent};
use crate::provider::jsonp::RawScheduleRow;
use crate::schedule::date_bucketer::class_date;
use crate::schedule::error::{DateParseError, MarkupError, RowRejection};
use crate::schedule::row_filter::{validate_row, ScheduleRow};
use crate::schedule::spot_extractor::{extract_spots, SpotExtraction};
use crate::types::spot_record::SpotRecord;
use crate::types::week_bucket::WeekBucket;
use chrono::NaiveDate;

/// What happened to a single provider row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Bucketed { date: NaiveDate, record: SpotRecord },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Invalid(RowRejection),
    NoSignup,
    Markup(MarkupError),
    Schedule(DateParseError),
}

/// Runs one row through the pipeline, reporting anything noteworthy to `events`.
pub fn process_row(raw: &RawScheduleRow, events: &dyn EventSink) -> RowOutcome {
    let row = match validate_row(raw) {
        Ok(row) => row,
        Err(reason) => {
            events.emit(SpotsEvent::RowSkipped {
                row: serde_json::to_string(raw).unwrap_or_else(|_| format!("{:?}", raw)),
                reason: reason.to_string(),
            });
            return RowOutcome::Skipped(SkipReason::Invalid(reason));
        }
    };

    let record = match extract_spots(&row.html) {
        SpotExtraction::Found { record, candidates } => {
            if candidates > 1 {
                events.emit(SpotsEvent::MultipleSpotMatches {
                    title: row.title.clone(),
                    count: candidates,
                });
            }
            record
        }
        SpotExtraction::NoSignup => {
            events.emit(SpotsEvent::NoSignupWidget { title: row.title });
            return RowOutcome::Skipped(SkipReason::NoSignup);
        }
        SpotExtraction::Malformed(error) => {
            events.emit(SpotsEvent::MarkupRejected {
                errors: error.messages.clone(),
                html: row.html,
            });
            return RowOutcome::Skipped(SkipReason::Markup(error));
        }
    };

    match class_date(&row.date_text, &row.time_text) {
        Ok(date) => RowOutcome::Bucketed { date, record },
        Err(error) => {
            report_unparseable(&row, &error, events);
            RowOutcome::Skipped(SkipReason::Schedule(error))
        }
    }
}

/// Processes a whole table in order and groups the surviving records by date.
pub fn bucket_rows(rows: &[RawScheduleRow], events: &dyn EventSink) -> WeekBucket {
    let mut bucket = WeekBucket::default();
    for raw in rows {
        if let RowOutcome::Bucketed { date, record } = process_row(raw, events) {
            bucket.push(date, record);
        }
    }
    bucket
}

fn report_unparseable(row: &ScheduleRow, error: &DateParseError, events: &dyn EventSink) {
    events.emit(SpotsEvent::UnparseableSchedule {
        title: row.title.clone(),
        day: row.date_text.clone(),
        location: row.location.clone(),
        error: error.to_string(),
    });
}
