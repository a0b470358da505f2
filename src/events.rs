//! Diagnostic events emitted by the week pipeline.
//!
//! The service never logs on its own; it reports what happened to an [`EventSink`].
//! [`LogSink`] forwards everything to the `log` facade, which is what production uses.

use chrono::NaiveDate;
use log::Level;
use std::fmt;

const LOG_TARGET: &str = "gxp_spots";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotsEvent {
    /// A week was served from the cache.
    CacheHit { key: String },
    /// A provider row lacked one of the fields the pipeline needs.
    RowSkipped { row: String, reason: String },
    /// The row has no signup widget, which means reservations are off for the class.
    NoSignupWidget { title: String },
    /// The signup fragment produced parser errors other than the known-benign ones.
    MarkupRejected { errors: Vec<String>, html: String },
    /// More than one qualifying anchor was found; only the last one was kept.
    MultipleSpotMatches { title: String, count: usize },
    /// The class date or start time did not match the expected format.
    UnparseableSchedule {
        title: String,
        day: String,
        location: String,
        error: String,
    },
    /// The fetch failed at the transport level.
    ProviderUnavailable { window: String, error: String },
    /// The provider answered but the body held nothing usable.
    PayloadUnusable { window: String, error: String },
    CacheReadFailed { key: String, error: String },
    CacheWriteFailed { key: String, error: String },
    /// The reference time could not be turned into a week window.
    InvalidReference { reference: String },
    /// A week was fetched from the provider and written to the cache.
    WeekFetched {
        start: NaiveDate,
        end: NaiveDate,
        classes: usize,
    },
}

impl SpotsEvent {
    pub fn level(&self) -> Level {
        match self {
            SpotsEvent::CacheHit { .. } | SpotsEvent::NoSignupWidget { .. } => Level::Debug,
            SpotsEvent::RowSkipped { .. }
            | SpotsEvent::MultipleSpotMatches { .. }
            | SpotsEvent::WeekFetched { .. } => Level::Info,
            SpotsEvent::MarkupRejected { .. }
            | SpotsEvent::UnparseableSchedule { .. }
            | SpotsEvent::ProviderUnavailable { .. }
            | SpotsEvent::PayloadUnusable { .. }
            | SpotsEvent::CacheReadFailed { .. }
            | SpotsEvent::CacheWriteFailed { .. }
            | SpotsEvent::InvalidReference { .. } => Level::Warn,
        }
    }
}

impl fmt::Display for SpotsEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotsEvent::CacheHit { key } => write!(f, "Cache hit for {}", key),
            SpotsEvent::RowSkipped { row, reason } => write!(
                f,
                "Skipped reservation from sync due to unexpected data ({}): {}",
                reason, row
            ),
            SpotsEvent::NoSignupWidget { title } => {
                write!(f, "No signup widget for \"{}\", reservations are off", title)
            }
            SpotsEvent::MarkupRejected { errors, html } => write!(
                f,
                "Can't load html from gxp schedule: {} HTML: {}",
                errors.join("; "),
                html
            ),
            SpotsEvent::MultipleSpotMatches { title, count } => write!(
                f,
                "Found {} signup anchors for \"{}\", keeping the last one",
                count, title
            ),
            SpotsEvent::UnparseableSchedule {
                title,
                day,
                location,
                error,
            } => write!(
                f,
                "Unexpected date or time format ({}). Reservation sync has been skipped. \
                 Please check \"{}\" for \"{}\" at location \"{}\" in groupex admin interface.",
                error, title, day, location
            ),
            SpotsEvent::ProviderUnavailable { window, error } => {
                write!(f, "Gxp endpoint not available for {}: {}", window, error)
            }
            SpotsEvent::PayloadUnusable { window, error } => write!(
                f,
                "Bad data from groupex for {}, treating as empty: {}",
                window, error
            ),
            SpotsEvent::CacheReadFailed { key, error } => {
                write!(f, "Failed to read cache entry {}: {}", key, error)
            }
            SpotsEvent::CacheWriteFailed { key, error } => {
                write!(f, "Failed to write cache entry {}: {}", key, error)
            }
            SpotsEvent::InvalidReference { reference } => {
                write!(f, "Cannot compute a schedule week for {}", reference)
            }
            SpotsEvent::WeekFetched {
                start,
                end,
                classes,
            } => write!(
                f,
                "Get data from gxp for {}:{} week ({} classes)",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d"),
                classes
            ),
        }
    }
}

/// Receives pipeline events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SpotsEvent);
}

/// Forwards events to the `log` facade at each event's level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: SpotsEvent) {
        log::log!(target: LOG_TARGET, event.level(), "{}", event);
    }
}
