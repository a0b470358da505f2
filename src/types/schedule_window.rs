//! The week-shaped query window sent to the schedule provider.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Hour (UTC) at which the provider's week starts. Classes before Monday 18:00 are
/// not part of the feed's week.
const WINDOW_START_HOUR: u32 = 18;

/// A `[start, end]` UTC range covering one site-local week of classes.
///
/// The window is anchored on the Monday of the week that contains a reference
/// time, interpreted in the site timezone. That Monday's local midnight is moved to
/// UTC, and the resulting UTC date at 18:00 is the start. The end is six days later
/// at 23:59 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleWindow {
    monday: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ScheduleWindow {
    /// Computes the window for the site-local week containing `reference`.
    ///
    /// Returns `None` only when the date arithmetic leaves chrono's supported range.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use gxp_spots::ScheduleWindow;
    ///
    /// // Wednesday noon in Minneapolis.
    /// let reference = Utc.with_ymd_and_hms(2020, 11, 25, 18, 0, 0).unwrap();
    /// let window = ScheduleWindow::containing(reference, chrono_tz::America::Chicago).unwrap();
    ///
    /// assert_eq!(window.monday().to_string(), "2020-11-23");
    /// assert_eq!(window.start(), Utc.with_ymd_and_hms(2020, 11, 23, 18, 0, 0).unwrap());
    /// assert_eq!(window.end(), Utc.with_ymd_and_hms(2020, 11, 29, 23, 59, 0).unwrap());
    /// ```
    pub fn containing(reference: DateTime<Utc>, site_timezone: Tz) -> Option<Self> {
        let local_date = reference.with_timezone(&site_timezone).date_naive();
        let since_monday = u64::from(local_date.weekday().num_days_from_monday());
        let monday = local_date.checked_sub_days(Days::new(since_monday))?;

        let midnight_utc = local_midnight_in_utc(monday, site_timezone)?;
        let start = midnight_utc
            .date_naive()
            .and_hms_opt(WINDOW_START_HOUR, 0, 0)?
            .and_utc();
        let end = start
            .date_naive()
            .checked_add_days(Days::new(6))?
            .and_hms_opt(23, 59, 0)?
            .and_utc();

        Some(Self { monday, start, end })
    }

    /// The site-local Monday this window belongs to. Used as the cache key date.
    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_unix(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_unix(&self) -> i64 {
        self.end.timestamp()
    }

    /// Cache key for this week: `"<namespace>:<Y-m-d of the local Monday>"`.
    pub fn cache_key(&self, namespace: &str) -> String {
        week_cache_key(namespace, self.monday)
    }

    /// Query parameters understood by the provider's embed endpoint.
    pub(crate) fn query_params(&self) -> [(&'static str, String); 4] {
        [
            ("schedule", String::new()),
            ("a", "3".to_string()),
            ("start", self.start_unix().to_string()),
            ("end", self.end_unix().to_string()),
        ]
    }
}

/// Formats the window the way the fetch summary reports it: `start:end` as UTC dates.
impl fmt::Display for ScheduleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

pub(crate) fn week_cache_key(namespace: &str, monday: NaiveDate) -> String {
    format!("{}:{}", namespace, monday.format("%Y-%m-%d"))
}

// Some zones skip local midnight on DST change days; take the first instant after the gap.
fn local_midnight_in_utc(day: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    let midnight: NaiveDateTime = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}
