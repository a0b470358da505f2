mod cache;
mod clock;
mod error;
mod events;
mod provider;
mod schedule;
mod spots;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use error::SpotsError;
pub use spots::*;

pub use cache::disk_cache::DiskWeekCache;
pub use cache::error::CacheError;
pub use cache::week_cache::{CacheEntry, MemoryWeekCache, WeekCache};

pub use clock::{Clock, SystemClock};
pub use events::{EventSink, LogSink, SpotsEvent};

pub use provider::client::{HttpScheduleProvider, ScheduleProvider};
pub use provider::error::{PayloadError, ProviderError};
pub use provider::jsonp::{unwrap_jsonp, RawScheduleRow};

pub use schedule::date_bucketer::{class_date, class_start};
pub use schedule::error::{DateParseError, MarkupError, RowRejection};
pub use schedule::row_filter::{validate_row, ScheduleRow};
pub use schedule::spot_extractor::{extract_spots, SpotExtraction};
pub use schedule::{bucket_rows, process_row, RowOutcome, SkipReason};

pub use types::config::{
    ProxyConfig, FETCH_TIMEOUT, GXP_ENDPOINT, LEGACY_DAY_TTL, SYNC_WEEKS, WEEK_CACHE_NAMESPACE,
    WEEK_TTL,
};
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::schedule_window::ScheduleWindow;
pub use types::spot_record::SpotRecord;
pub use types::week_bucket::WeekBucket;
