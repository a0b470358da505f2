//! The week service: the main entry point of the crate.
//!
//! [`WeekDataService`] answers "how many spots are left in this week's classes" from
//! a TTL cache, falling back to the provider feed on a miss, and offers a sync run
//! that force-refreshes the upcoming weeks.

use crate::cache::disk_cache::DiskWeekCache;
use crate::cache::error::CacheError;
use crate::cache::week_cache::WeekCache;
use crate::clock::{Clock, SystemClock};
use crate::error::SpotsError;
use crate::events::{EventSink, LogSink, SpotsEvent};
use crate::provider::client::{HttpScheduleProvider, ScheduleProvider};
use crate::provider::jsonp::{unwrap_jsonp, RawScheduleRow};
use crate::schedule::bucket_rows;
use crate::types::config::ProxyConfig;
use crate::types::into_utc_trait::IntoUtcDateTime;
use crate::types::schedule_window::ScheduleWindow;
use crate::types::week_bucket::WeekBucket;
use crate::utils::error_chain;
use bon::bon;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;

/// One week refreshed by [`WeekDataService::sync`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedWeek {
    pub monday: NaiveDate,
    pub classes: usize,
}

/// Summary of a sync run, in the order the weeks were refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub weeks: Vec<SyncedWeek>,
}

/// Serves per-week spot counts from a cache, refreshing from the provider on demand.
///
/// Collaborators are injected: the provider client, the cache backend, an event sink
/// (defaults to [`LogSink`]) and a clock (defaults to [`SystemClock`]).
///
/// ```no_run
/// # use gxp_spots::{MemoryWeekCache, HttpScheduleProvider, ProxyConfig, WeekDataService, SpotsError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), SpotsError> {
/// let config = ProxyConfig::default();
/// let service = WeekDataService::builder()
///     .provider(HttpScheduleProvider::new(&config)?)
///     .cache(MemoryWeekCache::new())
///     .config(config)
///     .build();
///
/// let this_week = service.get_week_data(chrono::Utc::now(), false).await;
/// println!("{}", serde_json::to_string_pretty(&this_week).unwrap());
/// # Ok(())
/// # }
/// ```
pub struct WeekDataService<P, C> {
    provider: P,
    cache: C,
    config: ProxyConfig,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    // One lock per week so concurrent cold lookups share a single fetch.
    in_flight: GateMap,
}

#[bon]
impl<P: ScheduleProvider, C: WeekCache> WeekDataService<P, C> {
    #[builder]
    pub fn new(
        provider: P,
        cache: C,
        #[builder(default)] config: ProxyConfig,
        events: Option<Arc<dyn EventSink>>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            events: events.unwrap_or_else(|| Arc::new(LogSink)),
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
            in_flight: StdMutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Spot records for the site-local week containing `reference`, keyed by date.
    ///
    /// Served from the cache unless `force` is set or the entry is missing or stale.
    /// On refresh the provider is queried once; transport and payload problems are
    /// reported as events and produce an empty (but still cached) week. Never fails.
    pub async fn get_week_data<R>(&self, reference: R, force: bool) -> WeekBucket
    where
        R: IntoUtcDateTime + Debug,
    {
        let description = format!("{:?}", reference);
        let window = reference
            .into_utc()
            .and_then(|utc| ScheduleWindow::containing(utc, self.config.site_timezone));
        match window {
            Some(window) => self.week(&window, force).await,
            None => {
                self.events.emit(SpotsEvent::InvalidReference {
                    reference: description,
                });
                WeekBucket::default()
            }
        }
    }

    /// Force-refreshes the configured number of weeks, starting with the current one.
    pub async fn sync(&self) -> SyncReport {
        self.sync_weeks(self.config.sync_weeks).await
    }

    /// Force-refreshes `weeks` consecutive weeks starting from now, one at a time.
    pub async fn sync_weeks(&self, weeks: u32) -> SyncReport {
        let tz = self.config.site_timezone;
        let mut report = SyncReport::default();
        let mut local = self.clock.now().with_timezone(&tz);

        for _ in 0..weeks {
            let Some(window) = ScheduleWindow::containing(local.with_timezone(&Utc), tz) else {
                self.events.emit(SpotsEvent::InvalidReference {
                    reference: local.to_rfc3339(),
                });
                break;
            };
            let bucket = self.week(&window, true).await;
            report.weeks.push(SyncedWeek {
                monday: window.monday(),
                classes: bucket.class_count(),
            });

            match local.checked_add_days(Days::new(7)) {
                Some(next) => local = next,
                None => break,
            }
        }
        report
    }

    /// Drops the cached entry for the week containing `reference`.
    pub async fn invalidate_week<R: IntoUtcDateTime>(&self, reference: R) -> Result<(), CacheError> {
        let window = reference
            .into_utc()
            .and_then(|utc| ScheduleWindow::containing(utc, self.config.site_timezone));
        match window {
            Some(window) => {
                self.cache
                    .invalidate(&window.cache_key(&self.config.cache_namespace))
                    .await
            }
            None => Ok(()),
        }
    }

    async fn week(&self, window: &ScheduleWindow, force: bool) -> WeekBucket {
        let gate = WeekGate::enter(&self.in_flight, window.monday());
        let _in_flight = gate.lock.lock().await;
        self.load_week(window, force).await
    }

    async fn load_week(&self, window: &ScheduleWindow, force: bool) -> WeekBucket {
        let key = window.cache_key(&self.config.cache_namespace);
        if !force {
            match self.cache.get(&key).await {
                Ok(Some(bucket)) => {
                    self.events.emit(SpotsEvent::CacheHit { key });
                    return bucket;
                }
                Ok(None) => {}
                Err(e) => self.events.emit(SpotsEvent::CacheReadFailed {
                    key: key.clone(),
                    error: error_chain(&e),
                }),
            }
        }
        self.refresh(window, &key).await
    }

    async fn refresh(&self, window: &ScheduleWindow, key: &str) -> WeekBucket {
        let rows = self.fetch_rows(window).await;
        let bucket = bucket_rows(&rows, self.events.as_ref());

        let expires_at = expiry(self.clock.now(), &self.config);
        if let Err(e) = self.cache.set(key, &bucket, expires_at).await {
            self.events.emit(SpotsEvent::CacheWriteFailed {
                key: key.to_string(),
                error: error_chain(&e),
            });
        }

        self.events.emit(SpotsEvent::WeekFetched {
            start: window.start().date_naive(),
            end: window.end().date_naive(),
            classes: bucket.class_count(),
        });
        bucket
    }

    async fn fetch_rows(&self, window: &ScheduleWindow) -> Vec<RawScheduleRow> {
        let body = match self.provider.fetch(window).await {
            Ok(body) => body,
            Err(e) => {
                self.events.emit(SpotsEvent::ProviderUnavailable {
                    window: window.to_string(),
                    error: error_chain(&e),
                });
                return Vec::new();
            }
        };
        match unwrap_jsonp(&body) {
            Ok(rows) => rows,
            Err(e) => {
                self.events.emit(SpotsEvent::PayloadUnusable {
                    window: window.to_string(),
                    error: error_chain(&e),
                });
                Vec::new()
            }
        }
    }
}

type GateMap = StdMutex<HashMap<NaiveDate, Arc<Mutex<()>>>>;

/// Membership in one week's in-flight gate. Leaving, including by cancellation,
/// removes the gate once nobody else holds it.
struct WeekGate<'a> {
    gates: &'a GateMap,
    monday: NaiveDate,
    lock: Arc<Mutex<()>>,
}

impl<'a> WeekGate<'a> {
    fn enter(gates: &'a GateMap, monday: NaiveDate) -> Self {
        let lock = gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(monday)
            .or_default()
            .clone();
        Self {
            gates,
            monday,
            lock,
        }
    }
}

impl Drop for WeekGate<'_> {
    fn drop(&mut self) {
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // The map's copy plus ours.
        let unshared = gates
            .get(&self.monday)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2);
        if unshared {
            gates.remove(&self.monday);
        }
    }
}

impl WeekDataService<HttpScheduleProvider, DiskWeekCache> {
    /// Production wiring: HTTP provider plus the on-disk cache in the user cache dir.
    pub async fn with_disk_cache(config: ProxyConfig) -> Result<Self, SpotsError> {
        let provider = HttpScheduleProvider::new(&config)?;
        let cache = DiskWeekCache::new().await?;
        Ok(Self::builder()
            .provider(provider)
            .cache(cache)
            .config(config)
            .build())
    }
}

fn expiry(now: DateTime<Utc>, config: &ProxyConfig) -> i64 {
    let ttl = i64::try_from(config.week_ttl.as_secs()).unwrap_or(i64::MAX);
    now.timestamp().saturating_add(ttl)
}
