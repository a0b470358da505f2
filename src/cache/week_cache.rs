use crate::cache::error::CacheError;
use crate::clock::{Clock, SystemClock};
use crate::types::week_bucket::WeekBucket;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A cached week together with the unix time after which it is stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub bucket: WeekBucket,
    pub expires_at: i64,
}

impl CacheEntry {
    /// An entry stays valid up to and including its expiry second.
    pub fn is_expired(&self, now_unix: i64) -> bool {
        self.expires_at < now_unix
    }
}

/// Storage for computed weeks, keyed by `"<namespace>:<monday>"`.
///
/// Backends own expiry: `get` must not return an entry past its `expires_at`. The
/// week service treats every call as atomic and does no locking of its own around
/// them.
pub trait WeekCache: Send + Sync {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<WeekBucket>, CacheError>> + Send;

    fn set(
        &self,
        key: &str,
        bucket: &WeekBucket,
        expires_at: i64,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    fn invalidate(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send;
}

impl<T: WeekCache> WeekCache for Arc<T> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<WeekBucket>, CacheError>> + Send {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        bucket: &WeekBucket,
        expires_at: i64,
    ) -> impl Future<Output = Result<(), CacheError>> + Send {
        (**self).set(key, bucket, expires_at)
    }

    fn invalidate(&self, key: &str) -> impl Future<Output = Result<(), CacheError>> + Send {
        (**self).invalidate(key)
    }
}

/// In-process [`WeekCache`]. Expired entries are dropped lazily on read.
pub struct MemoryWeekCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryWeekCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of stored entries, including ones that expired but were not read since.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for MemoryWeekCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WeekCache for MemoryWeekCache {
    async fn get(&self, key: &str) -> Result<Option<WeekBucket>, CacheError> {
        let now = self.clock.now().timestamp();
        let mut entries = self.entries.lock().await;
        let expired = match entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => return Ok(None),
        };
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.bucket.clone()))
    }

    async fn set(&self, key: &str, bucket: &WeekBucket, expires_at: i64) -> Result<(), CacheError> {
        let entry = CacheEntry {
            bucket: bucket.clone(),
            expires_at,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}
