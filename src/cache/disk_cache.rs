//! File-per-week cache under the user's cache directory.
//!
//! Each key maps to one bincode-encoded [`CacheEntry`]. Writes go through a temporary
//! file in the same directory and are renamed into place, so readers never see a
//! partial entry.

use crate::cache::error::CacheError;
use crate::cache::week_cache::{CacheEntry, WeekCache};
use crate::clock::{Clock, SystemClock};
use crate::types::week_bucket::WeekBucket;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

pub struct DiskWeekCache {
    cache_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl DiskWeekCache {
    /// Uses `<user cache dir>/gxp_spots_cache`, creating it if needed.
    pub async fn new() -> Result<Self, CacheError> {
        let cache_dir = get_cache_dir()?;
        Self::with_cache_folder(cache_dir).await
    }

    pub async fn with_cache_folder(cache_dir: PathBuf) -> Result<Self, CacheError> {
        Self::with_cache_folder_and_clock(cache_dir, Arc::new(SystemClock)).await
    }

    pub async fn with_cache_folder_and_clock(
        cache_dir: PathBuf,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CacheError> {
        ensure_cache_dir_exists(&cache_dir).await?;
        Ok(Self { cache_dir, clock })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.cache_dir.join(format!("{}.bin", file_name))
    }

    fn decode_entry(bytes: &[u8], path: &Path) -> Result<CacheEntry, CacheError> {
        let (entry, _) = bincode::serde::decode_from_slice::<CacheEntry, _>(bytes, BINCODE_CONFIG)
            .map_err(|e| CacheError::CacheDecode(path.to_path_buf(), Box::new(e)))?;
        Ok(entry)
    }

    fn write_entry(entry: &CacheEntry, dir: &Path, path: &Path) -> Result<(), CacheError> {
        let bytes = bincode::serde::encode_to_vec(entry, BINCODE_CONFIG)
            .map_err(|e| CacheError::CacheEncode(Box::new(e)))?;
        let mut temp_file =
            NamedTempFile::new_in(dir).map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e))?;
        temp_file
            .persist(path)
            .map_err(|e| CacheError::CacheWrite(path.to_path_buf(), e.error))?;
        Ok(())
    }

    async fn remove(path: &Path) -> Result<(), CacheError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::CacheDelete(path.to_path_buf(), e)),
        }
    }
}

impl WeekCache for DiskWeekCache {
    async fn get(&self, key: &str) -> Result<Option<WeekBucket>, CacheError> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::CacheRead(path, e)),
        };

        let decode_path = path.clone();
        let entry =
            tokio::task::spawn_blocking(move || Self::decode_entry(&bytes, &decode_path)).await??;

        if entry.is_expired(self.clock.now().timestamp()) {
            debug!("Cache entry {} expired, removing {:?}", key, path);
            Self::remove(&path).await?;
            return Ok(None);
        }
        Ok(Some(entry.bucket))
    }

    async fn set(&self, key: &str, bucket: &WeekBucket, expires_at: i64) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        let dir = self.cache_dir.clone();
        let entry = CacheEntry {
            bucket: bucket.clone(),
            expires_at,
        };
        let write_path = path.clone();
        tokio::task::spawn_blocking(move || Self::write_entry(&entry, &dir, &write_path)).await??;
        info!("Cached week {} to {:?}", key, path);
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        Self::remove(&self.entry_path(key)).await
    }
}
