use crate::cache::error::CacheError;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "gxp_spots_cache";

pub fn get_cache_dir() -> Result<PathBuf, CacheError> {
    dirs::cache_dir()
        .ok_or(CacheError::CacheDirResolution)
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> Result<(), CacheError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(CacheError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| CacheError::CacheDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CacheError::CacheRead(path.to_path_buf(), e)),
    }
}

/// Renders an error followed by its `source()` chain, joined with `: `.
pub fn error_chain(error: &dyn Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
