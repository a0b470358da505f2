pub mod disk_cache;
pub mod error;
pub mod week_cache;
