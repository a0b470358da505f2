pub mod config;
pub mod into_utc_trait;
pub mod schedule_window;
pub mod spot_record;
pub mod week_bucket;
