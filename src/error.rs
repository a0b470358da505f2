use crate::cache::error::CacheError;
use crate::provider::error::ProviderError;
use thiserror::Error;

/// Failures while assembling a [`crate::WeekDataService`].
///
/// Lookups themselves never fail; see [`crate::WeekDataService::get_week_data`].
#[derive(Debug, Error)]
pub enum SpotsError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
