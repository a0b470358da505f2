//! Runtime configuration for the spots proxy.

use bon::Builder;
use chrono_tz::Tz;
use std::time::Duration;

/// The provider's embed endpoint serving the JSONP schedule feed.
pub const GXP_ENDPOINT: &str = "https://www.groupexpro.com/schedule/embed/json.php";

/// Namespace prefix for week cache keys.
pub const WEEK_CACHE_NAMESPACE: &str = "gxp_spots_week";

/// Lifetime of a cached week.
pub const WEEK_TTL: Duration = Duration::from_secs(60 * 5);

/// Lifetime the retired single-day resource used for its entries. That path is not
/// served by this crate; the value is kept for deployments still tuning against it.
pub const LEGACY_DAY_TTL: Duration = Duration::from_secs(30);

/// Connect and overall timeout for the outbound fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Number of weeks refreshed by a sync run, starting with the current one.
pub const SYNC_WEEKS: u32 = 2;

/// Settings shared by the provider client, the cache and the week service.
///
/// Every field has a default, so `ProxyConfig::default()` matches production:
///
/// ```
/// use gxp_spots::ProxyConfig;
/// use std::time::Duration;
///
/// let config = ProxyConfig::builder()
///     .week_ttl(Duration::from_secs(60))
///     .site_timezone(chrono_tz::America::Denver)
///     .build();
/// assert_eq!(config.sync_weeks, 2);
/// assert_eq!(config.week_ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ProxyConfig {
    #[builder(into, default = GXP_ENDPOINT.to_string())]
    pub endpoint: String,
    #[builder(into, default = WEEK_CACHE_NAMESPACE.to_string())]
    pub cache_namespace: String,
    #[builder(default = WEEK_TTL)]
    pub week_ttl: Duration,
    #[builder(default = FETCH_TIMEOUT)]
    pub connect_timeout: Duration,
    #[builder(default = FETCH_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default = SYNC_WEEKS)]
    pub sync_weeks: u32,
    /// Timezone the site's calendar (and the provider's date texts) are expressed in.
    #[builder(default = chrono_tz::America::Chicago)]
    pub site_timezone: Tz,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
