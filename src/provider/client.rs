use crate::provider::error::ProviderError;
use crate::types::config::ProxyConfig;
use crate::types::schedule_window::ScheduleWindow;
use log::debug;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;

/// Fetches the raw schedule feed for one week window.
///
/// Implementations must not retry: a failed fetch is reported once and the caller
/// degrades it to an empty week.
pub trait ScheduleProvider: Send + Sync {
    fn fetch(
        &self,
        window: &ScheduleWindow,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

impl<T: ScheduleProvider> ScheduleProvider for Arc<T> {
    fn fetch(
        &self,
        window: &ScheduleWindow,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send {
        (**self).fetch(window)
    }
}

/// [`ScheduleProvider`] talking to the GroupEx embed endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpScheduleProvider {
    endpoint: String,
    client: Client,
}

impl HttpScheduleProvider {
    /// Builds a client honoring the configured connect and overall timeouts.
    pub fn new(config: &ProxyConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;
        Ok(Self::with_client(config.endpoint.clone(), client))
    }

    /// Uses an already configured `reqwest` client, e.g. one shared with other services.
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScheduleProvider for HttpScheduleProvider {
    async fn fetch(&self, window: &ScheduleWindow) -> Result<Vec<u8>, ProviderError> {
        let url = self.endpoint.clone();
        debug!("Requesting {} for week {}", url, window);

        let response = self
            .client
            .get(&url)
            .query(&window.query_params()[..])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                debug!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ProviderError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    ProviderError::NetworkRequest(url, e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::BodyRead(url.clone(), e))?;
        debug!("Received {} bytes for week {}", body.len(), window);
        Ok(body.to_vec())
    }
}
