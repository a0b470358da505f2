use thiserror::Error;

/// Transport-level failures talking to the schedule provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    BodyRead(String, #[source] reqwest::Error),
}

/// The provider answered, but the body does not hold a schedule table.
///
/// None of these are fatal: the week service treats each as "provider returned nothing".
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Response body is empty")]
    Empty,

    #[error("Response body is not valid UTF-8")]
    NotUtf8(#[from] std::str::Utf8Error),

    #[error("Response body is not valid JSON after unwrapping")]
    Decode(#[from] serde_json::Error),

    #[error("Response decoded to an empty document")]
    EmptyDocument,

    #[error("Response has no aaData table")]
    MissingTable,

    #[error("aaData is not an array")]
    TableNotArray,
}
