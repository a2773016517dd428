// HTTP adapter construction errors
// Call-time failures are reported as `StoreError` through the port instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpStoreError {
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported base URL: {0}")]
    UnsupportedUrl(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
