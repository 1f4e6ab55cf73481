use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid product reference '{0}': provide a Digikala product URL, 'dkp-<id>' or the numeric product id")]
    InvalidReference(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Network error while fetching page {page}: {source}")]
    Network {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 429; the fetcher retries the page once before giving up
    #[error("Rate limited by Digikala while fetching page {page}")]
    RateLimited {
        page: u32,
        retry_after: Option<Duration>,
    },

    #[error("Digikala API error on page {page}: {message}")]
    Api { page: u32, message: String },
}

impl SourceError {
    pub fn api(page: u32, message: impl Into<String>) -> Self {
        SourceError::Api {
            page,
            message: message.into(),
        }
    }
}
