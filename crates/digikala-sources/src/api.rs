use async_trait::async_trait;
use digikala_config::ApiConfig;
use digikala_models::ProductId;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;
use crate::error::SourceError;
use crate::traits::CommentPageSource;


/// Longest error body echoed into an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Create a reqwest Client with browser-like headers; the API rejects bare clients
pub fn create_client(config: &ApiConfig) -> Result<Client, SourceError> {
    client_builder(config).build().map_err(SourceError::Client)
}

fn client_builder(config: &ApiConfig) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
}

/// Public comments endpoint: `GET {base_url}/v1/product/{id}/comments/?page={n}`
#[derive(Clone)]
pub struct DigikalaApi {
    client: Client,
    base_url: String,
}

impl DigikalaApi {
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        Ok(Self::with_client(create_client(config)?, config))
    }

    fn with_client(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn comments_url(&self, product: ProductId) -> String {
        format!("{}/v1/product/{}/comments/", self.base_url, product)
    }
}

#[async_trait]
impl CommentPageSource for DigikalaApi {
    async fn fetch_page(
        &self,
        product: ProductId,
        page: u32,
    ) -> Result<serde_json::Value, SourceError> {
        let url = self.comments_url(product);
        debug!(%url, page, "Requesting comments page");

        let response = self
            .client
            .get(&url)
            .query(&[("page", page)])
            .send()
            .await
            .map_err(|source| SourceError::Network { page, source })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
            return Err(SourceError::RateLimited { page, retry_after });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::api(
                page,
                format!("HTTP {} - {}", status, truncate(&error_text, MAX_ERROR_BODY_CHARS)),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|source| SourceError::Network { page, source })?;
        debug!(page, bytes = body.len(), "Received comments page");

        serde_json::from_str(&body).map_err(|e| {
            SourceError::api(
                page,
                format!(
                    "Received an invalid JSON response ({}), body starts with: {}",
                    e,
                    truncate(&body, MAX_ERROR_BODY_CHARS)
                ),
            )
        })
    }
}

/// Only the delta-seconds form is honoured; HTTP dates fall back to the configured delay
fn parse_retry_after(value: Option<&HeaderValue>) -> Option<Duration> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
