use async_trait::async_trait;
use digikala_models::ProductId;
use crate::error::SourceError;

/// One page of the comments endpoint, decoded to JSON but not yet interpreted
#[async_trait]
pub trait CommentPageSource: Send + Sync {
    fn source_name(&self) -> &str {
        "digikala"
    }

    /// Fetch a 1-based page. HTTP 429 must surface as `SourceError::RateLimited`.
    async fn fetch_page(
        &self,
        product: ProductId,
        page: u32,
    ) -> Result<serde_json::Value, SourceError>;
}
