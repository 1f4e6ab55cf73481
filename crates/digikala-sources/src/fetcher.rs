use digikala_models::{CommentRecord, ProductId};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use crate::error::SourceError;
use crate::page::{comment_from_value, CommentPage};
use crate::traits::CommentPageSource;

#[cfg(test)]
mod tests;

pub const FIRST_PAGE: u32 = 1;

/// Upper bound on a server-requested Retry-After wait
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Floor for the rate-limit wait so a zero delay still backs off
const MIN_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(1);

/// Snapshot handed to the progress callback after each page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchProgress {
    pub page: u32,
    pub page_comments: usize,
    pub total_comments: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub comments: Vec<CommentRecord>,
    /// Pages that returned at least one comment
    pub pages: u32,
    /// Entries dropped because they could not be mapped to a record
    pub skipped: usize,
    pub rate_limit_retries: u32,
}

type ProgressCallback = Box<dyn Fn(FetchProgress) + Send + Sync>;

/// Walks the comments endpoint page by page, pausing between requests
pub struct CommentFetcher<S> {
    source: S,
    delay: Duration,
    max_pages: u32,
    on_progress: Option<ProgressCallback>,
}

impl<S: CommentPageSource> CommentFetcher<S> {
    pub fn new(source: S, delay: Duration) -> Self {
        Self {
            source,
            delay,
            max_pages: u32::MAX,
            on_progress: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_progress(
        mut self,
        callback: impl Fn(FetchProgress) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Box::new(callback));
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All comments for the product, in API page order
    pub async fn fetch_all(&self, product: ProductId) -> Result<Vec<CommentRecord>, SourceError> {
        Ok(self.fetch_report(product).await?.comments)
    }

    pub async fn fetch_report(&self, product: ProductId) -> Result<FetchReport, SourceError> {
        info!(product = %product, source = self.source.source_name(), "Fetching comments");

        let mut report = FetchReport {
            comments: Vec::new(),
            pages: 0,
            skipped: 0,
            rate_limit_retries: 0,
        };
        let mut page = FIRST_PAGE;

        loop {
            let payload = self.fetch_page_with_retry(product, page, &mut report).await?;
            let decoded = CommentPage::from_value(page, &payload)?;

            if decoded.is_empty() {
                info!(page, "No comments on page, stopping pagination");
                break;
            }

            report.pages += 1;
            let page_comments = self.collect_page(product, page, &decoded.items, &mut report);
            info!(page, page_comments, total = report.comments.len(), "Fetched comments page");

            if let Some(callback) = &self.on_progress {
                callback(FetchProgress {
                    page,
                    page_comments,
                    total_comments: report.comments.len(),
                    skipped: report.skipped,
                });
            }

            if decoded.has_next == Some(false) {
                debug!(page, "Pagination metadata reports no further pages");
                break;
            }
            if page >= self.max_pages {
                warn!(page, max_pages = self.max_pages, "Reached page limit, stopping pagination");
                break;
            }

            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            page += 1;
        }

        if report.skipped > 0 {
            warn!(
                product = %product,
                skipped = report.skipped,
                "Some comments could not be read and were skipped"
            );
        }
        info!(
            product = %product,
            comments = report.comments.len(),
            pages = report.pages,
            "Finished fetching comments"
        );
        Ok(report)
    }

    fn collect_page(
        &self,
        product: ProductId,
        page: u32,
        items: &[Value],
        report: &mut FetchReport,
    ) -> usize {
        let before = report.comments.len();
        for (index, item) in items.iter().enumerate() {
            match comment_from_value(item) {
                Ok(record) => report.comments.push(record),
                Err(reason) => {
                    report.skipped += 1;
                    warn!(product = %product, page, index, %reason, "Skipping malformed comment");
                }
            }
        }
        report.comments.len() - before
    }

    /// A 429 is retried exactly once after backing off; a second 429 is fatal
    async fn fetch_page_with_retry(
        &self,
        product: ProductId,
        page: u32,
        report: &mut FetchReport,
    ) -> Result<Value, SourceError> {
        match self.source.fetch_page(product, page).await {
            Err(SourceError::RateLimited { retry_after, .. }) => {
                let wait = self.rate_limit_backoff(retry_after);
                warn!(page, wait_secs = wait.as_secs_f64(), "Rate limited, retrying page once");
                sleep(wait).await;
                report.rate_limit_retries += 1;

                match self.source.fetch_page(product, page).await {
                    Err(SourceError::RateLimited { .. }) => Err(SourceError::api(
                        page,
                        "still rate limited (HTTP 429) after one retry; try a larger --delay",
                    )),
                    other => other,
                }
            }
            other => other,
        }
    }

    fn rate_limit_backoff(&self, retry_after: Option<Duration>) -> Duration {
        let requested = retry_after.map(|d| d.min(MAX_RETRY_AFTER)).unwrap_or_default();
        self.delay.max(requested).max(MIN_RATE_LIMIT_BACKOFF)
    }
}
