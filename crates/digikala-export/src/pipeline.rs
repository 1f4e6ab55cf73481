use chrono::{DateTime, Utc};
use digikala_config::Config;
use digikala_models::ProductId;
use digikala_sources::{resolve, CommentFetcher, CommentPageSource, DigikalaApi, FetchProgress};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use crate::error::ExportError;
use crate::writer::SpreadsheetWriter;

/// Outcome of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub product_id: ProductId,
    pub comments: usize,
    pub pages: u32,
    pub skipped: usize,
    pub rate_limit_retries: u32,
    pub output: PathBuf,
    pub elapsed_secs: f64,
    pub finished_at: DateTime<Utc>,
}

/// Resolve, fetch every page, then write the workbook
pub struct CommentExporter<S> {
    fetcher: CommentFetcher<S>,
    writer: SpreadsheetWriter,
}

impl CommentExporter<DigikalaApi> {
    /// Exporter backed by the live API. The config is validated first.
    pub fn from_config(config: &Config) -> Result<Self, ExportError> {
        config
            .validate()
            .map_err(|e| ExportError::Config(e.to_string()))?;

        let api = DigikalaApi::new(&config.api)?;
        let fetcher = CommentFetcher::new(api, config.export.delay())
            .with_max_pages(config.api.max_pages);
        Ok(Self::new(fetcher, SpreadsheetWriter::from_config(&config.export)))
    }
}

impl<S: CommentPageSource> CommentExporter<S> {
    pub fn new(fetcher: CommentFetcher<S>, writer: SpreadsheetWriter) -> Self {
        Self { fetcher, writer }
    }

    pub fn with_progress(
        mut self,
        callback: impl Fn(FetchProgress) + Send + Sync + 'static,
    ) -> Self {
        self.fetcher = self.fetcher.with_progress(callback);
        self
    }

    pub fn fetcher(&self) -> &CommentFetcher<S> {
        &self.fetcher
    }

    pub async fn export(
        &self,
        reference: &str,
        output: &Path,
    ) -> Result<ExportSummary, ExportError> {
        let start = Instant::now();
        let product_id = resolve(reference)?;
        info!(product = %product_id, output = %output.display(), "Exporting comments");

        let report = self.fetcher.fetch_report(product_id).await?;
        self.writer.write(&report.comments, output)?;

        Ok(ExportSummary {
            product_id,
            comments: report.comments.len(),
            pages: report.pages,
            skipped: report.skipped,
            rate_limit_retries: report.rate_limit_retries,
            output: output.to_path_buf(),
            elapsed_secs: start.elapsed().as_secs_f64(),
            finished_at: Utc::now(),
        })
    }
}
