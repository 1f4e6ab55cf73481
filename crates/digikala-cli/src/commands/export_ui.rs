use digikala_sources::FetchProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner shown while pages are fetched. Without a terminal, progress goes to the log instead.
#[derive(Clone)]
pub struct ExportUI {
    spinner: ProgressBar,
    interactive: bool,
}

impl ExportUI {
    pub fn new(show_progress: bool) -> Self {
        if !show_progress {
            return Self {
                spinner: ProgressBar::hidden(),
                interactive: false,
            };
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));

        Self {
            spinner,
            interactive: true,
        }
    }

    pub fn set_message(&self, msg: String) {
        if self.interactive {
            self.spinner.set_message(msg);
        } else {
            tracing::info!(operation = "progress", message = %msg, "Progress update");
        }
    }

    pub fn page_fetched(&self, progress: FetchProgress) {
        if self.interactive {
            let skipped = if progress.skipped > 0 {
                format!(", {} skipped", progress.skipped)
            } else {
                String::new()
            };
            self.spinner.set_message(format!(
                "Page {}: {} comments so far{}",
                progress.page, progress.total_comments, skipped
            ));
        } else {
            tracing::info!(
                operation = "progress",
                page = progress.page,
                page_comments = progress.page_comments,
                total_comments = progress.total_comments,
                skipped = progress.skipped,
                "Fetch progress update"
            );
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.spinner.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
