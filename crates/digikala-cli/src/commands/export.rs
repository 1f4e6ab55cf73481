use crate::commands::export_ui::ExportUI;
use crate::output::{Output, OutputFormat};
use color_eyre::eyre::{eyre, Context, Result};
use digikala_config::{Config, PathManager};
use digikala_export::CommentExporter;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct ExportArgs {
    pub product: String,
    pub output: Option<PathBuf>,
    pub delay: Option<f64>,
    pub timeout: Option<u64>,
    pub config: Option<PathBuf>,
    pub show_progress: bool,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_file(path)
            .map_err(|e| eyre!("Failed to load config from {}: {:#}", path.display(), e)),
        None => {
            let path = PathManager::default().resolve_config_file(None);
            debug!(path = %path.display(), "Loading config");
            Config::load_or_default(&path).map_err(|e| eyre!("{:#}", e))
        }
    }
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut Config, args: &ExportArgs) {
    if let Some(output) = &args.output {
        config.export.output = output.clone();
    }
    if let Some(delay) = args.delay {
        config.export.delay_secs = delay;
    }
    if let Some(timeout) = args.timeout {
        config.api.timeout_secs = timeout;
    }
}

pub async fn run_export(args: ExportArgs, output: &Output) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    apply_overrides(&mut config, &args);

    let ui = ExportUI::new(args.show_progress);
    ui.set_message(format!("Fetching comments for {}", args.product));

    let progress_ui = ui.clone();
    let exporter = CommentExporter::from_config(&config)?
        .with_progress(move |progress| progress_ui.page_fetched(progress));

    let result = exporter.export(&args.product, &config.export.output).await;
    ui.finish();
    let summary = result?;

    info!(
        product = %summary.product_id,
        comments = summary.comments,
        pages = summary.pages,
        skipped = summary.skipped,
        elapsed_secs = summary.elapsed_secs,
        "Export finished"
    );

    match output.format() {
        OutputFormat::Human => {
            output.success(format!(
                "Saved {} comments to '{}'",
                summary.comments,
                summary.output.display()
            ));
            if summary.skipped > 0 {
                output.warn(format!(
                    "Skipped {} malformed comments (run with -v for details)",
                    summary.skipped
                ));
            }
            if summary.comments == 0 {
                output.info("The product has no comments; the file only contains the header row");
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let value = serde_json::to_value(&summary).wrap_err("Failed to serialize summary")?;
            output.json(&value);
        }
    }

    Ok(())
}
