use clap::{ArgAction, Parser};
use commands::export::{self, ExportArgs};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "digikala-comments")]
#[command(about = "Export the public comments of a Digikala product to an Excel (.xlsx) file")]
#[command(version)]
struct Cli {
    /// Product URL, 'dkp-<id>' identifier or numeric product id
    /// (e.g. https://www.digikala.com/product/dkp-7068663/)
    product: String,

    /// Path of the spreadsheet to create [default: digikala_comments.xlsx]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Seconds to wait between page requests; raise it if you hit rate limits [default: 0.5]
    #[arg(long, value_name = "SECONDS", value_parser = parse_delay)]
    delay: Option<f64>,

    /// Per-request timeout in seconds [default: 20]
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Format of the result message
    #[arg(long, default_value = "human", value_enum)]
    format: output::OutputFormat,

    /// Write logs to a daily rotated file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_delay(value: &str) -> Result<f64, String> {
    let delay: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if !delay.is_finite() || delay < 0.0 {
        return Err(format!("delay must be zero or more seconds, got {}", value));
    }
    Ok(delay)
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let show_progress = !cli.quiet
        && cli.format == output::OutputFormat::Human
        && commands::export_ui::is_interactive();
    logging::init_logging_with_file(cli.verbose, cli.quiet, show_progress, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.format, cli.quiet);

    let args = ExportArgs {
        product: cli.product,
        output: cli.output,
        delay: cli.delay,
        timeout: cli.timeout,
        config: cli.config,
        show_progress,
    };
    export::run_export(args, &output).await
}
