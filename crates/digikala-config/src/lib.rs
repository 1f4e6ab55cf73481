pub mod config;
pub mod paths;

pub use config::{ApiConfig, Config, ExportConfig, DEFAULT_OUTPUT_FILE, DEFAULT_SHEET_NAME};
pub use paths::{PathManager, CONFIG_ENV_VAR};
