use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_OUTPUT_FILE: &str = "digikala_comments.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Comments";

/// Excel refuses sheet names longer than this
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    // The API rejects requests without an ordinary browser user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_points_separator")]
    pub points_separator: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
}

fn default_base_url() -> String {
    "https://api.digikala.com".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0 Safari/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_pages() -> u32 {
    1000
}

fn default_delay_secs() -> f64 {
    0.5
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_points_separator() -> String {
    "\n".to_string()
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_delay_secs(),
            output: default_output(),
            points_separator: default_points_separator(),
            sheet_name: default_sheet_name(),
        }
    }
}

impl ExportConfig {
    /// Pause between page requests. Invalid values collapse to zero; `Config::validate` reports them.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or(Duration::ZERO)
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        Self::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config from {}: {}", path.display(), e))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("api.base_url cannot be empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow::anyhow!("api.timeout_secs must be greater than zero"));
        }
        if self.api.max_pages == 0 {
            return Err(anyhow::anyhow!("api.max_pages must be greater than zero"));
        }

        if !self.export.delay_secs.is_finite() || self.export.delay_secs < 0.0 {
            return Err(anyhow::anyhow!(
                "export.delay_secs must be a non-negative number, got {}",
                self.export.delay_secs
            ));
        }
        if self.export.points_separator.is_empty() {
            return Err(anyhow::anyhow!("export.points_separator cannot be empty"));
        }

        let sheet_name = &self.export.sheet_name;
        if sheet_name.trim().is_empty() {
            return Err(anyhow::anyhow!("export.sheet_name cannot be empty"));
        }
        if sheet_name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(anyhow::anyhow!(
                "export.sheet_name must be at most {} characters",
                MAX_SHEET_NAME_LEN
            ));
        }
        if let Some(bad) = sheet_name.chars().find(|c| "[]:*?/\\".contains(*c)) {
            return Err(anyhow::anyhow!("export.sheet_name cannot contain '{}'", bad));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_round_trips_through_file() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.api.timeout_secs = 5;
        config.export.delay_secs = 1.5;
        config.export.points_separator = "; ".to_string();

        std::fs::write(file.path(), toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.api.timeout_secs, 5);
        assert_eq!(loaded.api.base_url, "https://api.digikala.com");
        assert_eq!(loaded.export.delay_secs, 1.5);
        assert_eq!(loaded.export.points_separator, "; ");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[export]\ndelay_secs = 2.0\n").unwrap();
        assert_eq!(config.export.delay(), Duration::from_secs(2));
        assert_eq!(config.export.output, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(config.export.points_separator, "\n");
        assert_eq!(config.api.timeout(), Duration::from_secs(20));
        assert_eq!(config.api.max_pages, 1000);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.export.delay_secs, 0.5);
        assert_eq!(config.export.sheet_name, DEFAULT_SHEET_NAME);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.export.delay_secs = -1.0;
        assert!(config.validate().is_err());
        assert_eq!(config.export.delay(), Duration::ZERO);
        config.export.delay_secs = 0.0;
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.api.timeout_secs = 10;

        config.export.sheet_name = "Bad/Name".to_string();
        assert!(config.validate().is_err());
        config.export.sheet_name = "x".repeat(32);
        assert!(config.validate().is_err());
        config.export.sheet_name = "Reviews".to_string();
        assert!(config.validate().is_ok());

        config.export.points_separator = String::new();
        assert!(config.validate().is_err());
    }
}
