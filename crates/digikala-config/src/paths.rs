use anyhow::Result;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV_VAR: &str = "DIGIKALA_COMMENTS_CONFIG";

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("digikala-comments");

        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Pick the config file to read: explicit path, then the environment
    /// variable, then the platform config directory
    pub fn resolve_config_file(&self, explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => self.config_file(),
        }
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Fall back to the working directory when no platform config dir exists (e.g. minimal containers)
        Self::new().unwrap_or_else(|_| Self::with_config_dir(PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_location() {
        let paths = PathManager::with_config_dir(PathBuf::from("/etc/dk"));
        assert_eq!(paths.config_file(), PathBuf::from("/etc/dk/config.toml"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let paths = PathManager::with_config_dir(PathBuf::from("/etc/dk"));
        let explicit = PathBuf::from("/tmp/custom.toml");
        assert_eq!(paths.resolve_config_file(Some(&explicit)), explicit);
    }
}
