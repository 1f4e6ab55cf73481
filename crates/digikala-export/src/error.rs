use digikala_sources::SourceError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to assemble spreadsheet package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to render worksheet XML")]
    Render(#[from] std::fmt::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
