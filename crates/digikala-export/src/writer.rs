use digikala_config::{ExportConfig, DEFAULT_SHEET_NAME};
use digikala_models::CommentRecord;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};
use crate::error::ExportError;
use crate::xlsx::{build_package, Cell, Worksheet};

/// Column headers, in the order every data row is written
pub const HEADERS: [&str; 12] = [
    "id",
    "author",
    "title",
    "body",
    "rating",
    "recommendation",
    "purchase status",
    "likes",
    "dislikes",
    "positive points",
    "negative points",
    "created at",
];

/// Writes comment records to a single-sheet XLSX workbook
#[derive(Debug, Clone)]
pub struct SpreadsheetWriter {
    sheet_name: String,
    points_separator: String,
}

impl Default for SpreadsheetWriter {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            points_separator: "\n".to_string(),
        }
    }
}

impl SpreadsheetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            points_separator: config.points_separator.clone(),
        }
    }

    pub fn with_points_separator(mut self, separator: impl Into<String>) -> Self {
        self.points_separator = separator.into();
        self
    }

    /// Header row followed by one row per record
    pub fn build_sheet(&self, records: &[CommentRecord]) -> Worksheet {
        let mut sheet = Worksheet::new();
        sheet.push_row(HEADERS.iter().map(|header| Cell::text(*header)).collect());
        for record in records {
            sheet.push_row(self.record_row(record));
        }
        sheet
    }

    fn record_row(&self, record: &CommentRecord) -> Vec<Cell> {
        vec![
            Cell::number(record.id),
            Cell::text(record.author.as_str()),
            Cell::text(record.title.as_str()),
            Cell::text(record.body.as_str()),
            Cell::number(record.rating.map(u64::from)),
            Cell::text(record.recommendation.clone().unwrap_or_default()),
            Cell::text(record.purchase_status.as_label()),
            Cell::Number(record.likes),
            Cell::Number(record.dislikes),
            Cell::text(record.positive_points.join(&self.points_separator)),
            Cell::text(record.negative_points.join(&self.points_separator)),
            Cell::text(record.created_at.clone().unwrap_or_default()),
        ]
    }

    /// Complete XLSX file contents
    pub fn to_bytes(&self, records: &[CommentRecord]) -> Result<Vec<u8>, ExportError> {
        let sheet = self.build_sheet(records);
        let sheet_xml = sheet.to_xml()?;
        debug!(rows = sheet.row_count(), xml_bytes = sheet_xml.len(), "Rendered worksheet");
        Ok(build_package(&self.sheet_name, &sheet_xml)?)
    }

    /// Write the workbook to `path`.
    ///
    /// The file is assembled in memory, written to a temporary file next to
    /// `path` and renamed into place, so `path` either holds the complete
    /// workbook or is left as it was.
    pub fn write(&self, records: &[CommentRecord], path: &Path) -> Result<(), ExportError> {
        let bytes = self.to_bytes(records)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = create_temp_file(dir).map_err(|e| ExportError::io(path, e))?;
        file.write_all(&bytes).map_err(|e| ExportError::io(path, e))?;
        // An overwritten workbook keeps its mode
        if let Ok(existing) = std::fs::metadata(path) {
            file.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| ExportError::io(path, e))?;
        }
        file.as_file().sync_all().map_err(|e| ExportError::io(path, e))?;
        file.persist(path).map_err(|e| ExportError::io(path, e.error))?;

        info!(
            path = %path.display(),
            rows = records.len(),
            bytes = bytes.len(),
            "Wrote spreadsheet"
        );
        Ok(())
    }
}

/// Temp file next to the output. On unix it is created with the same umask-derived
/// mode as a plain `fs::write`, instead of tempfile's owner-only default.
fn create_temp_file(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".digikala-comments-").suffix(".xlsx.tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}
