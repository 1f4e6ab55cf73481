pub mod error;
pub mod pipeline;
pub mod writer;
pub mod xlsx;

pub use error::ExportError;
pub use pipeline::{CommentExporter, ExportSummary};
pub use writer::{SpreadsheetWriter, HEADERS};
