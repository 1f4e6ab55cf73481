//! Minimal SpreadsheetML writer: one worksheet of inline strings and numbers,
//! no styles or shared strings.

mod package;
mod sheet;

pub use package::build_package;
pub use sheet::{column_to_letters, escape_xml, Cell, Worksheet};
