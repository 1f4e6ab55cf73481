use std::fmt::Write;

const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(u64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    pub fn number(value: Option<u64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Empty)
    }
}

/// Rows of cells held in memory until the whole sheet is serialized
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    rows: Vec<Vec<Cell>>,
}

impl Worksheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Serialize to `xl/worksheets/sheet1.xml`. Empty cells are omitted.
    pub fn to_xml(&self) -> Result<String, std::fmt::Error> {
        let mut xml = String::with_capacity(256 + self.rows.len() * 512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, r#"<worksheet xmlns="{}"><sheetData>"#, SPREADSHEETML_NS)?;

        for (row_index, row) in self.rows.iter().enumerate() {
            let row_number = row_index + 1;
            write!(xml, r#"<row r="{}">"#, row_number)?;

            for (col_index, cell) in row.iter().enumerate() {
                let cell_ref = format!("{}{}", column_to_letters(col_index as u32 + 1), row_number);
                match cell {
                    Cell::Empty => {}
                    Cell::Number(value) => {
                        write!(xml, r#"<c r="{}" t="n"><v>{}</v></c>"#, cell_ref, value)?;
                    }
                    Cell::Text(text) => {
                        write!(
                            xml,
                            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                            cell_ref,
                            escape_xml(text)
                        )?;
                    }
                }
            }

            xml.push_str("</row>");
        }

        xml.push_str("</sheetData></worksheet>");
        Ok(xml)
    }
}

/// Convert a 1-based column number to letters (1 -> "A", 27 -> "AA")
pub fn column_to_letters(col: u32) -> String {
    let mut letters = String::new();
    let mut col = col;

    while col > 0 {
        col -= 1;
        let letter = ((col % 26) as u8 + b'A') as char;
        letters.insert(0, letter);
        col /= 26;
    }

    letters
}

/// Escape text for element or attribute content, dropping characters XML 1.0 forbids
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // A raw CR would be normalized away by XML parsers
            '\r' => escaped.push_str("&#13;"),
            '\t' | '\n' => escaped.push(c),
            c if (c as u32) < 0x20 => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}
