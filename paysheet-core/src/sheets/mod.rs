//! Spreadsheet-as-database access.
//!
//! A spreadsheet tab is a table: row 1 holds the column headers, every
//! following row is a record. Cells are addressed by header name so callers
//! never deal with column positions.

mod auth;
mod google;
mod memory;

pub use auth::ServiceAccount;
pub use google::GoogleSheets;
pub use memory::MemorySheets;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Static description of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetSpec {
    /// Stable numeric sheet id (survives renames).
    pub id: u32,
    /// Title used when the tab has to be created.
    pub title: &'static str,
    /// Column headers, in column order.
    pub headers: &'static [&'static str],
    /// Grid size `(rows, columns)` to request on creation, if any.
    pub grid: Option<(u32, u32)>,
}

/// Cell writes keyed by header name.
pub type Cells = [(&'static str, String)];

/// A data row fetched from a tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based sheet row number. The header is row 1.
    pub number: u32,
    values: HashMap<String, String>,
}

impl SheetRow {
    pub fn new(number: u32, values: HashMap<String, String>) -> Self {
        Self { number, values }
    }

    /// Build a row by zipping headers with raw cell values.
    ///
    /// Short rows (trailing empty cells are omitted by the API) are padded
    /// with empty strings.
    pub fn from_values(number: u32, headers: &[String], values: Vec<String>) -> Self {
        let mut values = values.into_iter();
        let values = headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default()))
            .collect();
        Self { number, values }
    }

    /// Cell value under `header`, empty when absent.
    pub fn get(&self, header: &str) -> &str {
        self.values.get(header).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, header: &str, value: impl Into<String>) {
        self.values.insert(header.to_owned(), value.into());
    }
}

/// Errors that can occur while talking to the spreadsheet service.
#[derive(Debug, Error)]
pub enum SheetError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status
    #[error("sheets API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Service account credentials were rejected or malformed
    #[error("authentication error: {0}")]
    Auth(String),

    /// A write targeted a tab that does not exist
    #[error("sheet {0} does not exist")]
    MissingSheet(u32),

    /// Response did not have the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Storage backend holding the back-office tabs.
///
/// Reads always fetch every row; callers scan linearly.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Create the tab if missing and write its header row if empty.
    async fn ensure_sheet(&self, spec: &SheetSpec) -> Result<(), SheetError>;

    /// Fetch every data row. A tab that does not exist yet has no rows.
    async fn rows(&self, spec: &SheetSpec) -> Result<Vec<SheetRow>, SheetError>;

    /// Append one row and return its sheet row number.
    ///
    /// Headers not present in the tab are ignored.
    async fn append_row(&self, spec: &SheetSpec, cells: &Cells) -> Result<u32, SheetError>;

    /// Overwrite the given cells of row `row`.
    ///
    /// Values are written as if typed by a user, so `=` starts a formula.
    async fn update_cells(&self, spec: &SheetSpec, row: u32, cells: &Cells)
    -> Result<(), SheetError>;
}

/// Spreadsheet column letter for a 0-based column index (`0 -> A`, `26 -> AA`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Extract the first row number from an A1 range such as `Purchases!A5:AA5`.
pub fn parse_row_number(range: &str) -> Option<u32> {
    let cell = range.rsplit('!').next()?;
    let start = cell.split(':').next()?;
    let digits: String = start.chars().skip_while(|c| c.is_ascii_alphabetic()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(15), "P");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(26 + 25), "AZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_parse_row_number() {
        assert_eq!(parse_row_number("Purchases!A5:AA5"), Some(5));
        assert_eq!(parse_row_number("'My Sheet'!B12"), Some(12));
        assert_eq!(parse_row_number("Purchases!A:A"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let headers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let row = SheetRow::from_values(2, &headers, vec!["1".to_string()]);
        assert_eq!(row.get("a"), "1");
        assert_eq!(row.get("c"), "");
        assert_eq!(row.get("unknown"), "");
    }
}
