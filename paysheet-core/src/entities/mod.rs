//! Typed records stored in the back-office spreadsheet.
//!
//! Each record type maps one tab. Cells are plain strings on the sheet, so
//! the records keep them as strings and expose typed accessors for the few
//! flags the business rules read.

use crate::sheets::SheetRow;

/// Declares a record whose fields are the tab's columns, in order.
///
/// A field may name its column explicitly (`kind = "type"`) when the header
/// is not a valid Rust identifier.
macro_rules! sheet_record {
    (@header $field:ident) => { stringify!($field) };
    (@header $field:ident $header:literal) => { $header };
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($field:ident $(= $header:literal)?),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            /// Sheet row number; 0 until the record is stored.
            pub row: u32,
            $(pub $field: String,)+
        }

        impl $name {
            /// Column headers, in column order.
            pub const HEADERS: &'static [&'static str] =
                &[$(sheet_record!(@header $field $($header)?)),+];

            pub fn from_row(row: &$crate::sheets::SheetRow) -> Self {
                Self {
                    row: row.number,
                    $($field: row.get(sheet_record!(@header $field $($header)?)).to_owned(),)+
                }
            }

            /// Every column with its current value.
            pub fn to_cells(&self) -> Vec<(&'static str, String)> {
                vec![$((sheet_record!(@header $field $($header)?), self.$field.clone()),)+]
            }
        }
    };
}

pub mod purchases;
pub mod referrals;
pub mod refunds;

/// Reads a yes/no style cell. Sheets renders checkboxes as `TRUE`/`FALSE`
/// while handlers write `yes`/`no`; both are accepted.
pub fn flag_is_set(value: &str) -> bool {
    let value = value.trim();
    ["yes", "true", "1"]
        .iter()
        .any(|truthy| value.eq_ignore_ascii_case(truthy))
}

/// Cell text for a boolean written by the back office.
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Checkbox text as rendered by Sheets.
pub fn checkbox(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

/// Finds the first row whose `header` cell equals `key`.
fn find_row<'a>(rows: &'a [SheetRow], header: &str, key: &str) -> Option<&'a SheetRow> {
    rows.iter().find(|row| row.get(header) == key)
}
