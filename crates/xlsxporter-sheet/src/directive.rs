//! Sheet-name directives.
//!
//! The first sheet of a workbook is always parsed. Later sheets are only
//! parsed when their name opts in with `|` (transposed) or `-` (as-is).
//! A leading `!` excludes any sheet, and a first sheet literally named
//! `Vertical` is read transposed.

use crate::table::Row;

const IGNORE_PREFIX: char = '!';
const TRANSPOSE_PREFIX: char = '|';
const INCLUDE_PREFIX: char = '-';
const VERTICAL_SHEET: &str = "Vertical";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetDirective {
    Ignore,
    Parse { name: String, transpose: bool },
}

impl SheetDirective {
    pub fn is_ignored(&self) -> bool {
        matches!(self, SheetDirective::Ignore)
    }
}

/// Decide what to do with the sheet at `position` (0-based) named `raw`.
pub fn classify_sheet(position: usize, raw: &str) -> SheetDirective {
    if raw.starts_with(IGNORE_PREFIX) {
        return SheetDirective::Ignore;
    }
    let (name, transpose) = if let Some(rest) = raw.strip_prefix(TRANSPOSE_PREFIX) {
        (rest, true)
    } else if let Some(rest) = raw.strip_prefix(INCLUDE_PREFIX) {
        (rest, false)
    } else if position == 0 {
        (raw, raw == VERTICAL_SHEET)
    } else {
        return SheetDirective::Ignore;
    };
    SheetDirective::Parse {
        name: name.to_string(),
        transpose,
    }
}

/// Swap rows and columns. Ragged rows are padded with empty cells.
pub fn transpose(rows: &[Row]) -> Vec<Row> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).cloned().unwrap_or_default())
                .collect()
        })
        .collect()
}
