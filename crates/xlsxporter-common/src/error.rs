//! Location info attached to fatal sheet errors.
//!
//! Every field is optional so the same struct serves header errors (no
//! row), row errors (no field) and field-level decode failures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorContext {
    pub sheet: Option<String>,
    /// 1-based spreadsheet row.
    pub row: Option<usize>,
    /// 1-based spreadsheet column.
    pub column: Option<usize>,
    /// Qualified path of the field being decoded.
    pub field: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet<S: Into<String>>(mut self, sheet: S) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_field<S: Into<String>>(mut self, field: S) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sheet.is_none() && self.row.is_none() && self.column.is_none() && self.field.is_none()
    }
}

/* ───────────────────────── Display ────────────────────────── */

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            Ok(())
        };

        if let Some(ref sheet) = self.sheet {
            sep(f)?;
            write!(f, "sheet `{sheet}`")?;
        }
        if let Some(row) = self.row {
            sep(f)?;
            write!(f, "row {row}")?;
        }
        if let Some(column) = self.column {
            sep(f)?;
            write!(f, "column {column}")?;
        }
        if let Some(ref field) = self.field {
            sep(f)?;
            write!(f, "field `{field}`")?;
        }
        if first {
            f.write_str("<unknown location>")?;
        }
        Ok(())
    }
}
