//! CSV files as single-sheet workbooks.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::SourceError;
use crate::source::{Row, SheetSource};

/// Sheet name a CSV file is exposed under.
pub const DEFAULT_SHEET: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct CsvSource {
    sheet_name: String,
    rows: Vec<Row>,
}

impl CsvSource {
    pub fn open_path(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read every record eagerly. Rows may have different lengths.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut rdr = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(CsvSource {
            sheet_name: DEFAULT_SHEET.to_string(),
            rows,
        })
    }

    /// Expose the rows under another sheet name, e.g. `|Vertical` to have
    /// the file read transposed.
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl SheetSource for CsvSource {
    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        if sheet != self.sheet_name {
            return Err(SourceError::MissingSheet {
                sheet: sheet.to_string(),
            });
        }
        Ok(self.rows.clone())
    }
}
