//! Where sheet rows come from.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::SourceError;
pub use crate::table::Row;

/// A workbook as an ordered list of named sheets of string cells.
pub trait SheetSource {
    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>, SourceError>;

    /// All rows of `sheet`, top to bottom. Cells are left untrimmed.
    fn read_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError>;
}

/// In-memory workbook, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    order: Vec<String>,
    sheets: FxHashMap<String, Vec<Row>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet. A sheet with the same name is replaced in place.
    pub fn with_sheet<N, R, C>(mut self, name: N, rows: R) -> Self
    where
        N: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let name = name.into();
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        if !self.sheets.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.sheets.insert(name, rows);
        self
    }
}

impl SheetSource for MemorySource {
    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.order.clone())
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| SourceError::MissingSheet {
                sheet: sheet.to_string(),
            })
    }
}

/// Open a workbook file, choosing the backend from its extension.
pub fn open_path(path: &Path) -> Result<Box<dyn SheetSource>, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        #[cfg(feature = "csv")]
        "csv" => Ok(Box::new(crate::backends::CsvSource::open_path(path)?)),
        #[cfg(feature = "calamine")]
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => {
            Ok(Box::new(crate::backends::CalamineSource::open_path(path)?))
        }
        _ => Err(SourceError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Whether [`open_path`] has a backend for this file.
pub fn is_supported(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    (cfg!(feature = "csv") && ext == "csv")
        || (cfg!(feature = "calamine")
            && matches!(ext.as_str(), "xlsx" | "xlsm" | "xls" | "xlsb" | "ods"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_keeps_order() {
        let source = MemorySource::new()
            .with_sheet("B", [["1", "2"]])
            .with_sheet("A", [["x"]])
            .with_sheet("B", [["3"]]);
        assert_eq!(source.sheet_names().unwrap(), ["B", "A"]);
        assert_eq!(source.read_rows("B").unwrap(), vec![vec!["3".to_string()]]);
        assert!(matches!(
            source.read_rows("C"),
            Err(SourceError::MissingSheet { .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(matches!(
            open_path(Path::new("notes.txt")),
            Err(SourceError::UnsupportedFormat { .. })
        ));
    }
}
