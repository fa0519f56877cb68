//! xlsx / xls / ods workbooks through calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use parking_lot::RwLock;

use crate::error::SourceError;
use crate::source::{Row, SheetSource};

pub struct CalamineSource {
    workbook: RwLock<Sheets<BufReader<File>>>,
}

impl CalamineSource {
    pub fn open_path(path: &Path) -> Result<Self, SourceError> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self {
            workbook: RwLock::new(workbook),
        })
    }

    fn cell_text(data: &Data) -> String {
        match data {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            // Whole numbers are stored as floats; render them without `.0`.
            Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }
}

impl SheetSource for CalamineSource {
    fn sheet_names(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.workbook.read().sheet_names().to_vec())
    }

    fn read_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        let range = self.workbook.write().worksheet_range(sheet)?;
        // The used range may not start at A1; keep absolute positions.
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let mut rows: Vec<Row> = vec![Vec::new(); row0 as usize];
        for cells in range.rows() {
            let mut row = vec![String::new(); col0 as usize];
            row.extend(cells.iter().map(Self::cell_text));
            rows.push(row);
        }
        Ok(rows)
    }
}
