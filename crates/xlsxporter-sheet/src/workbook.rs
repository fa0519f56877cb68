//! Whole-workbook driver: directives first, then one table per sheet.

use serde::Serialize;
use xlsxporter_parse::ParseOptions;

use crate::directive::{SheetDirective, classify_sheet, transpose};
use crate::error::{SourceError, TableError};
use crate::source::SheetSource;
use crate::table::{Table, parse_table};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SheetOutcome {
    Parsed(Table),
    Ignored,
    Failed {
        #[serde(serialize_with = "display")]
        error: TableError,
    },
}

fn display<S: serde::Serializer>(error: &TableError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    /// Sheet name as stored in the workbook, directive prefix included.
    pub raw_name: String,
    /// Name after directive stripping; `None` for ignored sheets.
    pub sheet: Option<String>,
    pub outcome: SheetOutcome,
}

impl SheetReport {
    pub fn table(&self) -> Option<&Table> {
        match &self.outcome {
            SheetOutcome::Parsed(table) => Some(table),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&TableError> {
        match &self.outcome {
            SheetOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error().is_some()
    }
}

/// Parse every sheet `source` exposes. Only reading the workbook can fail
/// here; a sheet that does not parse is reported and the rest continue.
pub fn parse_workbook<S: SheetSource + ?Sized>(
    source: &S,
    file_name: &str,
    options: &ParseOptions,
) -> Result<Vec<SheetReport>, SourceError> {
    let names = source.sheet_names()?;
    let mut reports = Vec::with_capacity(names.len());
    for (position, raw_name) in names.into_iter().enumerate() {
        let (name, flip) = match classify_sheet(position, &raw_name) {
            SheetDirective::Ignore => {
                #[cfg(feature = "tracing")]
                tracing::warn!(file = file_name, sheet = %raw_name, "sheet ignored");
                reports.push(SheetReport {
                    raw_name,
                    sheet: None,
                    outcome: SheetOutcome::Ignored,
                });
                continue;
            }
            SheetDirective::Parse { name, transpose } => (name, transpose),
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("sheet", file = file_name, sheet = %name).entered();

        let mut rows = source.read_rows(&raw_name)?;
        if flip {
            rows = transpose(&rows);
        }
        let outcome = match parse_table(file_name, &name, &rows, options) {
            Ok(table) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(class = %table.class_name, records = table.len(), "sheet parsed");
                SheetOutcome::Parsed(table)
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, "sheet failed");
                SheetOutcome::Failed { error }
            }
        };
        reports.push(SheetReport {
            raw_name,
            sheet: Some(name),
            outcome,
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    const HEADER: [[&str; 2]; 4] = [["id", "name"], ["int", "string"], ["T", ""], ["", ""]];

    fn sheet(data: &[[&str; 2]]) -> Vec<Vec<String>> {
        HEADER
            .iter()
            .chain(data)
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn later_sheets_need_a_prefix() {
        let source = MemorySource::new()
            .with_sheet("Main", sheet(&[["1", "a"]]))
            .with_sheet("Extra", sheet(&[["2", "b"]]))
            .with_sheet("-More", sheet(&[["3", "c"]]))
            .with_sheet("!Off", sheet(&[]));
        let reports = parse_workbook(&source, "t.csv", &ParseOptions::default()).unwrap();
        let parsed: Vec<_> = reports.iter().filter_map(|r| r.sheet.as_deref()).collect();
        assert_eq!(parsed, ["Main", "More"]);
        assert!(matches!(reports[1].outcome, SheetOutcome::Ignored));
        assert!(matches!(reports[3].outcome, SheetOutcome::Ignored));
        assert!(reports[2].table().unwrap().record(3).is_some());
    }

    #[test]
    fn one_failed_sheet_does_not_stop_the_rest() {
        let source = MemorySource::new()
            .with_sheet("Main", sheet(&[["1", "a"], ["1", "b"]]))
            .with_sheet("-Good", sheet(&[["1", "a"], ["2", "b"]]));
        let reports = parse_workbook(&source, "t.csv", &ParseOptions::default()).unwrap();
        assert!(matches!(
            reports[0].error(),
            Some(TableError::DuplicateRecordId { id: 1, .. })
        ));
        assert_eq!(reports[1].table().unwrap().len(), 2);
    }

    #[test]
    fn pipe_prefix_transposes() {
        let rows = vec![
            vec!["id", "int", "T", "", "1", "2"],
            vec!["name", "string", "", "", "a", "b"],
        ];
        let source = MemorySource::new().with_sheet("|Items", rows);
        let reports = parse_workbook(&source, "items.csv", &ParseOptions::default()).unwrap();
        let table = reports[0].table().unwrap();
        assert_eq!(reports[0].sheet.as_deref(), Some("Items"));
        assert_eq!(table.class_name, "T");
        assert_eq!(table.ids().collect::<Vec<_>>(), [1, 2]);
    }
}
