//! One sheet → one [`Table`].
//!
//! Sheet layout: row 0 field names, row 1 type signatures, row 2 export tags
//! (its first cell holds the class name), row 3 reserved, data from row 4.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::Serialize;
use xlsxporter_common::{ErrorContext, FileName};
use xlsxporter_parse::types::COMMENT_PREFIX;
use xlsxporter_parse::{
    ParseOptions, RowOutcome, SchemaRef, SkipReason, ValueNode, build_schema, decode_row,
    is_null_marker,
};

use crate::error::TableError;

/// One sheet row as cell strings.
pub type Row = Vec<String>;

pub const HEADER_ROWS: usize = 3;
/// Index of the first data row; the row before it is reserved.
pub const FIRST_DATA_ROW: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableState {
    Empty,
    SchemaBuilt,
    Decoding,
    Ready,
    Failed,
}

/// Result of feeding one data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Recorded(i32),
    Skipped(SkipReason),
}

/// A parsed sheet, ready for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub class_name: String,
    pub file_stem: String,
    pub type_name: String,
    pub sheet_name: String,
    /// Root schema with tag-excluded and comment fields removed.
    pub schema: SchemaRef,
    /// Root schema as declared; records were decoded against it.
    #[serde(skip)]
    pub source_schema: SchemaRef,
    pub records: Vec<ValueNode>,
    #[serde(skip)]
    index: FxHashMap<i32, usize>,
    pub skipped: usize,
}

impl Table {
    pub fn record(&self, id: i32) -> Option<&ValueNode> {
        self.index.get(&id).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.iter().filter_map(ValueNode::record_id)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}[{}]): {} records, {} skipped",
            self.class_name,
            self.file_stem,
            self.sheet_name,
            self.records.len(),
            self.skipped
        )
    }
}

/// Incremental sheet parser.
///
/// `Empty → SchemaBuilt → Decoding → Ready`; any fatal error moves it to
/// `Failed`, after which every call returns [`TableError::InvalidState`].
#[derive(Debug)]
pub struct TableBuilder {
    file: FileName,
    sheet_name: String,
    options: ParseOptions,
    state: TableState,
    class_name: String,
    schema: Option<SchemaRef>,
    records: Vec<ValueNode>,
    index: FxHashMap<i32, usize>,
    rows_of: FxHashMap<i32, usize>,
    skipped: usize,
    next_row: usize,
}

impl TableBuilder {
    pub fn new(file_name: &str, sheet_name: &str, options: ParseOptions) -> Self {
        TableBuilder {
            file: FileName::parse(file_name),
            sheet_name: sheet_name.to_string(),
            options,
            state: TableState::Empty,
            class_name: String::new(),
            schema: None,
            records: Vec::new(),
            index: FxHashMap::default(),
            rows_of: FxHashMap::default(),
            skipped: 0,
            next_row: FIRST_DATA_ROW,
        }
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    /// Build the schema from the sheet's leading rows. Only the first three
    /// are read.
    pub fn build_header<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> Result<(), TableError> {
        self.require_state(&[TableState::Empty], "Empty")?;
        let result = self.header_inner(rows);
        self.settle(result)
    }

    fn header_inner<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> Result<(), TableError> {
        if rows.len() < HEADER_ROWS {
            return Err(TableError::MissingHeaderRows {
                sheet: self.sheet_name.clone(),
                found: rows.len(),
            });
        }
        let class_name = rows[2].first().map(|c| c.as_ref().trim()).unwrap_or("");
        if class_name.is_empty() {
            return Err(TableError::MissingClassName {
                sheet: self.sheet_name.clone(),
            });
        }
        self.class_name = class_name.to_string();

        let names: Vec<&str> = rows[0].iter().map(AsRef::as_ref).collect();
        let types: Vec<&str> = rows[1].iter().map(AsRef::as_ref).collect();
        // The class name shares the tag row; it is not the id field's tag.
        let tags: Vec<&str> = rows[2]
            .iter()
            .enumerate()
            .map(|(i, c)| if i == 0 { "" } else { c.as_ref() })
            .collect();

        let schema = build_schema(
            &self.file.type_name,
            names.as_slice(),
            types.as_slice(),
            tags.as_slice(),
        )
        .map_err(|source| TableError::Schema {
            context: self.context(),
            source,
        })?;
        self.schema = Some(schema);
        self.state = TableState::SchemaBuilt;
        Ok(())
    }

    /// Decode the next data row. Rows are numbered from [`FIRST_DATA_ROW`].
    pub fn push_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<RowStatus, TableError> {
        self.require_state(&[TableState::SchemaBuilt, TableState::Decoding], "SchemaBuilt or Decoding")?;
        self.state = TableState::Decoding;
        let row = self.next_row;
        self.next_row += 1;
        let result = self.row_inner(row, cells);
        self.settle(result)
    }

    fn row_inner<S: AsRef<str>>(&mut self, row: usize, cells: &[S]) -> Result<RowStatus, TableError> {
        let first = cells.first().map(|c| c.as_ref().trim()).unwrap_or("");
        let skip = if first.is_empty() {
            Some(SkipReason::Blank)
        } else if first.starts_with(COMMENT_PREFIX) {
            Some(SkipReason::Comment)
        } else if is_null_marker(first) {
            Some(SkipReason::Null)
        } else {
            None
        };
        if let Some(reason) = skip {
            #[cfg(feature = "tracing")]
            tracing::debug!(sheet = %self.sheet_name, row = row + 1, ?reason, "skipped row");
            self.skipped += 1;
            return Ok(RowStatus::Skipped(reason));
        }

        let id: i32 = first.parse().map_err(|_| TableError::InvalidRecordId {
            context: self.context().with_row(row + 1).with_column(1),
            text: first.to_string(),
        })?;
        if let Some(&first_row) = self.rows_of.get(&id) {
            return Err(TableError::DuplicateRecordId {
                context: self.context().with_row(row + 1).with_column(1),
                id,
                first_row,
            });
        }

        let Some(schema) = self.schema.as_ref() else {
            return Err(TableError::InvalidState {
                expected: "SchemaBuilt",
                found: self.state,
            });
        };
        match decode_row(schema, id, cells, &self.options) {
            Ok(RowOutcome::Record(record)) => {
                self.index.insert(id, self.records.len());
                self.rows_of.insert(id, row + 1);
                self.records.push(record);
                Ok(RowStatus::Recorded(id))
            }
            Ok(RowOutcome::Skipped(reason)) => {
                self.skipped += 1;
                Ok(RowStatus::Skipped(reason))
            }
            Err(source) => Err(TableError::Decode {
                context: self
                    .context()
                    .with_row(row + 1)
                    .with_column(source.column() + 1)
                    .with_field(source.path()),
                source,
            }),
        }
    }

    /// Prune the schema with the active tag filter and hand out the table.
    pub fn finish(&mut self) -> Result<Table, TableError> {
        self.require_state(&[TableState::SchemaBuilt, TableState::Decoding], "SchemaBuilt or Decoding")?;
        let Some(source_schema) = self.schema.clone() else {
            self.state = TableState::Failed;
            return Err(TableError::InvalidState {
                expected: "SchemaBuilt",
                found: TableState::Empty,
            });
        };
        self.state = TableState::Ready;
        Ok(Table {
            class_name: self.class_name.clone(),
            file_stem: self.file.stem.clone(),
            type_name: self.file.type_name.clone(),
            sheet_name: self.sheet_name.clone(),
            schema: source_schema.pruned(&self.options.tag),
            source_schema,
            records: std::mem::take(&mut self.records),
            index: std::mem::take(&mut self.index),
            skipped: self.skipped,
        })
    }

    fn require_state(&self, allowed: &[TableState], expected: &'static str) -> Result<(), TableError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(TableError::InvalidState {
                expected,
                found: self.state,
            })
        }
    }

    fn settle<T>(&mut self, result: Result<T, TableError>) -> Result<T, TableError> {
        if result.is_err() {
            self.state = TableState::Failed;
        }
        result
    }

    fn context(&self) -> ErrorContext {
        ErrorContext::new().with_sheet(self.sheet_name.clone())
    }
}

/// Parse a whole sheet in one go.
pub fn parse_table<S: AsRef<str>>(
    file_name: &str,
    sheet_name: &str,
    rows: &[Vec<S>],
    options: &ParseOptions,
) -> Result<Table, TableError> {
    let mut builder = TableBuilder::new(file_name, sheet_name, options.clone());
    builder.build_header(rows)?;
    for row in rows.iter().skip(FIRST_DATA_ROW) {
        builder.push_row(row)?;
    }
    builder.finish()
}
