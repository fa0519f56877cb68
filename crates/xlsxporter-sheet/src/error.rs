use std::path::PathBuf;

use thiserror::Error;
use xlsxporter_common::ErrorContext;
use xlsxporter_parse::{DecodeError, SchemaError};

use crate::table::TableState;

/// Fatal error for one sheet. Other sheets of the same workbook are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("sheet `{sheet}` has {found} header rows; names, types and tags are required")]
    MissingHeaderRows { sheet: String, found: usize },

    #[error("sheet `{sheet}` has no class name in the first cell of its tag row")]
    MissingClassName { sheet: String },

    #[error("{context}: {source}")]
    Schema {
        context: ErrorContext,
        source: SchemaError,
    },

    #[error("{context}: {source}")]
    Decode {
        context: ErrorContext,
        source: DecodeError,
    },

    #[error("{context}: record id `{text}` is not an integer")]
    InvalidRecordId { context: ErrorContext, text: String },

    #[error("{context}: record id {id} already used on row {first_row}")]
    DuplicateRecordId {
        context: ErrorContext,
        id: i32,
        first_row: usize,
    },

    #[error("table is {found:?}; expected {expected}")]
    InvalidState {
        expected: &'static str,
        found: TableState,
    },
}

/// A workbook or one of its sheets could not be read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[cfg(feature = "csv")]
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "calamine")]
    #[error("calamine: {0}")]
    Calamine(#[from] calamine::Error),

    #[error("no sheet named `{sheet}`")]
    MissingSheet { sheet: String },

    #[error("{}: unsupported workbook format", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}
