//! Sheet-level driver for xlsxporter.
//!
//! Turns a workbook (any [`SheetSource`]) into parsed [`Table`]s: sheet-name
//! directives pick and orient the sheets, [`TableBuilder`] walks each one
//! through header → rows → pruning.

pub mod backends;
pub mod config;
pub mod directive;
pub mod error;
pub mod source;
pub mod table;
pub mod workbook;

pub use config::{DumpFormat, ExportConfig};
pub use directive::{SheetDirective, classify_sheet, transpose};
pub use error::{ConfigError, SourceError, TableError};
pub use source::{MemorySource, SheetSource, open_path};
pub use table::{Row, RowStatus, Table, TableBuilder, TableState, parse_table};
pub use workbook::{SheetOutcome, SheetReport, parse_workbook};

#[cfg(feature = "csv")]
pub use backends::CsvSource;

#[cfg(feature = "calamine")]
pub use backends::CalamineSource;

pub use xlsxporter_parse::{ParseOptions, TagFilter};
