//! Meta crate that re-exports the xlsxporter layers. Depend on this crate
//! and pick layers with feature flags, or depend on the layer crates
//! directly for finer control.
//!
//! ```
//! # #[cfg(feature = "sheet")] {
//! use xlsxporter::{MemorySource, ParseOptions, parse_workbook};
//!
//! let source = MemorySource::new().with_sheet(
//!     "Items",
//!     [
//!         vec!["id", "name", "drops"],
//!         vec!["int", "string", "list<int>:0"],
//!         vec!["Item", "", ""],
//!         vec!["", "", ""],
//!         vec!["1", "sword", "3|4"],
//!     ],
//! );
//! let reports = parse_workbook(&source, "item.xlsx", &ParseOptions::default()).unwrap();
//! let table = reports[0].table().unwrap();
//! assert_eq!(table.type_name, "Item");
//! assert_eq!(table.record(1).unwrap().child("drops").unwrap().children().len(), 2);
//! # }
//! ```

#[cfg(feature = "common")]
pub use xlsxporter_common as common;

#[cfg(feature = "parse")]
pub use xlsxporter_parse as parse;

#[cfg(feature = "sheet")]
pub use xlsxporter_sheet as sheet;

#[cfg(feature = "common")]
pub use xlsxporter_common::{CellValue, ErrorContext, FileName};

#[cfg(feature = "parse")]
pub use xlsxporter_parse::{
    BaseType, ParseOptions, RepeatPolicy, RowOutcome, SchemaNode, SchemaRef, TagFilter,
    TargetLanguage, TypeDescriptor, ValueNode, build_schema, decode_row,
};

#[cfg(feature = "sheet")]
pub use xlsxporter_sheet::{
    MemorySource, SheetOutcome, SheetReport, SheetSource, Table, TableBuilder, TableError,
    open_path, parse_table, parse_workbook,
};

#[cfg(feature = "csv")]
pub use xlsxporter_sheet::CsvSource;

#[cfg(feature = "calamine")]
pub use xlsxporter_sheet::CalamineSource;
