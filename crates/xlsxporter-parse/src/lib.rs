//! Schema grammar and row decoder for spreadsheet-defined record tables.
//!
//! A table is described by three header rows (field names, type signatures,
//! export tags). [`build_schema`] compiles them into an immutable
//! [`SchemaNode`] tree; [`decode_row`] then turns each data row into a
//! [`ValueNode`] tree mirroring that schema.

pub mod decode;
pub mod error;
pub mod inline;
pub mod scalar;
pub mod schema;
pub mod signature;
pub mod typename;
pub mod types;

pub use decode::{RowOutcome, SkipReason, ValueNode, decode_row, is_null_marker};
pub use error::{CoerceError, DecodeError, SchemaError, SignatureError, TypeNameError};
pub use schema::{SchemaNode, SchemaRef, build_schema};
pub use signature::{Signature, parse_signature};
pub use typename::TargetLanguage;
pub use types::{BaseType, DefaultValue, ParseOptions, RepeatPolicy, TagFilter, TypeDescriptor};

pub use xlsxporter_common::CellValue;
