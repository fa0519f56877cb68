use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// A cell's text could not be coerced to its declared scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    #[error("`{text}` is not a 32-bit integer: {source}")]
    Int { text: String, source: ParseIntError },

    #[error("`{text}` is not a float: {source}")]
    Float {
        text: String,
        source: ParseFloatError,
    },

    #[error("`{text}` is not a boolean")]
    Bool { text: String },

    #[error("`{text}` is not an enum value: {source}")]
    Enum { text: String, source: ParseIntError },

    #[error("type `{keyword}` cannot hold data `{text}`")]
    Unsupported { keyword: String, text: String },
}

/// A type-signature cell is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("empty type signature")]
    Empty,

    #[error("unknown container keyword `{keyword}` (expected `list` or `dict`)")]
    UnknownContainer { keyword: String },

    #[error("container `{keyword}` needs an element type (`{keyword}<T>:N`)")]
    MissingElement { keyword: String },

    #[error("`struct` cannot carry a default value")]
    DefaultOnStruct,

    #[error("invalid default `{literal}` for `{keyword}`: {source}")]
    InvalidDefault {
        keyword: String,
        literal: String,
        source: CoerceError,
    },
}

/// The header rows do not describe a valid schema.
///
/// Columns are reported 1-based, as a spreadsheet user counts them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column {}: field `{name}`: {source}", .column + 1)]
    Signature {
        column: usize,
        name: String,
        source: SignatureError,
    },

    #[error("column {}: field `{name}` has no type signature", .column + 1)]
    MissingSignature { column: usize, name: String },

    #[error("column {}: signature `{signature}` has no field name", .column + 1)]
    MissingName { column: usize, signature: String },

    #[error("column {}: `struct` is only allowed as a direct field (at `{path}`)", .column + 1)]
    MisplacedStruct { column: usize, path: String },

    #[error(
        "column {}: slot `{path}` needs {width} columns but only {available} remain in its container",
        .column + 1
    )]
    SlotOverflow {
        column: usize,
        path: String,
        width: usize,
        available: usize,
    },

    #[error("column {}: container `{path}` with {count} groups is too wide", .column + 1)]
    WidthOverflow {
        column: usize,
        path: String,
        count: usize,
    },
}

/// A data row cannot be decoded against its schema.
///
/// Columns are 0-based row offsets; callers add sheet context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("field `{path}`: {source}")]
    Coerce {
        path: String,
        column: usize,
        source: CoerceError,
    },

    #[error("field `{path}`: dict entry `{text}` has no `key=` prefix")]
    MissingDictKey {
        path: String,
        column: usize,
        text: String,
    },
}

impl DecodeError {
    pub fn path(&self) -> &str {
        match self {
            DecodeError::Coerce { path, .. } | DecodeError::MissingDictKey { path, .. } => path,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            DecodeError::Coerce { column, .. } | DecodeError::MissingDictKey { column, .. } => {
                *column
            }
        }
    }
}

/// A schema node has no name in the requested target language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeNameError {
    #[error("field `{path}`: type `{keyword}` has no {language} equivalent")]
    Unresolved {
        path: String,
        keyword: String,
        language: &'static str,
    },
}
