use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use xlsxporter_common::CellValue;

/// Marker that turns a type keyword, a data row or a data cell into a comment.
pub const COMMENT_PREFIX: &str = "//";

/// Base kind of a declared field.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    Bool,
    String,
    /// `E…` keyword; values are the enum's underlying integers.
    Enum(String),
    /// `PB…` keyword; payload passed through as raw text.
    Opaque(String),
    List,
    Dict,
    Struct,
    /// `//…` keyword; the column is documentation only.
    Comment(String),
    /// Any other keyword. Fails on first decode or type-name lookup.
    Unknown(String),
}

impl BaseType {
    pub fn classify(keyword: &str) -> Self {
        let keyword = keyword.trim();
        match keyword {
            "int" => BaseType::Int,
            "float" => BaseType::Float,
            "bool" => BaseType::Bool,
            "string" => BaseType::String,
            "list" => BaseType::List,
            "dict" => BaseType::Dict,
            "struct" => BaseType::Struct,
            k if k.starts_with(COMMENT_PREFIX) => BaseType::Comment(k.to_string()),
            k if k.starts_with("PB") => BaseType::Opaque(k.to_string()),
            k if k.starts_with('E') => BaseType::Enum(k.to_string()),
            k => BaseType::Unknown(k.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::Bool => "bool",
            BaseType::String => "string",
            BaseType::List => "list",
            BaseType::Dict => "dict",
            BaseType::Struct => "struct",
            BaseType::Enum(k) | BaseType::Opaque(k) | BaseType::Comment(k) | BaseType::Unknown(k) => k,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, BaseType::List | BaseType::Dict)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, BaseType::Comment(_))
    }

    /// True for enum and opaque keywords, which keep their own name in
    /// generated code.
    pub fn is_custom(&self) -> bool {
        matches!(self, BaseType::Enum(_) | BaseType::Opaque(_))
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How a node's values are laid out in a data row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatPolicy {
    /// Sheet root or nested struct: fields follow one another, no width limit.
    AggregateRoot,
    /// Whole container packed into one delimited cell.
    Inline,
    /// Scalar, or a container with one element group after its marker cell.
    Single,
    /// Container spread over a marker cell plus `n` element groups.
    Fixed(usize),
}

impl RepeatPolicy {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => RepeatPolicy::Inline,
            1 => RepeatPolicy::Single,
            n => RepeatPolicy::Fixed(n),
        }
    }

    /// Declared count, with `-1` for aggregates.
    pub fn count(&self) -> i64 {
        match self {
            RepeatPolicy::AggregateRoot => -1,
            RepeatPolicy::Inline => 0,
            RepeatPolicy::Single => 1,
            RepeatPolicy::Fixed(n) => *n as i64,
        }
    }

    /// Element groups laid out after the marker cell.
    pub fn groups(&self) -> usize {
        match self {
            RepeatPolicy::Single => 1,
            RepeatPolicy::Fixed(n) => *n,
            _ => 0,
        }
    }

    /// Whether the node's first column is a marker cell rather than data.
    pub fn has_marker(&self) -> bool {
        matches!(self, RepeatPolicy::Single | RepeatPolicy::Fixed(_))
    }
}

/// A default literal together with its decoded value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    pub literal: String,
    pub value: CellValue,
}

/// Parsed form of one type-signature cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    pub base: BaseType,
    pub repeat: RepeatPolicy,
    /// Export tag; empty means the field is always exported.
    pub tag: String,
    pub default: Option<DefaultValue>,
}

impl TypeDescriptor {
    pub fn aggregate() -> Self {
        TypeDescriptor {
            base: BaseType::Struct,
            repeat: RepeatPolicy::AggregateRoot,
            tag: String::new(),
            default: None,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.repeat == RepeatPolicy::AggregateRoot
    }
}

/// Active export tag.
///
/// A field is exported when its own tag is empty, when the filter is empty
/// (export everything), or when both are equal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagFilter(String);

impl TagFilter {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        TagFilter(tag.into().trim().to_string())
    }

    /// Filter that admits every tag.
    pub fn all() -> Self {
        TagFilter(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0.is_empty()
    }

    pub fn admits(&self, tag: &str) -> bool {
        let tag = tag.trim();
        tag.is_empty() || self.0.is_empty() || tag == self.0
    }
}

/// Options threaded through schema pruning and row decoding.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub tag: TagFilter,
}

impl ParseOptions {
    pub fn with_tag<S: Into<String>>(tag: S) -> Self {
        ParseOptions {
            tag: TagFilter::new(tag),
        }
    }
}
