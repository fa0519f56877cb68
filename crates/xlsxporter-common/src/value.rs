use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of fractional digits kept for float cells.
pub const FLOAT_PRECISION: usize = 3;

/// A decoded scalar cell.
///
/// Values are stored in their canonical form: floats are rounded to
/// [`FLOAT_PRECISION`] digits at 32-bit width, and text already has its
/// quote characters escaped. `Display` renders exactly that form, which is
/// what downstream renderers emit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i32),
    Float(f32),
    Boolean(bool),
    Text(String),
    /// Enum member, stored as its underlying integer.
    Enum(i32),
    /// Payload of a custom type; passed through untouched.
    Opaque(String),
}

impl CellValue {
    /// Build a float cell, normalising it to the canonical precision.
    pub fn float(v: f32) -> Self {
        CellValue::Float(canonical_f32(v))
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            CellValue::Int(i) | CellValue::Enum(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Text of `Text` and `Opaque` cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Opaque(s) => Some(s),
            _ => None,
        }
    }

    /// True for values rendered without quotes by text-based renderers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CellValue::Int(_) | CellValue::Float(_) | CellValue::Enum(_)
        )
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) | CellValue::Enum(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.prec$}", prec = FLOAT_PRECISION),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Text(s) | CellValue::Opaque(s) => f.write_str(s),
        }
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v)
    }
}

impl From<f32> for CellValue {
    fn from(v: f32) -> Self {
        CellValue::float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Boolean(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

/// Round `v` through its fixed-precision rendering.
pub fn canonical_f32(v: f32) -> f32 {
    format!("{v:.prec$}", prec = FLOAT_PRECISION)
        .parse()
        .unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn float_renders_three_decimals() {
        assert_eq!(CellValue::float(1.5).to_string(), "1.500");
        assert_eq!(CellValue::float(2.0 / 3.0).to_string(), "0.667");
        assert_eq!(CellValue::float(-12.25).to_string(), "-12.250");
    }

    #[test]
    fn float_is_stored_rounded() {
        assert_eq!(CellValue::float(1.23456), CellValue::float(1.235));
        assert_eq!(CellValue::float(1.23456).as_float(), Some(1.235));
    }

    #[test]
    fn accessors_cover_aliases() {
        assert_eq!(CellValue::Enum(3).as_int(), Some(3));
        assert_eq!(CellValue::Opaque("x".into()).as_text(), Some("x"));
        assert_eq!(CellValue::Boolean(true).as_int(), None);
        assert!(CellValue::Enum(1).is_numeric());
        assert!(!CellValue::Text("1".into()).is_numeric());
    }

    proptest! {
        #[test]
        fn canonical_float_is_a_fixed_point(v in -1.0e6f32..1.0e6f32) {
            let once = canonical_f32(v);
            prop_assert_eq!(canonical_f32(once), once);
            prop_assert_eq!(
                CellValue::Float(once).to_string(),
                CellValue::float(v).to_string()
            );
        }
    }
}
