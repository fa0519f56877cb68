//! Text → `CellValue` coercion shared by defaults and row data.

use xlsxporter_common::CellValue;

use crate::error::CoerceError;
use crate::types::BaseType;

/// Coerce already-trimmed cell text to `base`.
pub fn coerce(base: &BaseType, text: &str) -> Result<CellValue, CoerceError> {
    match base {
        BaseType::Int => text
            .parse::<i32>()
            .map(CellValue::Int)
            .map_err(|source| CoerceError::Int {
                text: text.to_string(),
                source,
            }),
        BaseType::Float => text
            .parse::<f32>()
            .map(CellValue::float)
            .map_err(|source| CoerceError::Float {
                text: text.to_string(),
                source,
            }),
        BaseType::Bool => parse_bool(text)
            .map(CellValue::Boolean)
            .ok_or_else(|| CoerceError::Bool {
                text: text.to_string(),
            }),
        BaseType::String => Ok(CellValue::Text(escape_quotes(text))),
        BaseType::Enum(_) => {
            let number = text.split('#').next().unwrap_or_default().trim();
            number
                .parse::<i32>()
                .map(CellValue::Enum)
                .map_err(|source| CoerceError::Enum {
                    text: text.to_string(),
                    source,
                })
        }
        BaseType::Opaque(_) => Ok(CellValue::Opaque(text.to_string())),
        other => Err(CoerceError::Unsupported {
            keyword: other.keyword().to_string(),
            text: text.to_string(),
        }),
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Escape `"` as `\"`. Quotes that are already escaped are left alone, so
/// escaping a decoded string again is a no-op.
pub fn escape_quotes(text: &str) -> String {
    if !text.contains('"') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev = None;
    for ch in text.chars() {
        if ch == '"' && prev != Some('\\') {
            out.push('\\');
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}
