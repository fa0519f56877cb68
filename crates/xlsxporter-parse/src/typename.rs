//! Target-language type names for schema nodes.

use std::fmt;

use xlsxporter_common::upper_camel;

use crate::error::TypeNameError;
use crate::schema::SchemaNode;
use crate::types::BaseType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    CSharp,
    Go,
}

impl TargetLanguage {
    pub fn label(&self) -> &'static str {
        match self {
            TargetLanguage::CSharp => "C#",
            TargetLanguage::Go => "Go",
        }
    }

    fn scalar(&self, base: &BaseType) -> Option<&'static str> {
        Some(match (self, base) {
            (TargetLanguage::CSharp, BaseType::Int) => "int",
            (TargetLanguage::CSharp, BaseType::Float) => "float",
            (TargetLanguage::Go, BaseType::Int) => "int32",
            (TargetLanguage::Go, BaseType::Float) => "float32",
            (_, BaseType::Bool) => "bool",
            (_, BaseType::String) => "string",
            _ => return None,
        })
    }

    fn list(&self, inner: &str) -> String {
        match self {
            TargetLanguage::CSharp => format!("List<{inner}>"),
            TargetLanguage::Go => format!("[]{inner}"),
        }
    }

    fn dict(&self, inner: &str) -> String {
        match self {
            TargetLanguage::CSharp => format!("Dictionary<string, {inner}>"),
            TargetLanguage::Go => format!("map[string]{inner}"),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl SchemaNode {
    /// Name of this node's type in `lang`. Enum and opaque keywords are used
    /// as-is; structs use the UpperCamel form of their field name.
    pub fn type_name(&self, lang: TargetLanguage) -> Result<String, TypeNameError> {
        let base = self.base();
        if let Some(name) = lang.scalar(base) {
            return Ok(name.to_string());
        }
        match (base, self.element()) {
            (BaseType::Enum(k) | BaseType::Opaque(k), _) => Ok(k.clone()),
            (BaseType::Struct, _) => Ok(upper_camel(self.name())),
            (BaseType::List, Some(element)) => Ok(lang.list(&element.type_name(lang)?)),
            (BaseType::Dict, Some(element)) => Ok(lang.dict(&element.type_name(lang)?)),
            _ => Err(TypeNameError::Unresolved {
                path: self.path().to_string(),
                keyword: base.keyword().to_string(),
                language: lang.label(),
            }),
        }
    }
}
