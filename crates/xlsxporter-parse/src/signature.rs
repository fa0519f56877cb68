//! Grammar for one type-signature cell.
//!
//! ```text
//! signature := container | leaf
//! container := ("list" | "dict") "<" signature ">:" count
//! leaf      := keyword ["," default]
//! ```
//!
//! The element text runs from the first `<` to the last `>:`, so nested
//! containers need no escaping.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SignatureError;
use crate::scalar::coerce;
use crate::types::{BaseType, DefaultValue, RepeatPolicy, TypeDescriptor};

static CONTAINER_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^([^<,]*)<(.*)>:(.*)$").expect("container signature regex must compile")
});

/// A parsed signature and, for containers, the element's signature text.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature<'a> {
    pub descriptor: TypeDescriptor,
    pub nested: Option<&'a str>,
}

pub fn parse_signature<'a>(text: &'a str, tag: &str) -> Result<Signature<'a>, SignatureError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SignatureError::Empty);
    }

    if let Some(caps) = CONTAINER_FORM.captures(text) {
        let (Some(keyword), Some(nested), Some(count)) = (caps.get(1), caps.get(2), caps.get(3))
        else {
            return Err(SignatureError::Empty);
        };
        let keyword = keyword.as_str().trim();
        let base = match BaseType::classify(keyword) {
            b @ (BaseType::List | BaseType::Dict) => b,
            _ => {
                return Err(SignatureError::UnknownContainer {
                    keyword: keyword.to_string(),
                });
            }
        };
        let repeat = match count.as_str().trim().parse::<usize>() {
            Ok(n) => RepeatPolicy::from_count(n),
            Err(_) => {
                // Undeclared width: the container lives in one delimited cell.
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    signature = text,
                    count = count.as_str(),
                    "container count is not a number; treating as inline"
                );
                RepeatPolicy::Inline
            }
        };
        return Ok(Signature {
            descriptor: TypeDescriptor {
                base,
                repeat,
                tag: tag.trim().to_string(),
                default: None,
            },
            nested: Some(nested.as_str()),
        });
    }

    let (keyword, literal) = match text.split_once(',') {
        Some((k, d)) => (k.trim(), Some(d.trim())),
        None => (text, None),
    };
    let base = BaseType::classify(keyword);

    match base {
        BaseType::Struct => {
            if literal.is_some() {
                return Err(SignatureError::DefaultOnStruct);
            }
            return Ok(Signature {
                descriptor: TypeDescriptor::aggregate(),
                nested: None,
            });
        }
        BaseType::List | BaseType::Dict => {
            return Err(SignatureError::MissingElement {
                keyword: keyword.to_string(),
            });
        }
        _ => {}
    }

    let default = match literal {
        Some(literal) if !base.is_comment() => {
            let value = coerce(&base, literal).map_err(|source| SignatureError::InvalidDefault {
                keyword: keyword.to_string(),
                literal: literal.to_string(),
                source,
            })?;
            #[cfg(feature = "tracing")]
            tracing::debug!(keyword, literal, "decoded default value");
            Some(DefaultValue {
                literal: literal.to_string(),
                value,
            })
        }
        _ => None,
    };

    Ok(Signature {
        descriptor: TypeDescriptor {
            base,
            repeat: RepeatPolicy::Single,
            tag: tag.trim().to_string(),
            default,
        },
        nested: None,
    })
}
