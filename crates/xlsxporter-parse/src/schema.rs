//! Schema tree builder.
//!
//! The header is a pre-order flattening of the field tree: a container
//! spread over columns owns the `slot_width - 1` columns after its own, and
//! a nested struct owns the columns up to its `#` end marker. Every build
//! function takes the current column and returns the node it built together
//! with the next unconsumed column.

use std::fmt::{self, Write as _};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::signature::{Signature, parse_signature};
use crate::types::{BaseType, RepeatPolicy, TagFilter, TypeDescriptor};

/// Header cell names starting with this end the enclosing field list.
pub const END_MARKER: char = '#';

/// Widest a spread container may be. Larger counts cannot match any real
/// sheet and are rejected instead of allocated.
pub const MAX_SLOT_WIDTH: usize = 1 << 20;

pub type SchemaRef = Arc<SchemaNode>;

/// One declared field or container element template. Immutable once built.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) element: Option<SchemaRef>,
    pub(crate) children: Vec<SchemaRef>,
    pub(crate) slot_width: isize,
    pub(crate) layer: usize,
    pub(crate) column: usize,
    pub(crate) span: usize,
}

impl SchemaNode {
    /// Field name; empty for element templates and runtime-keyed dict slots.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dot-joined ancestry, e.g. `Item.rewards.0`. Element templates end in `[]`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn base(&self) -> &BaseType {
        &self.descriptor.base
    }

    pub fn repeat(&self) -> RepeatPolicy {
        self.descriptor.repeat
    }

    pub fn tag(&self) -> &str {
        &self.descriptor.tag
    }

    /// Element template of a list or dict.
    pub fn element(&self) -> Option<&SchemaRef> {
        self.element.as_ref()
    }

    /// Declared children in column order: struct fields, or the slots a
    /// spread container declares in the header.
    pub fn children(&self) -> &[SchemaRef] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&SchemaRef> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Row cells this node occupies when spread over columns; `-1` for
    /// aggregates.
    pub fn slot_width(&self) -> isize {
        self.slot_width
    }

    /// Container levels at and below this node (0 for scalars).
    pub fn layer(&self) -> usize {
        self.layer
    }

    /// Offset of this node inside its parent's cells.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Header columns consumed by this node.
    pub fn span(&self) -> usize {
        self.span
    }

    pub fn is_container(&self) -> bool {
        self.descriptor.base.is_container()
    }

    pub fn is_aggregate(&self) -> bool {
        self.descriptor.is_aggregate()
    }

    pub fn is_list(&self) -> bool {
        self.descriptor.base == BaseType::List
    }

    pub fn is_dict(&self) -> bool {
        self.descriptor.base == BaseType::Dict
    }

    /// Declared type with the layout stripped: `list<int>`, `dict<list<int>>`.
    pub fn long_type(&self) -> String {
        match (&self.descriptor.base, &self.element) {
            (BaseType::List | BaseType::Dict, Some(element)) => {
                format!("{}<{}>", self.descriptor.base, element.long_type())
            }
            (base, _) => base.keyword().to_string(),
        }
    }

    /// Copy of this root without the top-level fields `filter` excludes:
    /// comment columns and fields whose tag it does not admit.
    pub fn pruned(&self, filter: &TagFilter) -> SchemaRef {
        let children = self
            .children
            .iter()
            .filter(|c| !c.descriptor.base.is_comment() && filter.admits(&c.descriptor.tag))
            .cloned()
            .collect();
        Arc::new(SchemaNode {
            children,
            ..self.clone()
        })
    }

    /// Indented one-line-per-node dump, used by diagnostics.
    pub fn tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{:indent$}{} : {}", "", self.path, self.long_type(), indent = depth * 2);
        match self.descriptor.repeat {
            RepeatPolicy::AggregateRoot => {}
            RepeatPolicy::Inline => out.push_str(" inline"),
            RepeatPolicy::Single | RepeatPolicy::Fixed(_) if self.is_container() => {
                let _ = write!(out, " x{} width={}", self.descriptor.repeat.groups(), self.slot_width);
            }
            _ => {}
        }
        if !self.descriptor.tag.is_empty() {
            let _ = write!(out, " [{}]", self.descriptor.tag);
        }
        if let Some(ref default) = self.descriptor.default {
            let _ = write!(out, " = {}", default.value);
        }
        out.push('\n');
        for child in &self.children {
            child.write_tree(out, depth + 1);
        }
    }
}

impl fmt::Display for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tree())
    }
}

/* ───────────────────────────── Builder ───────────────────────────── */

/// Build the schema of a sheet from its three header rows.
///
/// `root_name` becomes the root's name and path. The rows may have
/// different lengths; missing cells read as empty.
pub fn build_schema<S: AsRef<str>>(
    root_name: &str,
    names: &[S],
    types: &[S],
    tags: &[S],
) -> Result<SchemaRef, SchemaError> {
    let header = Header::new(names, types, tags);
    let builder = Builder { header: &header };
    let (children, end) = builder.fields(root_name, 0, 0, header.len)?;
    Ok(Arc::new(SchemaNode {
        name: root_name.to_string(),
        path: root_name.to_string(),
        descriptor: TypeDescriptor::aggregate(),
        element: None,
        children,
        slot_width: -1,
        layer: 0,
        column: 0,
        span: end,
    }))
}

struct Header<'a> {
    names: Vec<&'a str>,
    types: Vec<&'a str>,
    tags: Vec<&'a str>,
    len: usize,
}

impl<'a> Header<'a> {
    fn new<S: AsRef<str>>(names: &'a [S], types: &'a [S], tags: &'a [S]) -> Self {
        let collect = |row: &'a [S]| row.iter().map(|c| c.as_ref().trim()).collect::<Vec<_>>();
        Header {
            len: names.len().max(types.len()).max(tags.len()),
            names: collect(names),
            types: collect(types),
            tags: collect(tags),
        }
    }

    fn name(&self, col: usize) -> &'a str {
        self.names.get(col).copied().unwrap_or("")
    }

    fn ty(&self, col: usize) -> &'a str {
        self.types.get(col).copied().unwrap_or("")
    }

    fn tag(&self, col: usize) -> &'a str {
        self.tags.get(col).copied().unwrap_or("")
    }
}

struct Builder<'h, 'a> {
    header: &'h Header<'a>,
}

impl Builder<'_, '_> {
    /// Fields of an aggregate, from `start` up to an end marker or `end`.
    /// `origin` is the aggregate's own column; child columns are relative to it.
    fn fields(
        &self,
        parent_path: &str,
        origin: usize,
        start: usize,
        end: usize,
    ) -> Result<(Vec<SchemaRef>, usize), SchemaError> {
        let mut fields = Vec::new();
        let mut pos = start;
        while pos < end {
            let name = self.header.name(pos);
            let ty = self.header.ty(pos);
            if name.starts_with(END_MARKER) {
                return Ok((fields, pos + 1));
            }
            if name.is_empty() && ty.is_empty() {
                pos += 1;
                continue;
            }
            if name.is_empty() {
                return Err(SchemaError::MissingName {
                    column: pos,
                    signature: ty.to_string(),
                });
            }
            if ty.is_empty() {
                return Err(SchemaError::MissingSignature {
                    column: pos,
                    name: name.to_string(),
                });
            }

            let sig = self.signature(pos, name)?;
            let path = format!("{parent_path}.{name}");
            let (node, next) = if sig.descriptor.is_aggregate() {
                let (children, next) = self.fields(&path, pos, pos + 1, end)?;
                let node = SchemaNode {
                    name: name.to_string(),
                    path,
                    descriptor: sig.descriptor,
                    element: None,
                    children,
                    slot_width: -1,
                    layer: 0,
                    column: pos - origin,
                    span: next - pos,
                };
                (node, next)
            } else {
                self.typed(name, path, sig, pos, pos - origin)?
            };
            fields.push(Arc::new(node));
            pos = next;
        }
        Ok((fields, pos))
    }

    /// A non-aggregate node declared at header column `pos`.
    fn typed(
        &self,
        name: &str,
        path: String,
        sig: Signature<'_>,
        pos: usize,
        column: usize,
    ) -> Result<(SchemaNode, usize), SchemaError> {
        let Some(nested) = sig.nested else {
            let node = scalar_node(name, path, sig.descriptor, column);
            return Ok((node, pos + 1));
        };

        let element = template(nested, &sig.descriptor.tag, format!("{path}[]"), pos)?;
        let mut node = container_node(name, path, sig.descriptor, element, column, pos)?;
        if node.descriptor.repeat.has_marker() {
            node.children = self.slots(&node, pos)?;
        }
        let next = pos + node.span;
        Ok((node, next))
    }

    /// Header-declared slots of a spread container whose marker is at `pos`.
    fn slots(&self, container: &SchemaNode, pos: usize) -> Result<Vec<SchemaRef>, SchemaError> {
        let Some(element) = container.element.as_ref() else {
            return Ok(Vec::new());
        };
        let end = pos + container.span;
        // Groups past the header's last column are filled from the template
        // while decoding.
        let last = end.min(self.header.len);
        let mut slots = Vec::new();
        let mut cur = pos + 1;
        while cur < last {
            let name = self.header.name(cur);
            if name.starts_with(END_MARKER) {
                break;
            }
            let slot_name = if container.is_list() {
                slots.len().to_string()
            } else {
                name.to_string()
            };
            let slot_path = if slot_name.is_empty() {
                format!("{}[]", container.path)
            } else {
                format!("{}.{slot_name}", container.path)
            };

            let ty = self.header.ty(cur);
            let (node, next) = if ty.is_empty() {
                self.place(element, &slot_name, slot_path, cur, cur - pos)?
            } else {
                let sig = self.signature(cur, name)?;
                if sig.descriptor.is_aggregate() {
                    return Err(SchemaError::MisplacedStruct {
                        column: cur,
                        path: slot_path,
                    });
                }
                self.typed(&slot_name, slot_path, sig, cur, cur - pos)?
            };
            if next > end {
                return Err(SchemaError::SlotOverflow {
                    column: cur,
                    path: node.path,
                    width: next - cur,
                    available: end - cur,
                });
            }
            slots.push(Arc::new(node));
            cur = next;
        }
        Ok(slots)
    }

    /// Instantiate `template` at header column `pos`. Spread containers read
    /// their own slots from the header.
    fn place(
        &self,
        template: &SchemaRef,
        name: &str,
        path: String,
        pos: usize,
        column: usize,
    ) -> Result<(SchemaNode, usize), SchemaError> {
        let mut node = relocated(template, name, path, column);
        if node.is_container() && node.descriptor.repeat.has_marker() {
            node.children = self.slots(&node, pos)?;
        }
        let next = pos + node.span;
        Ok((node, next))
    }

    fn signature(&self, pos: usize, name: &str) -> Result<Signature<'_>, SchemaError> {
        parse_signature(self.header.ty(pos), self.header.tag(pos)).map_err(|source| {
            SchemaError::Signature {
                column: pos,
                name: name.to_string(),
                source,
            }
        })
    }
}

/// Element template parsed from a container's nested signature text.
fn template(text: &str, tag: &str, path: String, pos: usize) -> Result<SchemaRef, SchemaError> {
    let sig = parse_signature(text, tag).map_err(|source| SchemaError::Signature {
        column: pos,
        name: path.clone(),
        source,
    })?;
    if sig.descriptor.is_aggregate() {
        return Err(SchemaError::MisplacedStruct { column: pos, path });
    }
    let node = match sig.nested {
        None => scalar_node("", path, sig.descriptor, 0),
        Some(nested) => {
            let element = template(nested, tag, format!("{path}[]"), pos)?;
            container_node("", path, sig.descriptor, element, 0, pos)?
        }
    };
    Ok(Arc::new(node))
}

fn scalar_node(name: &str, path: String, descriptor: TypeDescriptor, column: usize) -> SchemaNode {
    SchemaNode {
        name: name.to_string(),
        path,
        descriptor,
        element: None,
        children: Vec::new(),
        slot_width: 1,
        layer: 0,
        column,
        span: 1,
    }
}

fn container_node(
    name: &str,
    path: String,
    descriptor: TypeDescriptor,
    element: SchemaRef,
    column: usize,
    pos: usize,
) -> Result<SchemaNode, SchemaError> {
    let width = match descriptor.repeat {
        RepeatPolicy::Single | RepeatPolicy::Fixed(_) => {
            let count = descriptor.repeat.groups();
            (element.slot_width.max(1) as usize)
                .checked_mul(count)
                .and_then(|w| w.checked_add(1))
                .filter(|&w| w <= MAX_SLOT_WIDTH)
                .ok_or_else(|| SchemaError::WidthOverflow {
                    column: pos,
                    path: path.clone(),
                    count,
                })?
        }
        _ => 1,
    };
    Ok(SchemaNode {
        name: name.to_string(),
        path,
        layer: element.layer + 1,
        element: Some(element),
        descriptor,
        children: Vec::new(),
        slot_width: width as isize,
        column,
        span: width,
    })
}

/// Copy of `template` under a new name, path and column. Nested element
/// templates are re-rooted under the new path.
fn relocated(template: &SchemaNode, name: &str, path: String, column: usize) -> SchemaNode {
    let element = template
        .element
        .as_ref()
        .map(|e| Arc::new(relocated(e, "", format!("{path}[]"), 0)));
    SchemaNode {
        name: name.to_string(),
        path,
        element,
        children: Vec::new(),
        column,
        ..template.clone()
    }
}
