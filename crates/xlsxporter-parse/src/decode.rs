//! Row value decoder.
//!
//! Each data row is decoded into a fresh [`ValueNode`] tree that mirrors the
//! shared schema. Nodes whose first cell is a null marker, whose type is a
//! comment, or whose tag the active filter rejects are dropped; at the root
//! that drops the whole row.

use std::fmt::Write as _;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use xlsxporter_common::CellValue;

use crate::error::DecodeError;
use crate::inline::{split_entries, split_key, unwrap_entry, wrap_entry};
use crate::scalar::coerce;
use crate::schema::{SchemaNode, SchemaRef};
use crate::types::{COMMENT_PREFIX, ParseOptions, RepeatPolicy};

/// Why a row (or a node inside it) produced no value.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Empty row or blank first cell.
    Blank,
    /// `nil` / `null` cell.
    Null,
    /// `//` row or comment-typed field.
    Comment,
    /// Field tag not admitted by the active filter.
    Untagged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Record(ValueNode),
    Skipped(SkipReason),
}

/// One decoded node. Built per row from the shared schema.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    name: String,
    path: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    schema: SchemaRef,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    data: Option<CellValue>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    children: Vec<ValueNode>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    record_id: Option<i32>,
}

impl ValueNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Decoded scalar; `None` for containers and structs.
    pub fn data(&self) -> Option<&CellValue> {
        self.data.as_ref()
    }

    pub fn children(&self) -> &[ValueNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&ValueNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Record id; set on record roots only.
    pub fn record_id(&self) -> Option<i32> {
        self.record_id
    }

    /// Re-encode this node in the single-cell form.
    pub fn to_inline(&self) -> String {
        if let Some(ref data) = self.data {
            return data.to_string();
        }
        let keyed = self.schema.is_dict() || self.schema.is_aggregate();
        let mut out = String::new();
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            if keyed {
                let _ = write!(out, "{}=", child.name);
            }
            if child.schema.is_container() || child.schema.is_aggregate() {
                out.push_str(&wrap_entry(&child.to_inline()));
            } else {
                out.push_str(&child.to_inline());
            }
        }
        out
    }
}

/// True for the case-insensitive `nil` / `null` markers.
pub fn is_null_marker(text: &str) -> bool {
    let text = text.trim();
    text.eq_ignore_ascii_case("nil") || text.eq_ignore_ascii_case("null")
}

/// Decode one data row against the sheet schema.
pub fn decode_row<S: AsRef<str>>(
    schema: &SchemaRef,
    record_id: i32,
    cells: &[S],
    options: &ParseOptions,
) -> Result<RowOutcome, DecodeError> {
    let row: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    let first = row.first().map(|c| c.trim()).unwrap_or("");
    if first.is_empty() {
        return Ok(RowOutcome::Skipped(SkipReason::Blank));
    }
    if first.starts_with(COMMENT_PREFIX) {
        return Ok(RowOutcome::Skipped(SkipReason::Comment));
    }

    let decoder = Decoder { options };
    let cells = Cells::new(&row);
    if let Some(reason) = decoder.skip_reason(schema, first) {
        return Ok(RowOutcome::Skipped(reason));
    }
    let mut record = decoder.node(schema, schema.name(), schema.path().to_string(), cells)?;
    record.record_id = Some(record_id);
    Ok(RowOutcome::Record(record))
}

/* ───────────────────────────── Cells ───────────────────────────── */

/// Window into a row starting at some absolute column. Reads past the end
/// of the row yield `""`; the first cell can be overridden after a dict key
/// has been split off it.
#[derive(Clone, Copy)]
struct Cells<'r> {
    row: &'r [&'r str],
    start: usize,
    head: Option<&'r str>,
}

impl<'r> Cells<'r> {
    fn new(row: &'r [&'r str]) -> Self {
        Cells {
            row,
            start: 0,
            head: None,
        }
    }

    fn get(&self, i: usize) -> &'r str {
        if i == 0 {
            if let Some(head) = self.head {
                return head;
            }
        }
        self.row.get(self.start + i).map(|c| c.trim()).unwrap_or("")
    }

    fn first(&self) -> &'r str {
        self.get(0)
    }

    fn at(&self, offset: usize) -> Cells<'r> {
        Cells {
            row: self.row,
            start: self.start + offset,
            head: None,
        }
    }

    fn with_head(self, head: &'r str) -> Cells<'r> {
        Cells {
            head: Some(head),
            ..self
        }
    }

    fn column(&self) -> usize {
        self.start
    }

    /// Whether the window starts past the end of the row.
    fn exhausted(&self) -> bool {
        self.start >= self.row.len()
    }

    fn all_blank(&self, len: usize) -> bool {
        (0..len).all(|i| self.get(i).is_empty())
    }
}

/* ──────────────────────────── Decoder ──────────────────────────── */

struct Decoder<'o> {
    options: &'o ParseOptions,
}

impl Decoder<'_> {
    fn skip_reason(&self, schema: &SchemaNode, first: &str) -> Option<SkipReason> {
        if is_null_marker(first) {
            Some(SkipReason::Null)
        } else if schema.base().is_comment() {
            Some(SkipReason::Comment)
        } else if !self.options.tag.admits(schema.tag()) {
            Some(SkipReason::Untagged)
        } else {
            None
        }
    }

    fn node(
        &self,
        schema: &SchemaRef,
        name: &str,
        path: String,
        cells: Cells<'_>,
    ) -> Result<ValueNode, DecodeError> {
        match schema.repeat() {
            RepeatPolicy::AggregateRoot => {
                let mut children = Vec::with_capacity(schema.children().len());
                for field in schema.children() {
                    let slot = cells.at(field.column());
                    if let Some(child) = self.child(schema, field, field.name(), &path, slot, 0)? {
                        children.push(child);
                    }
                }
                Ok(self.branch(schema, name, path, children))
            }
            RepeatPolicy::Inline if schema.is_container() => {
                self.inline(schema, name, path, cells.first(), cells.column())
            }
            RepeatPolicy::Single | RepeatPolicy::Fixed(_) if schema.is_container() => {
                self.spread(schema, name, path, cells)
            }
            _ => self.scalar(schema, name, path, cells.first(), cells.column()),
        }
    }

    /// Decode a child of `parent`, or `None` when it is skipped.
    fn child(
        &self,
        parent: &SchemaNode,
        schema: &SchemaRef,
        static_name: &str,
        parent_path: &str,
        cells: Cells<'_>,
        index: usize,
    ) -> Result<Option<ValueNode>, DecodeError> {
        if let Some(_reason) = self.skip_reason(schema, cells.first()) {
            #[cfg(feature = "tracing")]
            tracing::trace!(path = parent_path, reason = ?_reason, "dropped field");
            return Ok(None);
        }
        let (name, cells) = if parent.is_list() {
            (index.to_string(), cells)
        } else if parent.is_dict() && static_name.is_empty() {
            let (key, payload) = self.key(parent_path, cells.first(), cells.column())?;
            (key.to_string(), cells.with_head(payload))
        } else {
            (static_name.to_string(), cells)
        };
        let path = format!("{parent_path}.{name}");
        self.node(schema, &name, path, cells).map(Some)
    }

    /// Spread container: marker cell, declared slots, then element groups
    /// from the template while they fit. All-blank groups are dropped but
    /// still consume their columns.
    fn spread(
        &self,
        schema: &SchemaRef,
        name: &str,
        path: String,
        cells: Cells<'_>,
    ) -> Result<ValueNode, DecodeError> {
        let width = schema.slot_width().max(1) as usize;
        let mut children = Vec::new();
        let mut next = 1;

        for slot in schema.children() {
            next = slot.column() + slot.span();
            let group = cells.at(slot.column());
            if is_blank_group(slot, &group) {
                continue;
            }
            if let Some(child) = self.child(schema, slot, slot.name(), &path, group, children.len())? {
                children.push(child);
            }
        }

        if let Some(element) = schema.element() {
            let step = element.slot_width().max(1) as usize;
            let defaulted = element.descriptor().default.is_some();
            while next + step <= width {
                let group = cells.at(next);
                if group.exhausted() && !defaulted {
                    break;
                }
                next += step;
                if is_blank_group(element, &group) {
                    continue;
                }
                if let Some(child) = self.child(schema, element, "", &path, group, children.len())? {
                    children.push(child);
                }
            }
        }

        Ok(self.branch(schema, name, path, children))
    }

    /// Container packed into one cell.
    fn inline(
        &self,
        schema: &SchemaRef,
        name: &str,
        path: String,
        text: &str,
        column: usize,
    ) -> Result<ValueNode, DecodeError> {
        let Some(element) = schema.element() else {
            return Ok(self.branch(schema, name, path, Vec::new()));
        };
        let mut children = Vec::new();
        for entry in split_entries(schema.layer(), text) {
            let entry = entry.trim();
            if entry.is_empty() || self.skip_reason(element, entry).is_some() {
                continue;
            }
            let (child_name, payload) = if schema.is_list() {
                (children.len().to_string(), entry)
            } else if element.name().is_empty() {
                let (key, payload) = self.key(&path, entry, column)?;
                (key.to_string(), payload)
            } else {
                (element.name().to_string(), entry)
            };
            let child_path = format!("{path}.{child_name}");
            let child = if element.is_container() {
                self.inline(element, &child_name, child_path, unwrap_entry(payload), column)?
            } else {
                self.scalar(element, &child_name, child_path, payload, column)?
            };
            children.push(child);
        }
        Ok(self.branch(schema, name, path, children))
    }

    fn scalar(
        &self,
        schema: &SchemaRef,
        name: &str,
        path: String,
        text: &str,
        column: usize,
    ) -> Result<ValueNode, DecodeError> {
        let text = text.trim();
        let data = match schema.descriptor().default {
            Some(ref default) if text.is_empty() => default.value.clone(),
            _ => coerce(schema.base(), text).map_err(|source| DecodeError::Coerce {
                path: path.clone(),
                column,
                source,
            })?,
        };
        Ok(ValueNode {
            name: name.to_string(),
            path,
            schema: schema.clone(),
            data: Some(data),
            children: Vec::new(),
            record_id: None,
        })
    }

    fn key<'t>(
        &self,
        path: &str,
        text: &'t str,
        column: usize,
    ) -> Result<(&'t str, &'t str), DecodeError> {
        match split_key(text) {
            Some((key, payload)) if !key.is_empty() => Ok((key, payload)),
            _ => Err(DecodeError::MissingDictKey {
                path: path.to_string(),
                column,
                text: text.to_string(),
            }),
        }
    }

    fn branch(
        &self,
        schema: &SchemaRef,
        name: &str,
        path: String,
        children: Vec<ValueNode>,
    ) -> ValueNode {
        ValueNode {
            name: name.to_string(),
            path,
            schema: schema.clone(),
            data: None,
            children,
            record_id: None,
        }
    }
}

fn is_blank_group(schema: &SchemaNode, cells: &Cells<'_>) -> bool {
    schema.descriptor().default.is_none() && cells.all_blank(schema.span().max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;

    fn schema(names: &[&str], types: &[&str]) -> SchemaRef {
        build_schema("T", names, types, &[]).unwrap()
    }

    fn record(schema: &SchemaRef, row: &[&str]) -> ValueNode {
        match decode_row(schema, 1, row, &ParseOptions::default()).unwrap() {
            RowOutcome::Record(r) => r,
            RowOutcome::Skipped(reason) => panic!("row skipped: {reason:?}"),
        }
    }

    fn data(node: &ValueNode) -> Vec<String> {
        node.children()
            .iter()
            .map(|c| c.data().map(ToString::to_string).unwrap_or_default())
            .collect()
    }

    #[test]
    fn empty_cell_takes_default() {
        let s = schema(&["id", "level"], &["int", "int,42"]);
        let r = record(&s, &["1", ""]);
        assert_eq!(r.child("level").unwrap().data(), Some(&CellValue::Int(42)));
        assert_eq!(r.record_id(), Some(1));
    }

    #[test]
    fn blank_spread_elements_are_dropped() {
        let s = schema(&["id", "xs"], &["int", "list<int>:3"]);
        let r = record(&s, &["1", "", "5", "", "7"]);
        let xs = r.child("xs").unwrap();
        assert_eq!(data(xs), ["5", "7"]);
        let names: Vec<_> = xs.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["0", "1"]);
        assert_eq!(xs.children()[1].path(), "T.xs.1");
    }

    #[test]
    fn inline_dict_splits_keys() {
        let s = schema(&["id", "m"], &["int", "dict<int>:0"]);
        let r = record(&s, &["1", "a=1|b=2"]);
        let m = r.child("m").unwrap();
        assert_eq!(m.child("a").unwrap().data(), Some(&CellValue::Int(1)));
        assert_eq!(m.child("b").unwrap().path(), "T.m.b");
        assert_eq!(m.to_inline(), "a=1|b=2");
    }

    #[test]
    fn nested_inline_lists() {
        let s = schema(&["id", "g"], &["int", "list<list<int>:0>:0"]);
        let r = record(&s, &["1", "{1|2}|{3}"]);
        let g = r.child("g").unwrap();
        assert_eq!(g.children().len(), 2);
        assert_eq!(data(&g.children()[0]), ["1", "2"]);
        assert_eq!(g.children()[1].children()[0].path(), "T.g.1.0");
        assert_eq!(g.to_inline(), "{1|2}|{3}");
    }

    #[test]
    fn null_and_comment_rows_are_skipped() {
        let s = schema(&["id"], &["int"]);
        let opts = ParseOptions::default();
        assert_eq!(
            decode_row(&s, 0, &["NULL"], &opts),
            Ok(RowOutcome::Skipped(SkipReason::Null))
        );
        assert_eq!(
            decode_row(&s, 0, &["// draft"], &opts),
            Ok(RowOutcome::Skipped(SkipReason::Comment))
        );
        assert_eq!(
            decode_row(&s, 0, &[" "], &opts),
            Ok(RowOutcome::Skipped(SkipReason::Blank))
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            decode_row(&s, 0, &empty, &opts),
            Ok(RowOutcome::Skipped(SkipReason::Blank))
        );
    }

    #[test]
    fn null_field_is_dropped() {
        let s = schema(&["id", "a", "b"], &["int", "int", "string"]);
        let r = record(&s, &["1", "nil", "x"]);
        assert!(r.child("a").is_none());
        assert_eq!(r.child("b").unwrap().data(), Some(&CellValue::Text("x".into())));
    }

    #[test]
    fn untagged_fields_are_dropped_during_decode() {
        let s = build_schema("T", &["id", "a", "b"], &["int", "int", "int"], &["", "server", "client"])
            .unwrap();
        let opts = ParseOptions::with_tag("client");
        let RowOutcome::Record(r) = decode_row(&s, 1, &["1", "2", "3"], &opts).unwrap() else {
            panic!("row skipped");
        };
        assert!(r.child("a").is_none());
        assert!(r.child("b").is_some());
    }

    #[test]
    fn malformed_scalar_is_fatal() {
        let s = schema(&["id", "hp"], &["int", "int"]);
        let err = decode_row(&s, 1, &["1", "lots"], &ParseOptions::default()).unwrap_err();
        assert_eq!(err.path(), "T.hp");
        assert_eq!(err.column(), 1);
        assert!(matches!(err, DecodeError::Coerce { .. }));
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let s = schema(&["id", "name", "xs"], &["int", "string", "list<int>:2"]);
        let r = record(&s, &["1"]);
        assert_eq!(r.child("name").unwrap().data(), Some(&CellValue::Text(String::new())));
        assert!(r.child("xs").unwrap().children().is_empty());
    }

    #[test]
    fn nested_struct_fields_follow_marker() {
        let s = schema(
            &["id", "pos", "x", "y", "#", "tail"],
            &["int", "struct", "float", "float", "", "bool"],
        );
        let r = record(&s, &["1", "", "1.5", "2", "", "T"]);
        let pos = r.child("pos").unwrap();
        assert_eq!(data(pos), ["1.500", "2.000"]);
        assert_eq!(pos.child("y").unwrap().path(), "T.pos.y");
        assert_eq!(r.child("tail").unwrap().data(), Some(&CellValue::Boolean(true)));
    }

    #[test]
    fn spread_dict_with_runtime_keys() {
        let s = schema(&["id", "m", "", ""], &["int", "dict<string>:2", "", ""]);
        let r = record(&s, &["1", "", "hello=world", "q=say \"x\""]);
        let m = r.child("m").unwrap();
        assert_eq!(m.child("hello").unwrap().data(), Some(&CellValue::Text("world".into())));
        assert_eq!(m.child("q").unwrap().data().unwrap().to_string(), "say \\\"x\\\"");
    }

    #[test]
    fn dict_entry_without_key_is_fatal() {
        let s = schema(&["id", "m"], &["int", "dict<int>:0"]);
        let err = decode_row(&s, 1, &["1", "5"], &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, DecodeError::MissingDictKey { .. }));
    }

    #[test]
    fn enum_and_opaque_cells() {
        let s = schema(&["id", "q", "r"], &["int", "EQuality", "PBReward"]);
        let r = record(&s, &["1", "2 # rare", "gold:10"]);
        assert_eq!(r.child("q").unwrap().data(), Some(&CellValue::Enum(2)));
        assert_eq!(r.child("r").unwrap().data(), Some(&CellValue::Opaque("gold:10".into())));
    }

    #[test]
    fn single_container_reads_one_group() {
        let s = schema(&["id", "xs", ""], &["int", "list<int>:1", ""]);
        assert_eq!(data(record(&s, &["1", "", "5"]).child("xs").unwrap()), ["5"]);
        assert!(record(&s, &["1", "", ""]).child("xs").unwrap().children().is_empty());
    }

    #[test]
    fn wide_container_over_short_row() {
        let s = schema(&["id", "xs"], &["int", "list<int>:500000"]);
        let r = record(&s, &["1", "", "7", "", "8"]);
        assert_eq!(data(r.child("xs").unwrap()), ["7", "8"]);
    }
}
