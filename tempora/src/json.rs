// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The wire encoding for [`RecurrentEventSet`]s.
//!
//! ```text
//! node := ["AND", elem, elem, elem...]
//!       | ["OR",  elem, elem, elem...]
//!       | ["NOT", elem]
//! elem := node | leaf
//! leaf := [start, stop, unit, recurrence]
//! ```
//!
//! `unit` and `recurrence` are lowercase unit names (`"day"`, `"month"`, ...);
//! `recurrence` may be `null` for a non-recurring leaf. `start` must be
//! strictly less than `stop`: unlike [`RecurrentEvent::new`], which also
//! allows `start == stop` for an always-empty leaf built directly in Rust,
//! the wire format rejects it outright. A bare leaf array is only ever valid
//! nested inside a `node`; the document root must be a node.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::expression::Node;
use crate::recurrent_event::RecurrentEvent;
use crate::recurrent_event_set::RecurrentEventSet;
use crate::unit::Unit;

/// Serializes `set` to its canonical JSON wire form.
#[must_use]
pub fn to_json(set: &RecurrentEventSet) -> Value {
    node_to_value(set.root())
}

fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Leaf(event) => leaf_to_value(event),
        Node::And(children) => tagged_array("AND", children),
        Node::Or(children) => tagged_array("OR", children),
        Node::Not(child) => Value::Array(vec![Value::from("NOT"), node_to_value(child)]),
    }
}

fn tagged_array(tag: &str, children: &[Node]) -> Value {
    let mut out = Vec::with_capacity(children.len() + 1);
    out.push(Value::from(tag));
    out.extend(children.iter().map(node_to_value));
    Value::Array(out)
}

fn leaf_to_value(event: &RecurrentEvent) -> Value {
    Value::Array(vec![
        Value::from(event.start),
        Value::from(event.stop),
        Value::from(event.unit.as_str()),
        match event.recurrence {
            Some(recurrence) => Value::from(recurrence.as_str()),
            None => Value::Null,
        },
    ])
}

/// Parses a `RecurrentEventSet` from its canonical JSON wire form.
pub fn from_json_value(value: &Value) -> Result<RecurrentEventSet> {
    let root = parse_node(value)?;
    RecurrentEventSet::new(root)
}

/// Parses a `RecurrentEventSet` from a JSON document, as text.
pub fn from_json_str(text: &str) -> Result<RecurrentEventSet> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| Error::structural(format!("invalid JSON: {e}")))?;
    from_json_value(&value)
}

/// Checks that `value` is a well-formed document without building a set.
pub fn validate_json_value(value: &Value) -> Result<()> {
    from_json_value(value).map(|_| ())
}

/// Checks that `text` is well-formed JSON in the wire grammar.
pub fn validate_json_str(text: &str) -> Result<()> {
    from_json_str(text).map(|_| ())
}

fn parse_node(value: &Value) -> Result<Node> {
    let array = value
        .as_array()
        .ok_or_else(|| Error::structural("expected a JSON array"))?;
    let tag = array
        .first()
        .and_then(Value::as_str)
        .ok_or_else(|| Error::structural("array is missing a leading tag string"))?;

    match tag {
        "AND" => Node::and(parse_elems(&array[1..])?),
        "OR" => Node::or(parse_elems(&array[1..])?),
        "NOT" => {
            let rest = &array[1..];
            if rest.len() != 1 {
                return Err(Error::structural(format!(
                    "NOT takes exactly one operand, got {}",
                    rest.len()
                )));
            }
            Ok(Node::not(parse_elem(&rest[0])?))
        }
        other => Err(Error::structural(format!("unknown node tag \"{other}\""))),
    }
}

fn parse_elems(values: &[Value]) -> Result<Vec<Node>> {
    values.iter().map(parse_elem).collect()
}

/// An "elem" in the grammar is either a nested node or a bare leaf array; the
/// two are disambiguated by whether the leading element is a recognized tag.
fn parse_elem(value: &Value) -> Result<Node> {
    let is_node = value
        .as_array()
        .and_then(|a| a.first())
        .and_then(Value::as_str)
        .is_some_and(|tag| matches!(tag, "AND" | "OR" | "NOT"));

    if is_node {
        parse_node(value)
    } else {
        Ok(Node::leaf(parse_leaf(value)?))
    }
}

fn parse_leaf(value: &Value) -> Result<RecurrentEvent> {
    let array = value
        .as_array()
        .ok_or_else(|| Error::structural("expected a leaf array"))?;
    let [start, stop, unit, recurrence] = array.as_slice() else {
        return Err(Error::structural(format!(
            "leaf array must have exactly 4 elements, got {}",
            array.len()
        )));
    };

    let start = start
        .as_i64()
        .ok_or_else(|| Error::structural("leaf start must be an integer"))?;
    let stop = stop
        .as_i64()
        .ok_or_else(|| Error::structural("leaf stop must be an integer"))?;
    if start >= stop {
        return Err(Error::structural(format!(
            "leaf start ({start}) must be strictly less than stop ({stop})"
        )));
    }
    let unit = unit
        .as_str()
        .and_then(Unit::from_str_opt)
        .ok_or_else(|| Error::structural("leaf unit is missing or unrecognized"))?;
    let recurrence = match recurrence {
        Value::Null => None,
        Value::String(s) => Some(
            Unit::from_str_opt(s)
                .ok_or_else(|| Error::structural(format!("unrecognized recurrence unit \"{s}\"")))?,
        ),
        _ => return Err(Error::structural("leaf recurrence must be a string or null")),
    };

    RecurrentEvent::new(start, stop, unit, recurrence)
}
