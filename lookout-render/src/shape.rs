//! Structural classification of untyped result values.
//!
//! There is no schema to consult, so the only discriminator between "this
//! object is a record" and "this object maps source names to result blocks"
//! is a probe for a `Data` or `InfoLeak` key one level down. A record whose
//! field happens to hold an object with a `Data` key is therefore shown as a
//! source map. That ambiguity is accepted as-is.

use lookout_common::meta::is_hidden;
use serde::Serialize;
use serde_json::Value;

/// Tag of the strategy chosen by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    RawText,
    Empty,
    RecordList,
    AggregateMap,
    GenericRecord,
}

/// Strategy plus the borrowed data needed to render it.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// Shown verbatim as preformatted text.
    RawText(String),
    /// Nothing to show.
    Empty,
    /// One card per element, in order.
    RecordList(&'a [Value]),
    /// One source block per visible entry, in key order.
    AggregateMap(Vec<(&'a str, &'a Value)>),
    /// The visible entries of a single record.
    GenericRecord(Vec<(&'a str, &'a Value)>),
}

impl Shape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::RawText(_) => ShapeKind::RawText,
            Shape::Empty => ShapeKind::Empty,
            Shape::RecordList(_) => ShapeKind::RecordList,
            Shape::AggregateMap(_) => ShapeKind::AggregateMap,
            Shape::GenericRecord(_) => ShapeKind::GenericRecord,
        }
    }
}

/// Pick the presentation strategy for `value`. First matching rule wins.
pub fn classify(value: &Value) -> Shape<'_> {
    match value {
        Value::String(text) => Shape::RawText(text.clone()),
        Value::Array(items) if items.is_empty() => Shape::Empty,
        // A single primitive demotes the whole list to text.
        Value::Array(items) if items.iter().all(is_composite) => Shape::RecordList(items),
        Value::Array(_) => Shape::RawText(pretty(value)),
        Value::Object(map) => {
            let visible: Vec<(&str, &Value)> = map
                .iter()
                .filter(|(key, _)| !is_hidden(key.as_str()))
                .map(|(key, v)| (key.as_str(), v))
                .collect();
            if visible.iter().any(|(_, v)| looks_like_source_block(v)) {
                Shape::AggregateMap(visible)
            } else {
                Shape::GenericRecord(visible)
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Shape::RawText(stringify(value)),
    }
}

/// Objects and arrays are records; everything else is a primitive.
pub fn is_composite(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn looks_like_source_block(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|block| block.contains_key("Data") || block.contains_key("InfoLeak"))
}

/// Plain-text form of a value: strings verbatim, composites pretty-printed.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        Value::Array(_) | Value::Object(_) => pretty(value),
    }
}

/// Two-space indented JSON.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
