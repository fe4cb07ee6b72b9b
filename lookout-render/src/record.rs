//! Label/value presentation of a single record.
//!
//! Only one level is expanded: a field whose value is itself an object or
//! array is shown as an indented JSON dump, never as a nested grid.

use serde::Serialize;
use serde_json::Value;

use crate::shape::{pretty, stringify};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FieldValue {
    /// A primitive shown inline.
    Plain(String),
    /// A composite (or `null`) shown as structure-preserving text.
    Dump(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub label: String,
    pub value: FieldValue,
}

/// One card worth of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    Empty,
    Grid { fields: Vec<Field> },
    Text { text: String },
}

impl Panel {
    pub fn fields(&self) -> &[Field] {
        match self {
            Panel::Grid { fields } => fields.as_slice(),
            Panel::Empty | Panel::Text { .. } => &[],
        }
    }
}

/// Present every entry of a record. Arrays use their indices as labels and
/// primitives fall back to plain text.
pub fn present_record(value: &Value) -> Panel {
    match value {
        Value::Object(map) => present_entries(map.iter().map(|(k, v)| (k.as_str(), v))),
        Value::Array(items) => present_entries(
            items
                .iter()
                .enumerate()
                .map(|(idx, v)| (idx.to_string(), v)),
        ),
        other => Panel::Text {
            text: stringify(other),
        },
    }
}

/// Present an already selected list of entries, keeping their order.
pub fn present_entries<'a, K>(entries: impl IntoIterator<Item = (K, &'a Value)>) -> Panel
where
    K: Into<String>,
{
    let fields: Vec<Field> = entries
        .into_iter()
        .map(|(label, value)| Field {
            label: label.into(),
            value: present_value(value),
        })
        .collect();
    if fields.is_empty() {
        Panel::Empty
    } else {
        Panel::Grid { fields }
    }
}

fn present_value(value: &Value) -> FieldValue {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Dump(pretty(value)),
        Value::String(_) | Value::Bool(_) | Value::Number(_) => FieldValue::Plain(stringify(value)),
    }
}
