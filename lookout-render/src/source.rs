//! One named result block from a multi-source response.
//!
//! A block is read as `{ NumOfResults?, InfoLeak?, Data? }` where `Data` is
//! either a list of records or a single record. Nothing in it is required.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::record::{Panel, present_record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceBlock {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub body: SourceBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceBody {
    /// `Data` was a list: one card per element.
    Cards { cards: Vec<Panel> },
    /// No list: the block itself (or its text) is the payload.
    Single { card: Panel },
}

pub fn present_source(name: &str, value: &Value) -> SourceBlock {
    let records = value.get("Data").and_then(Value::as_array);

    let badge = match value.get("NumOfResults") {
        Some(Value::Number(count)) => Some(count_text(count)),
        _ => records.map(|items| items.len().to_string()),
    };
    let subtitle = value
        .get("InfoLeak")
        .and_then(Value::as_str)
        .filter(|info| !info.trim().is_empty())
        .map(str::to_string);

    let body = match records {
        Some(items) => SourceBody::Cards {
            cards: items.iter().map(present_record).collect(),
        },
        None => SourceBody::Single {
            card: present_record(value),
        },
    };

    SourceBlock {
        title: name.to_string(),
        badge,
        subtitle,
        body,
    }
}

/// `3.0` reads as `3`; integers keep their exact text.
fn count_text(count: &Number) -> String {
    match count.as_f64() {
        Some(float) if count.is_f64() => float.to_string(),
        _ => count.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use serde_json::json;

    #[test]
    fn list_block_has_badge_subtitle_and_cards() {
        let block = present_source(
            "Collection #1",
            &json!({
                "NumOfResults": 3,
                "InfoLeak": "leaked",
                "Data": [{"a": 1}, {"a": 2}, {"a": 3}],
            }),
        );
        assert_eq!(block.title, "Collection #1");
        assert_eq!(block.badge.as_deref(), Some("3"));
        assert_eq!(block.subtitle.as_deref(), Some("leaked"));
        match block.body {
            SourceBody::Cards { cards } => {
                assert_eq!(cards.len(), 3);
                assert_eq!(cards[1].fields()[0].value, FieldValue::Plain("2".into()));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn badge_falls_back_to_data_length() {
        let block = present_source("s", &json!({"NumOfResults": "many", "Data": [1, 2]}));
        assert_eq!(block.badge.as_deref(), Some("2"));
    }

    #[test]
    fn primitive_list_items_become_text_cards() {
        let block = present_source("s", &json!({"Data": ["a@x.io", null, {"k": "v"}]}));
        match block.body {
            SourceBody::Cards { cards } => {
                assert_eq!(cards[0], Panel::Text { text: "a@x.io".into() });
                assert_eq!(cards[1], Panel::Text { text: "null".into() });
                assert_eq!(cards[2].fields().len(), 1);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn block_without_data_renders_itself() {
        let block = present_source("s", &json!({"a": 1, "b": 2}));
        assert_eq!(block.badge, None);
        assert_eq!(block.subtitle, None);
        match block.body {
            SourceBody::Single { card } => assert_eq!(card.fields().len(), 2),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn single_record_data_keeps_whole_block_as_payload() {
        let block = present_source(
            "s",
            &json!({"InfoLeak": "  ", "Data": {"email": "a@x.io"}}),
        );
        assert_eq!(block.subtitle, None);
        match block.body {
            SourceBody::Single { card } => {
                let labels: Vec<&str> = card.fields().iter().map(|f| f.label.as_str()).collect();
                assert_eq!(labels, ["InfoLeak", "Data"]);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn scalar_block_is_plain_text() {
        let block = present_source("s", &json!("nothing here"));
        assert_eq!(
            block.body,
            SourceBody::Single {
                card: Panel::Text { text: "nothing here".into() }
            }
        );
    }

    #[test]
    fn subtitle_keeps_original_text() {
        let block = present_source("s", &json!({"InfoLeak": " dump 2020 ", "Data": []}));
        assert_eq!(block.subtitle.as_deref(), Some(" dump 2020 "));
        assert_eq!(block.badge.as_deref(), Some("0"));
    }

    #[test]
    fn integral_float_counts_drop_the_fraction() {
        let block = present_source("Forum", &json!({"NumOfResults": 3.0, "Data": []}));
        assert_eq!(block.badge.as_deref(), Some("3"));

        let block = present_source("Forum", &json!({"NumOfResults": 2.5}));
        assert_eq!(block.badge.as_deref(), Some("2.5"));
    }
}
