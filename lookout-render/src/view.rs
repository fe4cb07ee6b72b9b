use serde::Serialize;
use serde_json::Value;

use crate::record::{Panel, present_entries, present_record};
use crate::shape::{Shape, ShapeKind, classify};
use crate::source::{SourceBlock, present_source};

/// Fully presented result, ready for layout or JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Empty,
    RawText { text: String },
    RecordList { cards: Vec<Panel> },
    AggregateMap { sources: Vec<SourceBlock> },
    GenericRecord { card: Panel },
}

impl View {
    pub fn kind(&self) -> ShapeKind {
        match self {
            View::Empty => ShapeKind::Empty,
            View::RawText { .. } => ShapeKind::RawText,
            View::RecordList { .. } => ShapeKind::RecordList,
            View::AggregateMap { .. } => ShapeKind::AggregateMap,
            View::GenericRecord { .. } => ShapeKind::GenericRecord,
        }
    }
}

/// Classify `value` and hand it to the matching presenter.
pub fn render(value: &Value) -> View {
    match classify(value) {
        Shape::RawText(text) => View::RawText { text },
        Shape::Empty => View::Empty,
        Shape::RecordList(items) => View::RecordList {
            cards: items.iter().map(present_record).collect(),
        },
        Shape::AggregateMap(entries) => View::AggregateMap {
            sources: entries
                .into_iter()
                .map(|(name, block)| present_source(name, block))
                .collect(),
        },
        Shape::GenericRecord(entries) => View::GenericRecord {
            card: present_entries(entries),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceBody;
    use serde_json::json;

    #[test]
    fn record_list_keeps_one_card_per_element() {
        match render(&json!([{"n": 1}, {"n": 2}])) {
            View::RecordList { cards } => {
                assert_eq!(cards.len(), 2);
                assert_eq!(cards[0].fields()[0].label, "n");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn aggregate_map_renders_every_visible_entry_as_a_block() {
        let view = render(&json!({
            "NumOfDatabases": 2,
            "search_time": 0.4,
            "Source A": {"NumOfResults": 1, "Data": [{"price": 5}]},
            "Source B": "no access",
        }));
        match view {
            View::AggregateMap { sources } => {
                let titles: Vec<&str> = sources.iter().map(|s| s.title.as_str()).collect();
                assert_eq!(titles, ["Source A", "Source B"]);
                match &sources[0].body {
                    SourceBody::Cards { cards } => assert_eq!(cards[0].fields()[0].label, "price"),
                    other => panic!("unexpected body: {other:?}"),
                }
                assert_eq!(
                    sources[1].body,
                    SourceBody::Single {
                        card: Panel::Text { text: "no access".into() }
                    }
                );
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn generic_record_never_shows_hidden_keys() {
        let view = render(&json!({"price": 1, "NumOfResults": 0, "name": "x"}));
        match view {
            View::GenericRecord { card } => {
                let labels: Vec<&str> = card.fields().iter().map(|f| f.label.as_str()).collect();
                assert_eq!(labels, ["name"]);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn only_meta_keys_gives_empty_card() {
        let view = render(&json!({"price": 1, "search time": 2}));
        assert_eq!(view, View::GenericRecord { card: Panel::Empty });
    }

    #[test]
    fn empty_list_is_empty_view() {
        assert_eq!(render(&json!([])), View::Empty);
    }

    #[test]
    fn view_serializes_with_kind_tags() {
        let out = serde_json::to_value(render(&json!({"a": 1}))).unwrap();
        assert_eq!(
            out,
            json!({
                "kind": "generic_record",
                "card": {
                    "kind": "grid",
                    "fields": [{"label": "a", "value": {"kind": "plain", "text": "1"}}]
                }
            })
        );
    }
}
