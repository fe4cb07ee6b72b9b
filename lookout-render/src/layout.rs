//! Terminal layout for a [`View`].

use crossterm::style::ContentStyle;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::record::{FieldValue, Panel};
use crate::source::{SourceBlock, SourceBody};
use crate::styles;
use crate::view::View;

pub const EMPTY_TEXT: &str = "No results found.";
pub const PLACEHOLDER_TEXT: &str = "Results will appear here.";

const INDENT: &str = "  ";
const DUMP_INDENT: &str = "    ";
const MAX_LABEL_WIDTH: usize = 24;
const MIN_VALUE_WIDTH: usize = 16;
const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy)]
pub struct TextLayout {
    /// Target line width in terminal columns.
    pub width: usize,
    /// Emit ANSI styling.
    pub color: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            width: 100,
            color: false,
        }
    }
}

impl TextLayout {
    pub fn new(width: usize, color: bool) -> Self {
        Self {
            width: width.max(MIN_VALUE_WIDTH * 2),
            color,
        }
    }

    /// Lay out `view` as newline-terminated text.
    pub fn write(&self, view: &View) -> String {
        let mut out = Vec::new();
        match view {
            View::Empty => out.push(self.paint(EMPTY_TEXT, styles::dim())),
            View::RawText { text } => self.push_wrapped(&mut out, text, "", styles::value()),
            View::RecordList { cards } => {
                for (idx, card) in cards.iter().enumerate() {
                    if idx > 0 {
                        out.push(self.rule(""));
                    }
                    self.push_panel(&mut out, card, "");
                }
            }
            View::AggregateMap { sources } => {
                for (idx, block) in sources.iter().enumerate() {
                    if idx > 0 {
                        out.push(String::new());
                    }
                    self.push_source(&mut out, block);
                }
            }
            View::GenericRecord { card } => self.push_panel(&mut out, card, ""),
        }
        finish(out)
    }

    /// Text shown before any search has produced a result.
    pub fn placeholder(&self) -> String {
        finish(vec![self.paint(PLACEHOLDER_TEXT, styles::dim())])
    }

    fn push_source(&self, out: &mut Vec<String>, block: &SourceBlock) {
        let mut header = self.paint(&block.title, styles::title());
        if let Some(badge) = &block.badge {
            header.push_str(INDENT);
            header.push_str(&self.paint(badge, styles::badge()));
        }
        out.push(header);

        if let Some(subtitle) = &block.subtitle {
            self.push_wrapped(out, subtitle, INDENT, styles::subtitle());
        }

        match &block.body {
            SourceBody::Cards { cards } => {
                for card in cards {
                    out.push(self.rule(INDENT));
                    self.push_panel(out, card, INDENT);
                }
            }
            SourceBody::Single { card } => {
                out.push(self.rule(INDENT));
                self.push_panel(out, card, INDENT);
            }
        }
    }

    fn push_panel(&self, out: &mut Vec<String>, panel: &Panel, indent: &str) {
        match panel {
            Panel::Empty => out.push(format!("{indent}{}", self.paint(EMPTY_TEXT, styles::dim()))),
            Panel::Text { text } => self.push_wrapped(out, text, indent, styles::value()),
            Panel::Grid { fields } => {
                let label_width = fields
                    .iter()
                    .map(|f| f.label.width())
                    .max()
                    .unwrap_or(0)
                    .min(MAX_LABEL_WIDTH);
                let value_width = self
                    .width
                    .saturating_sub(indent.width() + label_width + INDENT.len())
                    .max(MIN_VALUE_WIDTH);
                let hanging = " ".repeat(label_width + INDENT.len());

                for field in fields {
                    match &field.value {
                        FieldValue::Plain(text) => {
                            let label =
                                self.paint(&pad(&field.label, label_width), styles::label());
                            let mut first = true;
                            for segment in wrap_lines(text, value_width) {
                                let value = self.paint(&segment, styles::value());
                                if first {
                                    out.push(format!("{indent}{label}{INDENT}{value}"));
                                    first = false;
                                } else {
                                    out.push(format!("{indent}{hanging}{value}"));
                                }
                            }
                        }
                        FieldValue::Dump(text) => {
                            let label = self.paint(&field.label, styles::label());
                            out.push(format!("{indent}{label}"));
                            // Preformatted: indentation inside the dump is significant.
                            for line in text.lines() {
                                let line = self.paint(line, styles::value());
                                out.push(format!("{indent}{DUMP_INDENT}{line}"));
                            }
                        }
                    }
                }
            }
        }
    }

    fn push_wrapped(&self, out: &mut Vec<String>, text: &str, indent: &str, style: ContentStyle) {
        let width = self.width.saturating_sub(indent.width()).max(MIN_VALUE_WIDTH);
        for segment in wrap_lines(text, width) {
            if segment.is_empty() {
                out.push(indent.trim_end().to_string());
            } else {
                out.push(format!("{indent}{}", self.paint(&segment, style)));
            }
        }
    }

    fn rule(&self, indent: &str) -> String {
        let len = self.width.saturating_sub(indent.width()).min(RULE_WIDTH);
        format!("{indent}{}", self.paint(&"─".repeat(len), styles::dim()))
    }

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if self.color {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// Wrap each source line separately so explicit newlines survive.
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            out.push(String::new());
            continue;
        }
        let segments = wrap(raw_line, width.max(1));
        if segments.is_empty() {
            out.push(String::new());
        } else {
            out.extend(segments.into_iter().map(|seg| seg.into_owned()));
        }
    }
    out
}

fn pad(label: &str, width: usize) -> String {
    let used = label.width();
    if used >= width {
        label.to_string()
    } else {
        format!("{label}{}", " ".repeat(width - used))
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::render;
    use serde_json::json;

    fn plain(width: usize) -> TextLayout {
        TextLayout::new(width, false)
    }

    #[test]
    fn empty_view_says_no_results() {
        assert_eq!(plain(80).write(&View::Empty), "No results found.\n");
        assert_eq!(plain(80).placeholder(), "Results will appear here.\n");
    }

    #[test]
    fn raw_text_keeps_line_breaks() {
        let view = render(&json!("line one\n\nline three"));
        assert_eq!(plain(80).write(&view), "line one\n\nline three\n");
    }

    #[test]
    fn grid_aligns_labels() {
        let view = render(&json!({"email": "a@x.io", "id": 7}));
        assert_eq!(plain(80).write(&view), "email  a@x.io\nid     7\n");
    }

    #[test]
    fn dumps_are_indented_under_their_label() {
        let view = render(&json!({"geo": {"lat": 1}}));
        assert_eq!(
            plain(80).write(&view),
            "geo\n    {\n      \"lat\": 1\n    }\n"
        );
    }

    #[test]
    fn long_values_wrap_with_hanging_indent() {
        let view = render(&json!({"note": "alpha beta gamma delta epsilon zeta eta theta"}));
        let text = plain(32).write(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines[0].starts_with("note  alpha"));
        assert!(lines[1].starts_with("      "));
    }

    #[test]
    fn source_block_layout() {
        let view = render(&json!({
            "Breach": {"NumOfResults": 1, "InfoLeak": "leaked", "Data": [{"email": "a@x.io"}]}
        }));
        let text = plain(80).write(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Breach  1");
        assert_eq!(lines[1], "  leaked");
        assert_eq!(lines[2], format!("  {}", "─".repeat(RULE_WIDTH)));
        assert_eq!(lines[3], "  email  a@x.io");
    }

    #[test]
    fn record_list_cards_are_separated_by_rules() {
        let view = render(&json!([{"a": 1}, {"a": 2}]));
        let text = plain(80).write(&view);
        assert_eq!(text, format!("a  1\n{}\na  2\n", "─".repeat(RULE_WIDTH)));
    }

    #[test]
    fn color_mode_emits_ansi() {
        let view = render(&json!({"Breach": {"Data": []}}));
        let text = TextLayout::new(80, true).write(&view);
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("Breach"));
    }
}
