//! Inline span parsing (emphasis and inline code).

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());

/// A run of text sharing one emphasis state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    /// Span text
    pub text: String,
    /// Drawn in the bold face
    pub emphasized: bool,
}

impl InlineSpan {
    /// Create a plain span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    /// Create an emphasized span.
    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

/// Split a line into plain and emphasized spans.
///
/// Stray fence markers are dropped and inline code keeps its content without
/// the backticks. Unpaired `**` or `__` stay in the text literally.
pub fn parse_spans(text: &str) -> Vec<InlineSpan> {
    let text = text.replace("```", "");
    let text = INLINE_CODE.replace_all(&text, "$1");

    let mut spans = Vec::new();
    let mut last = 0;

    for caps in EMPHASIS.captures_iter(&text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        if inner.trim().is_empty() {
            continue;
        }

        push_plain(&mut spans, &text[last..whole.start()]);
        spans.push(InlineSpan::emphasized(inner));
        last = whole.end();
    }
    push_plain(&mut spans, &text[last..]);

    spans
}

fn push_plain(spans: &mut Vec<InlineSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(prev) if !prev.emphasized => prev.text.push_str(text),
        _ => spans.push(InlineSpan::plain(text)),
    }
}

/// Check if any span is emphasized.
pub fn has_emphasis(spans: &[InlineSpan]) -> bool {
    spans.iter().any(|s| s.emphasized)
}

/// Concatenated text of all spans, markers removed.
pub fn spans_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
