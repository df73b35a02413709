//! Line classification.
//!
//! The classifier looks at the current line, plus as many following lines as
//! the construct needs, and reports one [`Block`] together with how many
//! extra lines it swallowed.

use std::sync::LazyLock;

use regex::Regex;

use super::{Block, CalloutKind, Classified, ParseOptions};

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

static HEADING_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+#+\s*$").unwrap());

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+•]\s+(.*)$").unwrap());

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,9}\.)\s+(.*)$").unwrap());

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*(<[^>]+>|[^)\s]+)(?:\s+"[^"]*")?\s*\)$"#).unwrap()
});

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(`{3,}|~{3,})\s*([^\s`]*)").unwrap());

static CAPTION_NUMBERING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:fig(?:ure)?\.?\s*\d*\s*[:.\-]\s*|\d+\.\s+)").unwrap()
});

static FIGURE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Figure\b").unwrap());

static BOLD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*|__)([^*_:]{1,40}?)\s*(?::(?:\*\*|__)|(?:\*\*|__):)\s*(.*)$").unwrap()
});

static PLAIN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z][A-Za-z]*(?: [A-Za-z]+){0,2}):\s+(.*)$").unwrap());

/// Keyword groups in priority order; the first group with a match wins.
static CALLOUT_KEYWORDS: LazyLock<Vec<(CalloutKind, Regex)>> = LazyLock::new(|| {
    [
        (CalloutKind::Warning, r"(?i)\b(warning|caution|alert|danger)\b"),
        (CalloutKind::Important, r"(?i)\b(important|critical|note|key)\b"),
        (CalloutKind::Tip, r"(?i)\b(tip|hint|suggestion)\b"),
        (CalloutKind::Code, r"(?i)\b(code|example|snippet)\b"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

/// Classifies input lines into blocks.
pub struct LineClassifier<'a> {
    options: &'a ParseOptions,
}

impl<'a> LineClassifier<'a> {
    /// Create a classifier with the given options.
    pub fn new(options: &'a ParseOptions) -> Self {
        Self { options }
    }

    /// Classify `lines[0]`, looking ahead into the rest of the slice.
    ///
    /// An empty slice classifies as [`Block::Blank`].
    pub fn classify(&self, lines: &[&str]) -> Classified {
        let Some(&line) = lines.first() else {
            return Classified::single(Block::Blank);
        };
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Classified::single(Block::Blank);
        }

        if let Some(classified) = self.fence(lines) {
            return classified;
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            let level = caps[1].len() as u8;
            let text = clean_heading(&caps[2]);
            if text.is_empty() {
                return Classified::single(Block::Blank);
            }
            return Classified::single(Block::Heading { level, text });
        }

        if trimmed.starts_with('>') {
            return self.callout(lines);
        }

        if let Some(caps) = IMAGE.captures(trimmed) {
            return self.image(&caps[1], &caps[2], &lines[1..]);
        }

        if let Some(caps) = BULLET.captures(trimmed) {
            return Classified::single(Block::ListItem {
                level: self.list_level(line),
                explicit: None,
                text: caps[1].trim().to_string(),
            });
        }

        if let Some(caps) = NUMBERED.captures(trimmed) {
            return Classified::single(Block::ListItem {
                level: self.list_level(line),
                explicit: Some(caps[1].to_string()),
                text: caps[2].trim().to_string(),
            });
        }

        let lead_in =
            trimmed.ends_with(':') && trimmed.chars().count() > self.options.lead_in_min_chars;
        Classified::single(Block::Paragraph {
            text: trimmed.to_string(),
            lead_in,
        })
    }

    /// Nesting level from leading whitespace.
    fn list_level(&self, line: &str) -> usize {
        let columns: usize = line
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(|c| if c == '\t' { self.options.tab_width } else { 1 })
            .sum();
        (columns / self.options.indent_unit.max(1)).min(self.options.max_list_depth)
    }

    fn fence(&self, lines: &[&str]) -> Option<Classified> {
        let opening = lines[0].trim_start();
        let caps = FENCE_OPEN.captures(opening)?;
        let fence = &caps[1];
        let marker = fence.chars().next()?;
        let language = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut body = Vec::new();
        let mut consumed = 0;
        for line in &lines[1..] {
            consumed += 1;
            if is_closing_fence(line, marker, fence.len()) {
                return Some(Classified {
                    block: Block::Code {
                        language,
                        lines: body,
                    },
                    consumed,
                });
            }
            body.push(line.trim_end().to_string());
        }

        log::debug!("Unterminated code fence runs to end of input");
        Some(Classified {
            block: Block::Code {
                language,
                lines: body,
            },
            consumed,
        })
    }

    fn callout(&self, lines: &[&str]) -> Classified {
        let quoted: Vec<&str> = lines
            .iter()
            .take_while(|l| l.trim_start().starts_with('>'))
            .map(|l| l.trim_start().trim_start_matches('>').trim())
            .collect();

        let joined = quoted
            .iter()
            .filter(|l| !l.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let kind = callout_kind(&joined);
        let (title, text) = split_label(&joined);

        Classified {
            block: Block::Callout { kind, title, text },
            consumed: quoted.len() - 1,
        }
    }

    fn image(&self, alt: &str, path: &str, rest: &[&str]) -> Classified {
        let path = path.trim_start_matches('<').trim_end_matches('>').to_string();
        let alt = alt.trim().to_string();

        let candidate = match rest {
            [next, ..] if !next.trim().is_empty() => Some((next.trim(), 1)),
            [_, after, ..] if !after.trim().is_empty() => Some((after.trim(), 2)),
            _ => None,
        };

        let (caption, consumed) = match candidate.and_then(|(l, n)| caption_text(l).map(|c| (c, n))) {
            Some((caption, n)) => (Some(caption).filter(|c| !c.is_empty()), n),
            None => (None, 0),
        };

        Classified {
            block: Block::Image { path, alt, caption },
            consumed,
        }
    }
}

fn clean_heading(raw: &str) -> String {
    let text = HEADING_CLOSE.replace(raw.trim(), "");
    text.replace("**", "").replace("__", "").trim().to_string()
}

fn is_closing_fence(line: &str, marker: char, min_len: usize) -> bool {
    let trimmed = line.trim();
    let run = trimmed.chars().take_while(|&c| c == marker).count();
    run >= min_len && run == trimmed.chars().count()
}

/// Caption text if the line looks like a caption.
fn caption_text(line: &str) -> Option<String> {
    let inner = if let Some(inner) = single_wrapped(line, '*').or_else(|| single_wrapped(line, '_')) {
        inner
    } else if FIGURE_WORD.is_match(line) {
        line
    } else {
        return None;
    };

    Some(CAPTION_NUMBERING.replace(inner.trim(), "").trim().to_string())
}

/// Content of `*text*` (but not `**text**`).
fn single_wrapped(line: &str, marker: char) -> Option<&str> {
    let inner = line.strip_prefix(marker)?.strip_suffix(marker)?;
    if inner.is_empty() || inner.starts_with(marker) || inner.ends_with(marker) {
        return None;
    }
    Some(inner)
}

fn callout_kind(text: &str) -> CalloutKind {
    CALLOUT_KEYWORDS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(kind, _)| *kind)
        .unwrap_or_default()
}

/// Split a leading `**Label:**` or `Label:` off the callout text.
fn split_label(text: &str) -> (Option<String>, String) {
    let caps = BOLD_LABEL.captures(text).or_else(|| PLAIN_LABEL.captures(text));
    match caps {
        Some(caps) => {
            let label = caps[1].trim().to_string();
            let rest = caps[2].trim().to_string();
            (Some(label), rest)
        }
        None => (None, text.to_string()),
    }
}
