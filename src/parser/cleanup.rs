//! Input preparation applied to raw markup before classification.
//!
//! Generated documents often arrive wrapped in a code fence, with Windows line
//! endings, decomposed Unicode, or a placeholder line where a separately
//! rendered diagram belongs. The pipeline fixes those up so the classifier
//! sees clean lines.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Default placeholder line replaced by a diagram image.
pub const DEFAULT_DIAGRAM_PLACEHOLDER: &str = "[WORKFLOW_DIAGRAM_PLACEHOLDER]";

static OPENING_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(```|~~~)\s*(markdown|md)?\s*$").unwrap());

/// Options for input preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Convert `\r\n` and lone `\r` to `\n`
    pub normalize_line_endings: bool,

    /// Remove a code fence wrapping the entire document
    pub strip_wrapping_fence: bool,

    /// Diagram to splice in at the placeholder
    pub diagram: Option<DiagramInsert>,

    /// Drop placeholder lines when no diagram is configured
    pub remove_unused_placeholder: bool,
}

impl CleanupOptions {
    /// Options that leave the input untouched.
    pub fn disabled() -> Self {
        Self {
            normalize_unicode: false,
            normalize_line_endings: false,
            strip_wrapping_fence: false,
            diagram: None,
            remove_unused_placeholder: false,
        }
    }

    /// Set the diagram to insert.
    pub fn with_diagram(mut self, diagram: DiagramInsert) -> Self {
        self.diagram = Some(diagram);
        self
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_line_endings: true,
            strip_wrapping_fence: true,
            diagram: None,
            remove_unused_placeholder: true,
        }
    }
}

/// A diagram image spliced into the document at a placeholder line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramInsert {
    /// Line content that marks the insertion point
    pub placeholder: String,

    /// Image file of the rendered diagram
    pub image_path: PathBuf,

    /// Optional level-2 heading placed above the image
    pub heading: Option<String>,

    /// Alternative text of the image reference
    pub alt: String,

    /// Caption placed under the image
    pub caption: Option<String>,
}

impl DiagramInsert {
    /// Create an insert for the given image with default wording.
    pub fn new(image_path: impl Into<PathBuf>) -> Self {
        Self {
            image_path: image_path.into(),
            ..Self::default()
        }
    }

    /// Markup lines that replace the placeholder.
    fn markup_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(ref heading) = self.heading {
            lines.push(format!("## {}", heading));
            lines.push(String::new());
        }
        lines.push(format!("![{}]({})", self.alt, self.image_path.display()));
        if let Some(ref caption) = self.caption {
            lines.push(String::new());
            lines.push(format!("*Figure: {}*", caption));
        }
        lines
    }
}

impl Default for DiagramInsert {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_DIAGRAM_PLACEHOLDER.to_string(),
            image_path: PathBuf::new(),
            heading: Some("Workflow Diagram".to_string()),
            alt: "Workflow Diagram".to_string(),
            caption: Some("High-level workflow architecture of the project".to_string()),
        }
    }
}

/// Prepared lines, each tagged with the 1-based input line it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedInput {
    lines: Vec<String>,
    origins: Vec<usize>,
}

impl PreparedInput {
    /// Number the lines of `text` from 1.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let origins = (1..=lines.len()).collect();
        Self { lines, origins }
    }

    /// Prepared lines in order.
    pub fn lines(&self) -> Vec<&str> {
        self.lines.iter().map(String::as_str).collect()
    }

    /// Input line that prepared line `index` came from.
    pub fn source_line(&self, index: usize) -> usize {
        self.origins.get(index).copied().unwrap_or(index + 1)
    }

    /// Prepared lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn push(&mut self, line: impl Into<String>, origin: usize) {
        self.lines.push(line.into());
        self.origins.push(origin);
    }

    fn entries(&self) -> impl Iterator<Item = (&String, usize)> {
        self.lines.iter().zip(self.origins.iter().copied())
    }

    fn retain(self, keep: impl Fn(&str) -> bool) -> Self {
        let mut kept = Self::default();
        for (line, origin) in self.lines.into_iter().zip(self.origins) {
            if keep(line.as_str()) {
                kept.push(line, origin);
            }
        }
        kept
    }
}

/// Input preparation pipeline.
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Process raw input into classifier-ready lines.
    pub fn process(&self, text: &str) -> PreparedInput {
        let mut result = text.to_string();

        if self.options.normalize_line_endings {
            result = result.replace("\r\n", "\n").replace('\r', "\n");
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        let mut prepared = PreparedInput::from_text(&result);

        if self.options.strip_wrapping_fence {
            if let Some(inner) = strip_wrapping_fence(&prepared) {
                log::debug!("Removed code fence wrapping the whole document");
                prepared = inner;
            }
        }

        if let Some(ref diagram) = self.options.diagram {
            prepared = insert_diagram(&prepared, diagram);
        } else if self.options.remove_unused_placeholder {
            prepared = prepared.retain(|line| line.trim() != DEFAULT_DIAGRAM_PLACEHOLDER);
        }

        prepared
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

/// Return the document body when the whole text sits inside one fence.
///
/// Blank lines around the fence are ignored. A `markdown`/`md` tagged opener
/// always counts as a wrapper. A bare opener only counts when the closing
/// fence is the last line and no other fence lines appear in between, so a
/// document that merely starts with a code block is left alone.
fn strip_wrapping_fence(input: &PreparedInput) -> Option<PreparedInput> {
    let start = input.lines.iter().position(|l| !l.trim().is_empty())?;
    let end = input.lines.iter().rposition(|l| !l.trim().is_empty())?;
    let caps = OPENING_WRAPPER.captures(&input.lines[start])?;
    let fence = caps.get(1)?.as_str();
    let tagged = caps.get(2).is_some();

    let closes = end > start && input.lines[end].trim() == fence;
    if !tagged
        && (!closes
            || input.lines[start + 1..end]
                .iter()
                .any(|l| l.trim_start().starts_with(fence)))
    {
        return None;
    }

    let stop = if closes { end } else { end + 1 };
    let mut inner = PreparedInput::default();
    for index in start + 1..stop {
        inner.push(input.lines[index].clone(), input.origins[index]);
    }
    Some(inner)
}

/// Replace the placeholder with diagram markup.
///
/// Without a placeholder the diagram goes before the first level-2 heading
/// after the title; failing that it is appended. Inserted lines report the
/// input line of the placeholder or heading they replace or precede.
fn insert_diagram(input: &PreparedInput, diagram: &DiagramInsert) -> PreparedInput {
    let markup = diagram.markup_lines();
    let placeholder = diagram.placeholder.trim();
    let mut out = PreparedInput::default();

    if input.lines.iter().any(|line| line.trim() == placeholder) {
        log::debug!("Replacing diagram placeholder with {}", diagram.image_path.display());
        for (line, origin) in input.entries() {
            if line.trim() == placeholder {
                for markup_line in &markup {
                    out.push(markup_line.clone(), origin);
                }
            } else {
                out.push(line.clone(), origin);
            }
        }
        return out;
    }

    let insert_at = input
        .lines
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, line)| line.starts_with("## "))
        .map(|(i, _)| i);

    match insert_at {
        Some(at) => {
            log::debug!("Diagram placeholder missing, inserting before line {}", input.source_line(at));
            for (index, (line, origin)) in input.entries().enumerate() {
                if index == at {
                    for markup_line in &markup {
                        out.push(markup_line.clone(), origin);
                    }
                    out.push("", origin);
                }
                out.push(line.clone(), origin);
            }
        }
        None => {
            log::debug!("Diagram placeholder missing, appending diagram");
            out = input.clone();
            while out.lines.last().is_some_and(|l| l.trim().is_empty()) {
                out.lines.pop();
                out.origins.pop();
            }
            let origin = out.origins.last().copied().unwrap_or(1);
            if !out.is_empty() {
                out.push("", origin);
            }
            for markup_line in markup {
                out.push(markup_line, origin);
            }
        }
    }
    out
}
