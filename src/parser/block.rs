//! Block-level constructs recognized in the input.

use serde::{Deserialize, Serialize};

/// A classified unit of input, spanning one or more lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `#`-prefixed heading
    Heading {
        /// Number of leading `#` (1-6)
        level: u8,
        /// Heading text with markers removed
        text: String,
    },

    /// A line of body text
    Paragraph {
        /// Raw text, inline markers still present
        text: String,
        /// Colon-terminated introduction to the following content
        lead_in: bool,
    },

    /// Bulleted or numbered list entry
    ListItem {
        /// Nesting level (0 = top)
        level: usize,
        /// Number as written (`3.`), when the item is explicitly numbered
        explicit: Option<String>,
        /// Item text, inline markers still present
        text: String,
    },

    /// `![alt](path)` image reference
    Image {
        /// Path or URI as written
        path: String,
        /// Alternative text
        alt: String,
        /// Caption found on the following line(s)
        caption: Option<String>,
    },

    /// Fenced code block
    Code {
        /// Language tag on the opening fence
        language: Option<String>,
        /// Lines between the fences, verbatim
        lines: Vec<String>,
    },

    /// Run of `>` lines drawn as a decorated box
    Callout {
        /// Category derived from the text
        kind: CalloutKind,
        /// Leading label, if any
        title: Option<String>,
        /// Body text
        text: String,
    },

    /// Empty or whitespace-only line
    Blank,
}

impl Block {
    /// Short human-readable name of the block kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::ListItem { .. } => "list item",
            Block::Image { .. } => "image",
            Block::Code { .. } => "code block",
            Block::Callout { .. } => "callout",
            Block::Blank => "blank line",
        }
    }

    /// Check if this is a blank line.
    pub fn is_blank(&self) -> bool {
        matches!(self, Block::Blank)
    }
}

/// Visual category of a callout box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutKind {
    /// General information
    #[default]
    Info,
    /// Warnings and cautions
    Warning,
    /// Important notes and key decisions
    Important,
    /// Tips and hints
    Tip,
    /// Examples and code notes
    Code,
}

impl CalloutKind {
    /// All categories.
    pub const ALL: [CalloutKind; 5] = [
        CalloutKind::Info,
        CalloutKind::Warning,
        CalloutKind::Important,
        CalloutKind::Tip,
        CalloutKind::Code,
    ];

    /// Lowercase name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutKind::Info => "info",
            CalloutKind::Warning => "warning",
            CalloutKind::Important => "important",
            CalloutKind::Tip => "tip",
            CalloutKind::Code => "code",
        }
    }
}

impl std::fmt::Display for CalloutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified block plus the number of extra lines it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    /// The block
    pub block: Block,
    /// Lines consumed after the current one
    pub consumed: usize,
}

impl Classified {
    /// A block made from the current line only.
    pub fn single(block: Block) -> Self {
        Self { block, consumed: 0 }
    }
}
