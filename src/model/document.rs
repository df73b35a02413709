//! Document-level types.

use super::{Page, PageGeometry};
use serde::{Deserialize, Serialize};

/// A laid-out, paginated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata (title, page count)
    pub metadata: Metadata,

    /// Geometry every page was laid out with
    pub geometry: PageGeometry,

    /// Pages in output order
    pub pages: Vec<Page>,

    /// Non-fatal problems met during layout
    pub warnings: Vec<LayoutWarning>,

    /// Block counts collected during layout
    pub stats: LayoutStats,
}

impl Document {
    /// Create a new empty document.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            metadata: Metadata::default(),
            geometry,
            pages: Vec::new(),
            warnings: Vec::new(),
            stats: LayoutStats::default(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title (first level-1 heading)
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Total number of pages
    pub page_count: u32,
}

/// A recoverable problem found while laying out the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutWarning {
    /// 1-based input line of the block
    pub line: usize,

    /// What went wrong
    pub kind: WarningKind,
}

impl LayoutWarning {
    /// Create a warning for the given line.
    pub fn new(line: usize, kind: WarningKind) -> Self {
        Self { line, kind }
    }
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            WarningKind::MissingImage { path } => {
                write!(f, "line {}: image '{}' not found or unreadable", self.line, path)
            }
            WarningKind::Condensed { block, scale } => write!(
                f,
                "line {}: {} taller than a page, condensed to {:.0}%",
                self.line,
                block,
                scale * 100.0
            ),
        }
    }
}

/// Kinds of layout warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WarningKind {
    /// Image reference could not be resolved; the image was skipped
    MissingImage {
        /// Reference as written in the input
        path: String,
    },
    /// An atomic block was scaled down to fit a single page
    Condensed {
        /// Block kind ("code block", "image", "callout")
        block: String,
        /// Applied scale factor
        scale: f32,
    },
}

/// Counts collected while laying out a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Total number of pages produced
    pub page_count: u32,

    /// Number of headings drawn
    pub heading_count: u32,

    /// Number of paragraphs drawn
    pub paragraph_count: u32,

    /// Number of list items drawn
    pub list_item_count: u32,

    /// Number of images placed
    pub image_count: u32,

    /// Number of image references that could not be resolved
    pub missing_image_count: u32,

    /// Number of fenced code blocks drawn
    pub code_block_count: u32,

    /// Number of callout boxes drawn
    pub callout_count: u32,

    /// Number of visual text lines drawn
    pub line_count: u32,
}

impl LayoutStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of blocks that produced output.
    pub fn block_count(&self) -> u32 {
        self.heading_count
            + self.paragraph_count
            + self.list_item_count
            + self.image_count
            + self.code_block_count
            + self.callout_count
    }
}
