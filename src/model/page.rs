//! Page-level types.

use super::{DrawOp, TextRun};
use serde::{Deserialize, Serialize};

/// Physical page size and margins, in points (1 point = 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Margin applied on all four sides
    pub margin: f32,
}

impl PageGeometry {
    /// Create a geometry with explicit dimensions.
    pub fn new(width: f32, height: f32, margin: f32) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    /// A4 paper (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(595.0, 842.0, 50.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// US Letter paper (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0, 50.0) // 8.5 * 72, 11 * 72
    }

    /// Set the margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// First writable y coordinate.
    pub fn top(&self) -> f32 {
        self.margin
    }

    /// Last writable y coordinate.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }

    /// Left edge of the text column.
    pub fn left(&self) -> f32 {
        self.margin
    }

    /// Right edge of the text column.
    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    /// Width of the text column.
    pub fn content_width(&self) -> f32 {
        self.right() - self.left()
    }

    /// Height between top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.bottom() - self.top()
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// A single laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Draw operations in paint order
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Create an empty page with the given geometry.
    pub fn new(number: u32, geometry: &PageGeometry) -> Self {
        Self {
            number,
            width: geometry.width,
            height: geometry.height,
            ops: Vec::new(),
        }
    }

    /// Append a draw operation.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Check if nothing has been drawn on the page.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over the text runs on the page.
    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(DrawOp::as_text)
    }

    /// Number of placed images.
    pub fn image_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_image()).count()
    }

    /// Text of every run, one run per line.
    pub fn plain_text(&self) -> String {
        self.text_runs()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
