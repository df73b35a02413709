//! Layout configuration: geometry, fonts, spacing and box styles.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Color, PageGeometry};
use crate::parser::CalloutKind;

/// Options controlling how blocks are placed on pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Page size and margins
    pub page: PageGeometry,

    /// Font sizes per block kind
    pub fonts: FontSizes,

    /// List indentation
    pub indent: Indents,

    /// Vertical spacing multipliers
    pub spacing: Spacing,

    /// Page break thresholds
    pub pagination: PaginationOptions,

    /// Callout box styling
    pub callouts: CalloutOptions,

    /// Code box styling
    pub code: CodeStyle,

    /// Stretch body lines to the full column width
    pub justify: bool,

    /// Marker drawn for unnumbered list items
    pub list_marker: ListMarker,

    /// Prefix image captions with `Figure N:`
    pub number_figures: bool,

    /// Directory that relative image references are resolved against
    pub image_dir: Option<PathBuf>,

    /// Pixel density assumed when converting image pixels to points
    pub image_dpi: f32,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.page = page;
        self
    }

    /// Set the font sizes.
    pub fn with_fonts(mut self, fonts: FontSizes) -> Self {
        self.fonts = fonts;
        self
    }

    /// Enable or disable justification.
    pub fn with_justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    /// Set the marker used for unnumbered list items.
    pub fn with_list_marker(mut self, marker: ListMarker) -> Self {
        self.list_marker = marker;
        self
    }

    /// Enable or disable figure numbering.
    pub fn with_figure_numbers(mut self, number: bool) -> Self {
        self.number_figures = number;
        self
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set the maximum number of pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.pagination.max_pages = pages;
        self
    }

    /// Line advance of body text.
    pub fn body_line_height(&self) -> f32 {
        self.fonts.body * self.spacing.line_height
    }

    /// Check that the options can produce a usable page.
    pub fn validate(&self) -> Result<()> {
        let page = &self.page;
        if !(page.width > 0.0 && page.height > 0.0) {
            return Err(Error::Config(format!(
                "page size must be positive, got {}x{}",
                page.width, page.height
            )));
        }
        if page.margin < 0.0 {
            return Err(Error::Config("page margin must not be negative".into()));
        }
        if page.content_width() <= 0.0 || page.usable_height() <= 0.0 {
            return Err(Error::Config(format!(
                "margin of {} leaves no room on a {}x{} page",
                page.margin, page.width, page.height
            )));
        }

        for (name, size) in self.fonts.named() {
            if !(size > 0.0) {
                return Err(Error::Config(format!("font size '{}' must be positive", name)));
            }
        }

        if self.spacing.line_height < 1.0 || self.code.line_height < 1.0 {
            return Err(Error::Config("line height multipliers must be at least 1.0".into()));
        }
        let tallest = self.fonts.h1.max(self.fonts.h2).max(self.fonts.body) * self.spacing.line_height;
        if tallest > page.usable_height() {
            return Err(Error::Config(format!(
                "a {:.1}pt line does not fit the {:.1}pt usable page height",
                tallest,
                page.usable_height()
            )));
        }

        let spacing = &self.spacing;
        let multipliers = [
            spacing.heading_before,
            spacing.heading_after,
            spacing.paragraph_after,
            spacing.list_item_after,
            spacing.lead_in_after,
            spacing.block_after,
        ];
        if multipliers.iter().any(|m| *m < 0.0) {
            return Err(Error::Config("spacing multipliers must not be negative".into()));
        }

        let indent = &self.indent;
        if [indent.list, indent.nested, indent.marker_offset, indent.marker_gap]
            .iter()
            .any(|v| *v < 0.0)
        {
            return Err(Error::Config("indents must not be negative".into()));
        }
        if indent.list + indent.marker_offset >= page.content_width() {
            return Err(Error::Config("list indent leaves no room for item text".into()));
        }

        let pagination = &self.pagination;
        if pagination.bottom_safety < 0.0 || pagination.bottom_safety >= page.usable_height() {
            return Err(Error::Config(format!(
                "bottom safety of {} must lie within the usable page height",
                pagination.bottom_safety
            )));
        }
        if pagination.max_pages == 0 {
            return Err(Error::Config("max_pages must be at least 1".into()));
        }

        let padding = self.code.padding.max(self.callouts.padding);
        if padding < 0.0 || 2.0 * padding >= page.content_width().min(page.usable_height()) {
            return Err(Error::Config("box padding leaves no interior".into()));
        }
        if !(self.callouts.shrink_step > 0.0 && self.callouts.shrink_step < 1.0) {
            return Err(Error::Config("callout shrink step must lie between 0 and 1".into()));
        }

        if !(self.image_dpi > 0.0) {
            return Err(Error::Config("image DPI must be positive".into()));
        }

        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            fonts: FontSizes::default(),
            indent: Indents::default(),
            spacing: Spacing::default(),
            pagination: PaginationOptions::default(),
            callouts: CalloutOptions::default(),
            code: CodeStyle::default(),
            justify: true,
            list_marker: ListMarker::default(),
            number_figures: true,
            image_dir: None,
            image_dpi: 96.0,
        }
    }
}

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    /// Level-1 headings
    pub h1: f32,
    /// Level-2 headings
    pub h2: f32,
    /// Body text, lists and level 3+ headings
    pub body: f32,
    /// Code blocks
    pub code: f32,
    /// Image captions
    pub caption: f32,
    /// Callout text
    pub callout: f32,
}

impl FontSizes {
    fn named(&self) -> [(&'static str, f32); 6] {
        [
            ("h1", self.h1),
            ("h2", self.h2),
            ("body", self.body),
            ("code", self.code),
            ("caption", self.caption),
            ("callout", self.callout),
        ]
    }
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            h1: 22.0,
            h2: 17.0,
            body: 11.0,
            code: 9.0,
            caption: 9.0,
            callout: 10.0,
        }
    }
}

/// Horizontal list offsets in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indents {
    /// Offset of top-level markers from the left margin
    pub list: f32,
    /// Extra offset per nesting level
    pub nested: f32,
    /// Minimum distance from marker to item text
    pub marker_offset: f32,
    /// Gap kept after markers wider than `marker_offset`
    pub marker_gap: f32,
}

impl Default for Indents {
    fn default() -> Self {
        Self {
            list: 18.0,
            nested: 18.0,
            marker_offset: 16.0,
            marker_gap: 4.0,
        }
    }
}

/// Vertical spacing.
///
/// `line_height` multiplies a font size; every other value multiplies the
/// body line height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Line advance as a multiple of the font size
    pub line_height: f32,
    /// Space above headings (skipped at the top of a page)
    pub heading_before: f32,
    /// Space below headings
    pub heading_after: f32,
    /// Space below top-level paragraphs
    pub paragraph_after: f32,
    /// Space below list items
    pub list_item_after: f32,
    /// Space below colon-terminated lead-in lines
    pub lead_in_after: f32,
    /// Space below images, code blocks and callouts
    pub block_after: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            line_height: 1.45,
            heading_before: 0.8,
            heading_after: 0.35,
            paragraph_after: 0.6,
            list_item_after: 0.25,
            lead_in_after: 0.2,
            block_after: 0.8,
        }
    }
}

/// Page break thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationOptions {
    /// A block starting within this distance of the bottom margin goes to a new page
    pub bottom_safety: f32,
    /// Body lines that must fit below a heading
    pub keep_with_next_lines: u32,
    /// Upper bound on allocated pages
    pub max_pages: usize,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            bottom_safety: 30.0,
            keep_with_next_lines: 2,
            max_pages: 500,
        }
    }
}

/// Marker for list items without an explicit number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMarker {
    /// `1.`, `2.`, ... per nesting level
    #[default]
    Numbered,
    /// A bullet glyph
    Bullet,
}

/// Colors and label of one callout category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutStyle {
    /// Box background
    pub fill: Color,
    /// Box border and title bar
    pub border: Color,
    /// Short glyph shown before the label
    pub icon: String,
    /// Title used when the callout has none
    pub label: String,
}

impl CalloutStyle {
    fn new(fill: &str, border: &str, icon: &str, label: &str) -> Self {
        Self {
            fill: Color::from_hex(fill).unwrap_or(Color::WHITE),
            border: Color::from_hex(border).unwrap_or(Color::BLACK),
            icon: icon.to_string(),
            label: label.to_string(),
        }
    }
}

/// Per-category callout styles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutPalette {
    /// Plain information
    pub info: CalloutStyle,
    /// Warnings
    pub warning: CalloutStyle,
    /// Important notes
    pub important: CalloutStyle,
    /// Tips
    pub tip: CalloutStyle,
    /// Examples
    pub code: CalloutStyle,
}

impl CalloutPalette {
    /// Style for the given category.
    pub fn get(&self, kind: CalloutKind) -> &CalloutStyle {
        match kind {
            CalloutKind::Info => &self.info,
            CalloutKind::Warning => &self.warning,
            CalloutKind::Important => &self.important,
            CalloutKind::Tip => &self.tip,
            CalloutKind::Code => &self.code,
        }
    }
}

impl Default for CalloutPalette {
    fn default() -> Self {
        Self {
            info: CalloutStyle::new("#E8F4FD", "#2196F3", "i", "Note"),
            warning: CalloutStyle::new("#FFF4E5", "#FF9800", "!", "Warning"),
            important: CalloutStyle::new("#FDECEA", "#F44336", "*", "Important"),
            tip: CalloutStyle::new("#E8F5E9", "#4CAF50", "+", "Tip"),
            code: CalloutStyle::new("#F3E5F5", "#9C27B0", "<>", "Example"),
        }
    }
}

/// Callout box geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalloutOptions {
    /// Inner padding in points
    pub padding: f32,
    /// Border line width
    pub border_width: f32,
    /// Title bar height as a multiple of the callout font size
    pub title_bar: f32,
    /// Re-wrap attempts at a smaller size before giving up
    pub shrink_attempts: u32,
    /// Font size factor applied per attempt
    pub shrink_step: f32,
    /// Colors and labels
    pub palette: CalloutPalette,
}

impl Default for CalloutOptions {
    fn default() -> Self {
        Self {
            padding: 8.0,
            border_width: 1.0,
            title_bar: 1.9,
            shrink_attempts: 4,
            shrink_step: 0.85,
            palette: CalloutPalette::default(),
        }
    }
}

/// Code box styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeStyle {
    /// Box background
    pub fill: Color,
    /// Box border
    pub border: Color,
    /// Inner padding in points
    pub padding: f32,
    /// Border line width
    pub border_width: f32,
    /// Line advance as a multiple of the code font size
    pub line_height: f32,
    /// Columns per tab stop
    pub tab_width: usize,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0xF5, 0xF5, 0xF5),
            border: Color::rgb(0xCC, 0xCC, 0xCC),
            padding: 8.0,
            border_width: 0.8,
            line_height: 1.3,
            tab_width: 4,
        }
    }
}
