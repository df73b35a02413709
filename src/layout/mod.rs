//! Layout engine: turns classified blocks into positioned draw operations on
//! fixed-size pages.

mod assembler;
mod boxes;
mod cursor;
mod figure;
mod images;
mod measure;
mod options;
mod pagination;
mod text;
mod wrap;

pub use assembler::{Assembler, ListCounters};
pub use cursor::Cursor;
pub use images::{FsImageSource, ImageInfo, ImageSource};
pub use measure::{StandardFontMetrics, TextMeasurer};
pub use options::{
    CalloutOptions, CalloutPalette, CalloutStyle, CodeStyle, FontSizes, Indents, LayoutOptions,
    ListMarker, PaginationOptions, Spacing,
};
pub use pagination::PaginationPolicy;
pub use wrap::{justify_spacing, wrap_spans, wrap_words, Fragment};

use crate::model::{LayoutStats, LayoutWarning, WarningKind};

/// Read-only collaborators shared by every renderer.
pub(crate) struct LayoutContext<'a> {
    pub options: &'a LayoutOptions,
    pub measurer: &'a dyn TextMeasurer,
    pub images: &'a dyn ImageSource,
    pub policy: PaginationPolicy,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        options: &'a LayoutOptions,
        measurer: &'a dyn TextMeasurer,
        images: &'a dyn ImageSource,
    ) -> Self {
        Self {
            options,
            measurer,
            images,
            policy: PaginationPolicy::from_options(options),
        }
    }
}

/// Warnings, counts and figure numbering collected while rendering.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    pub warnings: Vec<LayoutWarning>,
    pub stats: LayoutStats,
    pub figures: u32,
}

impl Tally {
    pub fn warn(&mut self, line: usize, kind: WarningKind) {
        let warning = LayoutWarning::new(line, kind);
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
