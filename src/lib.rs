//! # pagemark
//!
//! Paginated PDF rendering for a practical Markdown subset.
//!
//! This library lays out plain text annotated with a lightweight markup
//! (headings, lists, bold spans, images, blockquote callouts, fenced code)
//! onto fixed-size pages and writes the result as a PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagemark::{render, LayoutOptions};
//!
//! fn main() -> pagemark::Result<()> {
//!     let input = "# Report\n\nThe quarterly numbers are in.";
//!     let report = render(input, "report.pdf", &LayoutOptions::default())?;
//!     println!("{} pages", report.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Automatic pagination**: keep-with-next headings, atomic boxes, split paragraphs
//! - **Justified body text** measured with the PDF base font metrics
//! - **Images** scaled to the column with numbered captions
//! - **Callout boxes** colored by category (warning, tip, important, ...)
//! - **Input preparation**: fence unwrapping and diagram insertion for generated text
//! - **Inspectable layout**: every page and draw operation serializes to JSON

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use layout::{
    FsImageSource, ImageInfo, ImageSource, LayoutOptions, ListMarker, StandardFontMetrics,
    TextMeasurer,
};
pub use model::{
    Color, Document, DrawOp, FontFace, LayoutStats, LayoutWarning, Metadata, Page, PageGeometry,
    TextRun, WarningKind,
};
pub use parser::{Block, CalloutKind, CleanupOptions, DiagramInsert, ParseOptions};
pub use render::{JsonFormat, PdfOptions, RenderReport};

use std::path::{Path, PathBuf};

use layout::Assembler;

/// Lay out markup into pages using the standard font metrics.
///
/// Image references resolve against the working directory and
/// `options.image_dir`.
///
/// # Example
///
/// ```
/// use pagemark::{layout, LayoutOptions};
///
/// let doc = layout("# Title\n\nBody paragraph text.", &LayoutOptions::default()).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub fn layout(input: &str, options: &LayoutOptions) -> Result<Document> {
    let images = image_source(options.image_dir.as_deref());
    layout_with(
        input,
        &ParseOptions::default(),
        options,
        &StandardFontMetrics::new(),
        &images,
    )
}

/// Lay out markup with explicit parse options, text measurement and image lookup.
pub fn layout_with(
    input: &str,
    parse: &ParseOptions,
    options: &LayoutOptions,
    measurer: &dyn TextMeasurer,
    images: &dyn ImageSource,
) -> Result<Document> {
    Assembler::new(parse, options, measurer, images)?.run(input)
}

/// Lay out markup and write it as a PDF file.
///
/// # Example
///
/// ```no_run
/// use pagemark::{render, LayoutOptions};
///
/// let report = render("# Notes", "notes.pdf", &LayoutOptions::default()).unwrap();
/// for warning in &report.warnings {
///     eprintln!("{}", warning);
/// }
/// ```
pub fn render<P: AsRef<Path>>(
    input: &str,
    output: P,
    options: &LayoutOptions,
) -> Result<RenderReport> {
    Pagemark::new()
        .with_layout_options(options.clone())
        .layout(input)?
        .save(output)
}

/// Render a markup file to a PDF file.
///
/// Relative image references resolve against the input file's directory
/// unless `options.image_dir` is set.
pub fn render_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &LayoutOptions,
) -> Result<RenderReport> {
    Pagemark::new()
        .with_layout_options(options.clone())
        .layout_file(input)?
        .save(output)
}

fn image_source(dir: Option<&Path>) -> FsImageSource {
    match dir {
        Some(dir) => FsImageSource::with_base_dir(dir),
        None => FsImageSource::new(),
    }
}

/// Builder for laying out and writing documents.
///
/// # Example
///
/// ```no_run
/// use pagemark::{Pagemark, PageGeometry};
///
/// let report = Pagemark::new()
///     .with_page(PageGeometry::letter())
///     .with_justify(false)
///     .with_title("Design Notes")
///     .layout_file("notes.md")?
///     .save("notes.pdf")?;
/// # Ok::<(), pagemark::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pagemark {
    parse_options: ParseOptions,
    layout_options: LayoutOptions,
    pdf_options: PdfOptions,
}

impl Pagemark {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a loaded configuration.
    pub fn from_config(config: RenderConfig) -> Self {
        Self {
            parse_options: config.parse,
            layout_options: config.layout,
            pdf_options: config.pdf,
        }
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the layout options.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    /// Replace the PDF options.
    pub fn with_pdf_options(mut self, options: PdfOptions) -> Self {
        self.pdf_options = options;
        self
    }

    /// Set the page geometry.
    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.layout_options.page = page;
        self
    }

    /// Set the directory images are resolved against.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.layout_options.image_dir = Some(dir.into());
        self
    }

    /// Enable or disable justified body text.
    pub fn with_justify(mut self, justify: bool) -> Self {
        self.layout_options.justify = justify;
        self
    }

    /// Set the marker for unnumbered list items.
    pub fn with_list_marker(mut self, marker: ListMarker) -> Self {
        self.layout_options.list_marker = marker;
        self
    }

    /// Set the maximum number of pages.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.layout_options.pagination.max_pages = pages;
        self
    }

    /// Insert a diagram image at the placeholder line.
    pub fn with_diagram(mut self, image: impl Into<PathBuf>) -> Self {
        let cleanup = self.parse_options.cleanup.clone();
        self.parse_options.cleanup = cleanup.with_diagram(DiagramInsert::new(image));
        self
    }

    /// Set the PDF title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.pdf_options.title = Some(title.into());
        self
    }

    /// Skip input preparation.
    pub fn raw(mut self) -> Self {
        self.parse_options = self.parse_options.raw();
        self
    }

    /// Lay out markup text.
    pub fn layout(self, input: &str) -> Result<Rendered> {
        let images = image_source(self.layout_options.image_dir.as_deref());
        self.layout_with(input, &StandardFontMetrics::new(), &images)
    }

    /// Read and lay out a markup file.
    pub fn layout_file<P: AsRef<Path>>(mut self, path: P) -> Result<Rendered> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        if self.layout_options.image_dir.is_none() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.layout_options.image_dir = Some(parent.to_path_buf());
            }
        }
        log::debug!("Laying out {}", path.display());
        self.layout(&input)
    }

    /// Lay out markup with a custom measurer and image source.
    pub fn layout_with(
        self,
        input: &str,
        measurer: &dyn TextMeasurer,
        images: &dyn ImageSource,
    ) -> Result<Rendered> {
        let document = layout_with(
            input,
            &self.parse_options,
            &self.layout_options,
            measurer,
            images,
        )?;
        Ok(Rendered {
            document,
            pdf_options: self.pdf_options,
        })
    }
}

/// A laid-out document ready to be written.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The laid-out document
    pub document: Document,
    /// PDF options to use
    pdf_options: PdfOptions,
}

impl Rendered {
    /// Serialize to PDF bytes.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render::to_pdf(&self.document, &self.pdf_options)
    }

    /// Write the PDF to `path` and report what was written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<RenderReport> {
        let path = path.as_ref();
        let bytes_written = render::write_pdf(&self.document, path, &self.pdf_options)?;
        Ok(RenderReport::new(&self.document, path, bytes_written))
    }

    /// Convert the layout to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Warnings recorded during layout.
    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.document.warnings
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagemark_builder() {
        let builder = Pagemark::new()
            .with_page(PageGeometry::letter())
            .with_justify(false)
            .with_list_marker(ListMarker::Bullet)
            .with_max_pages(3)
            .with_title("Doc");

        assert_eq!(builder.layout_options.page, PageGeometry::letter());
        assert!(!builder.layout_options.justify);
        assert_eq!(builder.layout_options.list_marker, ListMarker::Bullet);
        assert_eq!(builder.layout_options.pagination.max_pages, 3);
        assert_eq!(builder.pdf_options.title.as_deref(), Some("Doc"));
    }

    #[test]
    fn test_pagemark_builder_default() {
        let builder = Pagemark::default();
        assert!(builder.layout_options.justify);
        assert!(builder.parse_options.cleanup.strip_wrapping_fence);
    }

    #[test]
    fn test_with_diagram_sets_cleanup() {
        let builder = Pagemark::new().with_diagram("flow.png");
        let diagram = builder.parse_options.cleanup.diagram.unwrap();
        assert_eq!(diagram.image_path, PathBuf::from("flow.png"));
    }

    #[test]
    fn test_raw_disables_cleanup() {
        let builder = Pagemark::new().raw();
        assert_eq!(builder.parse_options.cleanup, CleanupOptions::disabled());
    }

    #[test]
    fn test_from_config() {
        let mut config = RenderConfig::default();
        config.layout.justify = false;
        config.pdf.author = Some("Team".into());
        let builder = Pagemark::from_config(config);
        assert!(!builder.layout_options.justify);
        assert_eq!(builder.pdf_options.author.as_deref(), Some("Team"));
    }

    #[test]
    fn test_layout_empty_input() {
        let doc = layout("", &LayoutOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].is_empty());

        let doc = layout("  \n\t\n", &LayoutOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].is_empty());
    }

    #[test]
    fn test_layout_invalid_options() {
        let options = LayoutOptions::default().with_page(PageGeometry::new(100.0, 100.0, 60.0));
        assert!(matches!(layout("text", &options), Err(Error::Config(_))));
    }

    #[test]
    fn test_rendered_json_and_pdf() {
        let rendered = Pagemark::new().layout("# Hi\n\nThere.").unwrap();
        assert!(rendered.warnings().is_empty());
        let json = rendered.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"text\":\"Hi\""));
        let pdf = rendered.to_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_layout_file_missing() {
        let result = Pagemark::new().layout_file("does/not/exist.md");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
