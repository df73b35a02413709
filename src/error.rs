//! Error types for the pagemark library.

use std::io;
use thiserror::Error;

/// Result type alias for pagemark operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while laying out or writing a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout configuration cannot produce a usable page.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The text measurement capability failed.
    #[error("Text measurement failed: {0}")]
    Measure(String),

    /// The image source failed while probing an image.
    #[error("Image source error for '{path}': {reason}")]
    ImageSource {
        /// Image reference as written in the input
        path: String,
        /// Failure description
        reason: String,
    },

    /// A block could not be placed on any page.
    #[error("Layout error: {0}")]
    Layout(String),

    /// The document needed more pages than allowed.
    #[error("Page limit of {0} pages exceeded")]
    PageLimitExceeded(usize),

    /// A block failed to render; carries the 1-based input line.
    #[error("Render failed at line {line}: {source}")]
    RenderFailed {
        /// 1-based line number of the failing block
        line: usize,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Error building the PDF object graph.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error during serialization (PDF, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Attach the input line number to an error raised while rendering a block.
    ///
    /// Errors that already carry a line number are returned unchanged.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Error::RenderFailed { .. } => self,
            other => Error::RenderFailed {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Line number of the failing block, if known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::RenderFailed { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Pdf(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            _ => Error::Render(format!("image decoding failed: {}", err)),
        }
    }
}
