//! Output options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Options for PDF serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    /// Document title; defaults to the first level-1 heading
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Application recorded as the document creator
    pub creator: String,

    /// Flate-compress page content and image streams
    pub compress: bool,

    /// Creation timestamp; the current time when unset
    pub creation_date: Option<DateTime<Utc>>,
}

impl PdfOptions {
    /// Create new PDF options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Fix the creation timestamp, for reproducible output.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            creator: "pagemark".to_string(),
            compress: true,
            creation_date: None,
        }
    }
}
