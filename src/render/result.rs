//! Summary of a finished render.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{Document, LayoutStats, LayoutWarning};

/// Outcome of rendering a document to a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderReport {
    /// File the PDF was written to
    pub output: PathBuf,

    /// Number of pages written
    pub page_count: u32,

    /// Size of the written file
    pub bytes_written: u64,

    /// Block counts from layout
    pub stats: LayoutStats,

    /// Non-fatal problems met during layout
    pub warnings: Vec<LayoutWarning>,
}

impl RenderReport {
    /// Build a report for a document written to `output`.
    pub fn new(document: &Document, output: impl Into<PathBuf>, bytes_written: u64) -> Self {
        Self {
            output: output.into(),
            page_count: document.page_count(),
            bytes_written,
            stats: document.stats.clone(),
            warnings: document.warnings.clone(),
        }
    }

    /// Check if layout finished without warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
