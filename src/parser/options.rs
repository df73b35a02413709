//! Parsing options and configuration.

use serde::{Deserialize, Serialize};

use super::CleanupOptions;

/// Options controlling how markup lines are classified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Spaces per list nesting level
    pub indent_unit: usize,

    /// Spaces a tab counts for when measuring indentation
    pub tab_width: usize,

    /// Deepest list nesting level (0-based); deeper items are clamped
    pub max_list_depth: usize,

    /// Minimum length of a colon-terminated paragraph to count as a lead-in
    pub lead_in_min_chars: usize,

    /// Input preparation applied before classification
    pub cleanup: CleanupOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per nesting level.
    pub fn with_indent_unit(mut self, spaces: usize) -> Self {
        self.indent_unit = spaces.max(1);
        self
    }

    /// Set the tab width used when measuring indentation.
    pub fn with_tab_width(mut self, spaces: usize) -> Self {
        self.tab_width = spaces;
        self
    }

    /// Set the deepest list nesting level.
    pub fn with_max_list_depth(mut self, depth: usize) -> Self {
        self.max_list_depth = depth;
        self
    }

    /// Set the minimum lead-in length.
    pub fn with_lead_in_min_chars(mut self, chars: usize) -> Self {
        self.lead_in_min_chars = chars;
        self
    }

    /// Set input preparation options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Skip input preparation entirely.
    pub fn raw(mut self) -> Self {
        self.cleanup = CleanupOptions::disabled();
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            tab_width: 4,
            max_list_depth: 4,
            lead_in_min_chars: 10,
            cleanup: CleanupOptions::default(),
        }
    }
}
