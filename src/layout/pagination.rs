//! Page break policy.

use super::{Cursor, LayoutOptions};
use crate::error::Result;

/// Decides where page breaks go before and around blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationPolicy {
    /// Distance above the bottom margin below which no block starts
    pub bottom_safety: f32,
    /// Body lines kept on the same page as a heading
    pub keep_with_next_lines: u32,
}

impl PaginationPolicy {
    /// Policy configured from layout options.
    pub fn from_options(options: &LayoutOptions) -> Self {
        Self {
            bottom_safety: options.pagination.bottom_safety,
            keep_with_next_lines: options.pagination.keep_with_next_lines,
        }
    }

    /// Start a new page if the cursor is already in the bottom safety zone.
    ///
    /// Returns whether a page was turned.
    pub fn before_block(&self, cursor: &mut Cursor) -> Result<bool> {
        let limit = cursor.geometry().bottom() - self.bottom_safety;
        if cursor.page_is_blank() || cursor.y() <= limit {
            return Ok(false);
        }
        cursor.new_page()?;
        Ok(true)
    }

    /// Height a heading needs free: itself plus the keep-with-next lines.
    pub fn heading_reserve(&self, heading_height: f32, body_line_height: f32) -> f32 {
        heading_height + self.keep_with_next_lines as f32 * body_line_height
    }

    /// Scale that makes an atomic block of `height` fit `available`.
    ///
    /// `None` when it already fits.
    pub fn condense(height: f32, available: f32) -> Option<f32> {
        if height <= available {
            None
        } else {
            Some(available / height)
        }
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self::from_options(&LayoutOptions::default())
    }
}
