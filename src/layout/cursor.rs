//! Running layout position and page allocation.

use crate::error::{Error, Result};
use crate::model::{DrawOp, Page, PageGeometry};

/// Tolerance for floating point comparisons against page edges.
pub(crate) const EPS: f32 = 0.01;

/// Owns the pages being filled and the current drawing position.
///
/// The cursor is the only place that decides whether content fits. Renderers
/// ask for room, draw at the returned position, then advance.
#[derive(Debug)]
pub struct Cursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    x: f32,
    y: f32,
    max_pages: usize,
}

impl Cursor {
    /// Start a document with one empty page.
    pub fn new(geometry: PageGeometry, max_pages: usize) -> Self {
        Self {
            pages: vec![Page::new(1, &geometry)],
            x: geometry.left(),
            y: geometry.top(),
            geometry,
            max_pages,
        }
    }

    /// Page geometry.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Current horizontal offset.
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Current vertical position (top-down).
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Move the horizontal offset. Kept across page turns.
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Reset the horizontal offset to the left margin.
    pub fn reset_x(&mut self) {
        self.x = self.geometry.left();
    }

    /// 1-based number of the page being filled.
    pub fn page_number(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Space left above the bottom margin.
    pub fn remaining(&self) -> f32 {
        self.geometry.bottom() - self.y
    }

    /// Check if `height` fits above the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom() + EPS
    }

    /// Check if the cursor sits at the top margin.
    pub fn at_page_top(&self) -> bool {
        (self.y - self.geometry.top()).abs() < EPS
    }

    /// Check if nothing has been drawn on the current page.
    pub fn page_is_blank(&self) -> bool {
        self.pages.last().map_or(true, Page::is_empty)
    }

    /// Make sure `height` fits, turning the page when it does not.
    ///
    /// A blank page is never turned. Returns whether a new page was started.
    pub fn ensure_room(&mut self, height: f32) -> Result<bool> {
        if self.fits(height) || self.page_is_blank() {
            return Ok(false);
        }
        self.new_page()?;
        Ok(true)
    }

    /// Move down by `dy`, never past the page edge.
    pub fn advance(&mut self, dy: f32) {
        self.y = (self.y + dy).min(self.geometry.height);
    }

    /// Seal the current page and start a new one at the top margin.
    pub fn new_page(&mut self) -> Result<()> {
        if self.pages.len() >= self.max_pages {
            return Err(Error::PageLimitExceeded(self.max_pages));
        }
        let number = self.pages.len() as u32 + 1;
        log::debug!("Starting page {}", number);
        self.pages.push(Page::new(number, &self.geometry));
        self.y = self.geometry.top();
        Ok(())
    }

    /// Append a draw operation to the current page.
    pub fn draw(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.push(op);
        }
    }

    /// Finish layout and hand over the pages.
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
