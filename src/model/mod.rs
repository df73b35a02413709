//! Document model for laid-out, paginated output.
//!
//! The model is the hand-off point between layout and serialization: the
//! assembler produces a [`Document`] of [`Page`]s holding [`DrawOp`]s, and the
//! PDF and JSON writers consume it without re-running layout.

mod document;
mod draw;
mod page;

pub use document::{Document, LayoutStats, LayoutWarning, Metadata, WarningKind};
pub use draw::{Color, DrawOp, FilledRect, FontFace, ImageOp, Point, Rect, TextRun};
pub use page::{Page, PageGeometry};
