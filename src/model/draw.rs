//! Draw operations and their geometric primitives.
//!
//! Coordinates are in points with the origin at the top-left corner of the
//! page and y growing downwards. The PDF writer flips them on output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Distance from the left page edge
    pub x: f32,
    /// Distance from the top page edge
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom edge (top + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Right edge (left + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Pure white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Create a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels scaled to 0.0..=1.0, as PDF color operators expect.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color '{}'", value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Font faces available to the renderers.
///
/// Each maps onto one of the PDF standard Type1 fonts, so no font data is
/// embedded in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    /// Body text
    Regular,
    /// Headings, emphasized spans, callout titles
    Bold,
    /// Captions
    Italic,
    /// Code blocks
    Mono,
}

impl FontFace {
    /// All faces, in resource-name order.
    pub const ALL: [FontFace; 4] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Italic,
        FontFace::Mono,
    ];

    /// PostScript name of the standard font backing this face.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
            FontFace::Italic => "Helvetica-Oblique",
            FontFace::Mono => "Courier",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
            FontFace::Italic => "F3",
            FontFace::Mono => "F4",
        }
    }

    /// Whether the face renders as bold.
    pub fn is_bold(&self) -> bool {
        matches!(self, FontFace::Bold)
    }
}

/// A single line (or line fragment) of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Top-left corner of the line box
    pub origin: Point,
    /// Text to draw
    pub text: String,
    /// Font face
    pub face: FontFace,
    /// Font size in points
    pub size: f32,
    /// Fill color
    pub color: Color,
    /// Extra space added to every inter-word gap (justified lines)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub word_spacing: f32,
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

impl TextRun {
    /// Create a left-aligned run with no extra word spacing.
    pub fn new(origin: Point, text: impl Into<String>, face: FontFace, size: f32) -> Self {
        Self {
            origin,
            text: text.into(),
            face,
            size,
            color: Color::BLACK,
            word_spacing: 0.0,
        }
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the extra inter-word spacing.
    pub fn with_word_spacing(mut self, spacing: f32) -> Self {
        self.word_spacing = spacing;
        self
    }

    /// Number of inter-word gaps affected by `word_spacing`.
    pub fn gap_count(&self) -> usize {
        self.text.matches(' ').count()
    }
}

/// A filled and/or stroked rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledRect {
    /// Rectangle bounds
    pub rect: Rect,
    /// Fill color, if filled
    pub fill: Option<Color>,
    /// Border color, if stroked
    pub border: Option<Color>,
    /// Border line width in points
    pub border_width: f32,
}

/// A placed raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOp {
    /// Placement on the page
    pub rect: Rect,
    /// Resolved image file
    pub source: std::path::PathBuf,
}

/// A write-only drawing record, consumed at serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawOp {
    /// Text run
    Text(TextRun),
    /// Filled/bordered rectangle
    Rect(FilledRect),
    /// Image placement
    Image(ImageOp),
}

impl DrawOp {
    /// Vertical extent `(top, bottom)` occupied on the page.
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self {
            DrawOp::Text(run) => (run.origin.y, run.origin.y + run.size),
            DrawOp::Rect(r) => (r.rect.y, r.rect.bottom()),
            DrawOp::Image(img) => (img.rect.y, img.rect.bottom()),
        }
    }

    /// The text run, if this is a text operation.
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Check if this operation places an image.
    pub fn is_image(&self) -> bool {
        matches!(self, DrawOp::Image(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Color::from_hex("#1bbcd6").unwrap();
        assert_eq!(color, Color::rgb(0x1b, 0xbc, 0xd6));
        assert_eq!(color.to_string(), "#1bbcd6");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let back: Color = serde_json::from_str("\"#FF0010\"").unwrap();
        assert_eq!(back, Color::rgb(255, 0, 16));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }

    #[test]
    fn test_vertical_extent() {
        let run = TextRun::new(Point::new(50.0, 100.0), "Hello", FontFace::Regular, 11.0);
        assert_eq!(DrawOp::Text(run).vertical_extent(), (100.0, 111.0));

        let rect = DrawOp::Rect(FilledRect {
            rect: Rect::new(10.0, 20.0, 30.0, 40.0),
            fill: Some(Color::WHITE),
            border: None,
            border_width: 0.0,
        });
        assert_eq!(rect.vertical_extent(), (20.0, 60.0));
    }

    #[test]
    fn test_draw_op_tagged_json() {
        let op = DrawOp::Text(TextRun::new(Point::default(), "x", FontFace::Bold, 12.0));
        let json = serde_json::to_string(&op).unwrap();
        assert!(json.contains("\"type\":\"text\""));
        assert!(json.contains("\"face\":\"bold\""));
        assert!(!json.contains("word_spacing"));
    }
}
