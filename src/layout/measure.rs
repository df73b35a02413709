//! Text measurement.
//!
//! Layout never guesses widths itself: every width goes through a
//! [`TextMeasurer`]. The default [`StandardFontMetrics`] carries the advance
//! widths of the PDF base fonts backing each [`FontFace`], so measured lines
//! match what a viewer draws.

use crate::error::Result;
use crate::model::FontFace;

/// Measures the advance width of text.
pub trait TextMeasurer {
    /// Width in points of `text` set in `face` at `size`.
    fn measure(&self, text: &str, face: FontFace, size: f32) -> Result<f32>;

    /// Width of a single inter-word space.
    fn space_width(&self, face: FontFace, size: f32) -> Result<f32> {
        self.measure(" ", face, size)
    }
}

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015,                                             // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // 'N'..'Z'
    278, 278, 278, 469, 556, 333,                                                   // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // 'n'..'z'
    334, 260, 334, 584,                                                             // '{'..'~'
];

/// Helvetica-Bold advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Courier is monospaced.
const COURIER_WIDTH: u16 = 600;

/// Width used for characters outside the tables.
const FALLBACK_WIDTH: u16 = 556;

/// Metrics of the standard Type1 fonts used by the PDF writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl StandardFontMetrics {
    /// Create the metrics.
    pub fn new() -> Self {
        Self
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, c: char, face: FontFace) -> u16 {
        if face == FontFace::Mono {
            return COURIER_WIDTH;
        }
        let table = if face.is_bold() {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        };
        match c {
            ' '..='~' => table[c as usize - 32],
            '\u{2022}' => 350,               // bullet
            '\u{2013}' => 556,               // en dash
            '\u{2014}' | '\u{2026}' => 1000, // em dash, ellipsis
            '\u{2018}' | '\u{2019}' => {
                if face.is_bold() {
                    278
                } else {
                    222
                }
            }
            '\u{201C}' | '\u{201D}' => {
                if face.is_bold() {
                    500
                } else {
                    333
                }
            }
            '\u{00A0}' => table[0],
            _ => FALLBACK_WIDTH,
        }
    }
}

impl TextMeasurer for StandardFontMetrics {
    fn measure(&self, text: &str, face: FontFace, size: f32) -> Result<f32> {
        let units: u32 = text.chars().map(|c| self.char_width(c, face) as u32).sum();
        Ok(units as f32 * size / 1000.0)
    }
}
