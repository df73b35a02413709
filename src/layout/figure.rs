//! Image placement with an optional caption.

use super::wrap::wrap_words;
use super::{Cursor, LayoutContext, Tally};
use crate::error::{Error, Result};
use crate::model::{DrawOp, FontFace, ImageOp, Point, Rect, TextRun, WarningKind};

/// Gap between an image and its caption, in caption line heights.
const CAPTION_GAP: f32 = 0.5;

/// Place an image, centered, scaled to the column and to one page.
///
/// A reference that does not resolve is recorded as a warning and leaves the
/// cursor untouched, without turning the page.
pub(crate) fn render_image(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    line: usize,
    path: &str,
    caption: Option<&str>,
) -> Result<()> {
    let Some(info) = ctx.images.probe(path)? else {
        tally.warn(line, WarningKind::MissingImage { path: path.to_string() });
        tally.stats.missing_image_count += 1;
        return Ok(());
    };
    ctx.policy.before_block(cursor)?;

    let options = ctx.options;
    let geometry = *cursor.geometry();
    let column = geometry.content_width();

    tally.figures += 1;
    let caption = caption.map(|text| {
        if options.number_figures {
            format!("Figure {}: {}", tally.figures, text)
        } else {
            text.to_string()
        }
    });

    let caption_size = options.fonts.caption;
    let caption_line = caption_size * options.spacing.line_height;
    let caption_lines = match caption {
        Some(ref text) => wrap_words(ctx.measurer, text, FontFace::Italic, caption_size, column)?,
        None => Vec::new(),
    };
    let caption_height = if caption_lines.is_empty() {
        0.0
    } else {
        caption_line * (CAPTION_GAP + caption_lines.len() as f32)
    };

    let points_per_pixel = 72.0 / options.image_dpi;
    let natural_width = info.width as f32 * points_per_pixel;
    let natural_height = info.height as f32 * points_per_pixel;

    // never upscale; fit the column, then fit the page with the caption
    let mut scale = (column / natural_width).min(1.0);
    let room = geometry.usable_height() - caption_height;
    if room <= 0.0 {
        return Err(Error::Layout(format!(
            "caption of '{}' leaves no room for the image",
            path
        )));
    }
    if natural_height * scale > room {
        scale = room / natural_height;
    }
    let width = natural_width * scale;
    let height = natural_height * scale;

    cursor.ensure_room(height + caption_height)?;
    let top = cursor.y();
    let x = geometry.left() + (column - width) / 2.0;
    cursor.draw(DrawOp::Image(ImageOp {
        rect: Rect::new(x, top, width, height),
        source: info.path.clone(),
    }));
    cursor.advance(height);
    log::debug!(
        "Placed image {} at {:.0}x{:.0}pt on page {}",
        info.path.display(),
        width,
        height,
        cursor.page_number()
    );

    if !caption_lines.is_empty() {
        cursor.advance(caption_line * CAPTION_GAP);
        for text in caption_lines {
            let text_width = ctx.measurer.measure(&text, FontFace::Italic, caption_size)?;
            let x = geometry.left() + (column - text_width).max(0.0) / 2.0;
            cursor.draw(DrawOp::Text(TextRun::new(
                Point::new(x, cursor.y()),
                text,
                FontFace::Italic,
                caption_size,
            )));
            cursor.advance(caption_line);
            tally.stats.line_count += 1;
        }
    }

    cursor.advance(options.spacing.block_after * options.body_line_height());
    tally.stats.image_count += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ImageInfo, ImageSource, LayoutOptions, StandardFontMetrics};
    use crate::model::PageGeometry;
    use std::path::PathBuf;

    /// Resolves every reference to an image of fixed pixel size.
    struct FixedSize(u32, u32);

    impl ImageSource for FixedSize {
        fn probe(&self, reference: &str) -> Result<Option<ImageInfo>> {
            Ok(Some(ImageInfo {
                path: PathBuf::from(reference),
                width: self.0,
                height: self.1,
            }))
        }
    }

    struct Missing;

    impl ImageSource for Missing {
        fn probe(&self, _reference: &str) -> Result<Option<ImageInfo>> {
            Ok(None)
        }
    }

    fn image_rect(cursor: Cursor) -> Rect {
        let pages = cursor.into_pages();
        pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .find_map(|op| match op {
                DrawOp::Image(img) => Some(img.rect),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_small_image_not_upscaled_and_centered() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let source = FixedSize(96, 48);
        let ctx = LayoutContext::new(&options, &metrics, &source);
        let mut cursor = Cursor::new(PageGeometry::a4(), 10);
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 1, "a.png", None).unwrap();

        let rect = image_rect(cursor);
        assert_eq!((rect.width, rect.height), (72.0, 36.0));
        assert!((rect.x - (50.0 + (495.0 - 72.0) / 2.0)).abs() < 1e-3);
        assert_eq!(tally.stats.image_count, 1);
    }

    #[test]
    fn test_wide_image_fits_column() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let source = FixedSize(2000, 1000);
        let ctx = LayoutContext::new(&options, &metrics, &source);
        let mut cursor = Cursor::new(PageGeometry::a4(), 10);
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 1, "wide.png", Some("Wide")).unwrap();

        let rect = image_rect(cursor);
        assert!((rect.width - 495.0).abs() < 1e-3);
        assert!((rect.height - 247.5).abs() < 1e-3);
    }

    #[test]
    fn test_tall_image_fits_page_with_caption() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let source = FixedSize(400, 5000);
        let ctx = LayoutContext::new(&options, &metrics, &source);
        let mut cursor = Cursor::new(PageGeometry::a4(), 10);
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 1, "tall.png", Some("Tall one")).unwrap();

        let pages = cursor.into_pages();
        assert_eq!(pages.len(), 1);
        for op in &pages[0].ops {
            let (top, bottom) = op.vertical_extent();
            assert!(top >= 50.0 && bottom <= 792.0 + 0.01);
        }
        let caption = pages[0].text_runs().next().unwrap();
        assert_eq!(caption.text, "Figure 1: Tall one");
        assert_eq!(caption.face, FontFace::Italic);
    }

    #[test]
    fn test_missing_image_leaves_cursor() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let ctx = LayoutContext::new(&options, &metrics, &Missing);
        let mut cursor = Cursor::new(PageGeometry::a4(), 10);
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 4, "gone.png", Some("Gone")).unwrap();

        assert_eq!(cursor.y(), 50.0);
        assert!(cursor.page_is_blank());
        assert_eq!(tally.warnings.len(), 1);
        assert_eq!(tally.warnings[0].line, 4);
        assert_eq!(tally.stats.missing_image_count, 1);
        assert_eq!(tally.figures, 0);
    }

    fn cursor_in_safety_zone() -> Cursor {
        let mut cursor = Cursor::new(PageGeometry::a4(), 10);
        cursor.draw(DrawOp::Text(TextRun::new(
            Point::new(50.0, 50.0),
            "filler",
            FontFace::Regular,
            11.0,
        )));
        cursor.advance(780.0 - cursor.y());
        cursor
    }

    #[test]
    fn test_missing_image_in_safety_zone_keeps_page() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let ctx = LayoutContext::new(&options, &metrics, &Missing);
        let mut cursor = cursor_in_safety_zone();
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 9, "gone.png", None).unwrap();

        assert_eq!(cursor.page_number(), 1);
        assert_eq!(cursor.y(), 780.0);
        assert_eq!(cursor.into_pages().len(), 1);
    }

    #[test]
    fn test_resolved_image_in_safety_zone_turns_page() {
        let options = LayoutOptions::default();
        let metrics = StandardFontMetrics::new();
        let source = FixedSize(10, 10);
        let ctx = LayoutContext::new(&options, &metrics, &source);
        let mut cursor = cursor_in_safety_zone();
        let mut tally = Tally::default();

        render_image(&ctx, &mut cursor, &mut tally, 9, "dot.png", None).unwrap();

        let pages = cursor.into_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].image_count(), 1);
    }
}
