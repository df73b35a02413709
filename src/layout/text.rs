//! Text block renderers: headings, paragraphs and list items.

use super::wrap::{justify_spacing, wrap_spans, wrap_words};
use super::{Cursor, LayoutContext, Tally};
use crate::error::{Error, Result};
use crate::model::{DrawOp, FontFace, Point, TextRun};
use crate::parser::{has_emphasis, parse_spans, spans_text};

/// Draw a heading, keeping it on the same page as the lines that follow.
pub(crate) fn render_heading(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    level: u8,
    text: &str,
) -> Result<()> {
    let options = ctx.options;
    let size = match level {
        1 => options.fonts.h1,
        2 => options.fonts.h2,
        _ => options.fonts.body,
    };
    let face = FontFace::Bold;
    let line_height = size * options.spacing.line_height;
    let body_line = options.body_line_height();
    let left = cursor.geometry().left();
    let width = cursor.geometry().content_width();

    let lines = wrap_words(ctx.measurer, text, face, size, width)?;
    if lines.is_empty() {
        return Ok(());
    }

    let before = options.spacing.heading_before * body_line;
    let after = options.spacing.heading_after * body_line;
    let own = lines.len() as f32 * line_height + after;
    let reserve = ctx.policy.heading_reserve(own, body_line);

    if cursor.at_page_top() {
        cursor.ensure_room(reserve)?;
    } else if !cursor.ensure_room(before + reserve)? {
        cursor.advance(before);
    }

    for line in lines {
        cursor.ensure_room(line_height)?;
        cursor.draw(DrawOp::Text(TextRun::new(
            Point::new(left, cursor.y()),
            line,
            face,
            size,
        )));
        cursor.advance(line_height);
        tally.stats.line_count += 1;
    }
    cursor.advance(after);

    tally.stats.heading_count += 1;
    Ok(())
}

/// Whether `text` draws anything once markup is removed.
pub(crate) fn has_visible_text(text: &str) -> bool {
    !spans_text(&parse_spans(text)).trim().is_empty()
}

/// Draw body text starting at `x`, splitting across pages line by line.
///
/// Returns the number of visual lines drawn.
pub(crate) fn render_paragraph(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    text: &str,
    x: f32,
) -> Result<usize> {
    let options = ctx.options;
    let size = options.fonts.body;
    let line_height = options.body_line_height();
    let width = cursor.geometry().right() - x;
    if width < size {
        return Err(Error::Layout(format!(
            "text column starting at {:.1}pt is too narrow",
            x
        )));
    }

    let spans = parse_spans(text);
    if spans.is_empty() {
        return Ok(0);
    }

    if !has_emphasis(&spans) {
        let face = FontFace::Regular;
        let lines = wrap_words(ctx.measurer, &spans_text(&spans), face, size, width)?;
        let count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            let spacing = if options.justify && i + 1 < count {
                justify_spacing(ctx.measurer, &line, face, size, width)?
            } else {
                0.0
            };
            cursor.ensure_room(line_height)?;
            let run = TextRun::new(Point::new(x, cursor.y()), line, face, size)
                .with_word_spacing(spacing);
            cursor.draw(DrawOp::Text(run));
            cursor.advance(line_height);
        }
        tally.stats.line_count += count as u32;
        return Ok(count);
    }

    let lines = wrap_spans(ctx.measurer, &spans, size, width)?;
    let count = lines.len();
    for fragments in lines {
        cursor.ensure_room(line_height)?;
        let y = cursor.y();
        for fragment in fragments {
            cursor.draw(DrawOp::Text(TextRun::new(
                Point::new(x + fragment.offset, y),
                fragment.text,
                fragment.face,
                size,
            )));
        }
        cursor.advance(line_height);
    }
    tally.stats.line_count += count as u32;
    Ok(count)
}

/// Draw a list item: marker at the item indent, text hanging after it.
pub(crate) fn render_list_item(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    level: usize,
    marker: &str,
    text: &str,
) -> Result<()> {
    let options = ctx.options;
    let size = options.fonts.body;
    let line_height = options.body_line_height();
    let indent = &options.indent;

    let x = cursor.geometry().left() + indent.list + level as f32 * indent.nested;
    let marker_width = ctx.measurer.measure(marker, FontFace::Regular, size)?;
    let text_x = x + indent.marker_offset.max(marker_width + indent.marker_gap);

    // marker and first line must land on the same page
    cursor.ensure_room(line_height)?;
    cursor.draw(DrawOp::Text(TextRun::new(
        Point::new(x, cursor.y()),
        marker,
        FontFace::Regular,
        size,
    )));

    cursor.set_x(text_x);
    let drawn = render_paragraph(ctx, cursor, tally, text, text_x)?;
    if drawn == 0 {
        cursor.advance(line_height);
        tally.stats.line_count += 1;
    }
    cursor.reset_x();
    cursor.advance(options.spacing.list_item_after * options.body_line_height());

    tally.stats.list_item_count += 1;
    Ok(())
}
