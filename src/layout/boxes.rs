//! Boxed blocks: fenced code and callouts.
//!
//! Both are atomic. They either fit on the current page or move whole to the
//! next one, and a box taller than a page is shrunk until it fits.

use super::wrap::wrap_words;
use super::{Cursor, LayoutContext, PaginationPolicy, Tally};
use crate::error::{Error, Result};
use crate::model::{Color, DrawOp, FilledRect, FontFace, Point, Rect, TextRun, WarningKind};
use crate::parser::{parse_spans, spans_text, CalloutKind};

/// Draw a code block inside a filled, bordered box.
///
/// Lines are drawn verbatim in the monospaced face with no wrapping.
pub(crate) fn render_code(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    line: usize,
    lines: &[String],
) -> Result<()> {
    let options = ctx.options;
    let style = &options.code;
    let geometry = *cursor.geometry();

    let lines: Vec<String> = lines.iter().map(|l| expand_tabs(l, style.tab_width)).collect();
    let rows = lines.len().max(1) as f32;

    let mut size = options.fonts.code;
    let mut line_height = size * style.line_height;
    let natural = rows * line_height + 2.0 * style.padding;

    if let Some(scale) = PaginationPolicy::condense(natural, geometry.usable_height()) {
        let text_room = geometry.usable_height() - 2.0 * style.padding;
        let scale_text = text_room / (rows * line_height);
        size *= scale_text;
        line_height *= scale_text;
        tally.warn(
            line,
            WarningKind::Condensed {
                block: "code block".into(),
                scale,
            },
        );
    }
    let height = rows * line_height + 2.0 * style.padding;

    cursor.ensure_room(height)?;
    let top = cursor.y();
    cursor.draw(DrawOp::Rect(FilledRect {
        rect: Rect::new(geometry.left(), top, geometry.content_width(), height),
        fill: Some(style.fill),
        border: Some(style.border),
        border_width: style.border_width,
    }));

    let x = geometry.left() + style.padding;
    for (i, text) in lines.into_iter().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let y = top + style.padding + i as f32 * line_height;
        cursor.draw(DrawOp::Text(TextRun::new(Point::new(x, y), text, FontFace::Mono, size)));
    }

    cursor.advance(height);
    cursor.advance(options.spacing.block_after * options.body_line_height());
    tally.stats.line_count += rows as u32;
    tally.stats.code_block_count += 1;
    Ok(())
}

/// Draw a callout: bordered box, colored title bar, wrapped body.
pub(crate) fn render_callout(
    ctx: &LayoutContext<'_>,
    cursor: &mut Cursor,
    tally: &mut Tally,
    line: usize,
    kind: CalloutKind,
    title: Option<&str>,
    text: &str,
) -> Result<()> {
    let options = ctx.options;
    let callouts = &options.callouts;
    let style = callouts.palette.get(kind);
    let geometry = *cursor.geometry();
    let usable = geometry.usable_height();

    let padding = callouts.padding;
    let title_size = options.fonts.callout;
    let title_height = title_size * callouts.title_bar;
    let interior = geometry.content_width() - 2.0 * padding;
    let body = spans_text(&parse_spans(text));

    let mut size = title_size;
    let mut attempt = 0;
    let (lines, line_height) = loop {
        let line_height = size * options.spacing.line_height;
        let lines = wrap_words(ctx.measurer, &body, FontFace::Regular, size, interior)?;
        let height = box_height(title_height, padding, lines.len(), line_height);
        if height <= usable {
            break (lines, line_height);
        }
        if attempt >= callouts.shrink_attempts {
            return Err(Error::Layout(format!(
                "{} callout needs {:.0}pt but a page holds {:.0}pt",
                kind, height, usable
            )));
        }
        attempt += 1;
        size *= callouts.shrink_step;
        log::debug!("Re-wrapping {} callout at {:.1}pt", kind, size);
    };
    if attempt > 0 {
        tally.warn(
            line,
            WarningKind::Condensed {
                block: "callout".into(),
                scale: size / title_size,
            },
        );
    }

    let height = box_height(title_height, padding, lines.len(), line_height);
    cursor.ensure_room(height)?;
    let top = cursor.y();
    let left = geometry.left();
    let width = geometry.content_width();

    cursor.draw(DrawOp::Rect(FilledRect {
        rect: Rect::new(left, top, width, height),
        fill: Some(style.fill),
        border: Some(style.border),
        border_width: callouts.border_width,
    }));
    cursor.draw(DrawOp::Rect(FilledRect {
        rect: Rect::new(left, top, width, title_height),
        fill: Some(style.border),
        border: None,
        border_width: 0.0,
    }));

    let label = format!("{} {}", style.icon, title.unwrap_or(&style.label));
    cursor.draw(DrawOp::Text(
        TextRun::new(
            Point::new(left + padding, top + (title_height - title_size) / 2.0),
            label.trim(),
            FontFace::Bold,
            title_size,
        )
        .with_color(Color::WHITE),
    ));

    let body_top = top + title_height + padding;
    let count = lines.len();
    for (i, text) in lines.into_iter().enumerate() {
        cursor.draw(DrawOp::Text(TextRun::new(
            Point::new(left + padding, body_top + i as f32 * line_height),
            text,
            FontFace::Regular,
            size,
        )));
    }

    cursor.advance(height);
    cursor.advance(options.spacing.block_after * options.body_line_height());
    tally.stats.line_count += count as u32 + 1;
    tally.stats.callout_count += 1;
    Ok(())
}

fn box_height(title_height: f32, padding: f32, lines: usize, line_height: f32) -> f32 {
    title_height + 2.0 * padding + lines as f32 * line_height
}

/// Replace tabs with spaces up to the next tab stop.
fn expand_tabs(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let fill = tab_width - column % tab_width;
            out.extend(std::iter::repeat(' ').take(fill));
            column += fill;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}
