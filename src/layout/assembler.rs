//! Document assembly: walks classified lines and drives the renderers.

use std::collections::BTreeMap;

use super::boxes::{render_callout, render_code};
use super::figure::render_image;
use super::text::{has_visible_text, render_heading, render_list_item, render_paragraph};
use super::{Cursor, ImageSource, LayoutContext, LayoutOptions, ListMarker, Tally, TextMeasurer};
use crate::error::Result;
use crate::model::Document;
use crate::parser::{Block, CleanupPipeline, LineClassifier, ParseOptions};

/// Bullet glyph for unnumbered items when numbering is off.
const BULLET: &str = "\u{2022}";

/// Where the assembler is in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting the start of a block
    Ready,
    /// Passing over the body of a code block already drawn
    InCodeBlock(usize),
    /// Passing over the continuation lines of a callout already drawn
    InCallout(usize),
    /// Passing over other consumed lines (image captions)
    Skipping(usize),
}

impl State {
    /// State after a block that consumed `consumed` extra lines.
    fn after(block: &Block, consumed: usize) -> Self {
        match (block, consumed) {
            (_, 0) => State::Ready,
            (Block::Code { .. }, n) => State::InCodeBlock(n),
            (Block::Callout { .. }, n) => State::InCallout(n),
            (_, n) => State::Skipping(n),
        }
    }

    /// Consume one line; returns false when the line starts a new block.
    fn skip(&mut self) -> bool {
        let remaining = match self {
            State::Ready => return false,
            State::InCodeBlock(n) | State::InCallout(n) | State::Skipping(n) => n,
        };
        *remaining -= 1;
        if *remaining == 0 {
            *self = State::Ready;
        }
        true
    }
}

/// Running ordinals of unnumbered list items, per nesting level.
#[derive(Debug, Default)]
pub struct ListCounters {
    next: BTreeMap<usize, u32>,
}

impl ListCounters {
    /// Take the ordinal for an item at `level` and drop deeper levels.
    pub fn take(&mut self, level: usize) -> u32 {
        self.truncate_below(level);
        let counter = self.next.entry(level).or_insert(1);
        let ordinal = *counter;
        *counter += 1;
        ordinal
    }

    /// Forget the counters of levels deeper than `level`.
    pub fn truncate_below(&mut self, level: usize) {
        self.next.retain(|&l, _| l <= level);
    }

    /// Restart all numbering.
    pub fn clear(&mut self) {
        self.next.clear();
    }
}

/// Lays out a whole input onto pages.
pub struct Assembler<'a> {
    ctx: LayoutContext<'a>,
    parse: &'a ParseOptions,
    cursor: Cursor,
    counters: ListCounters,
    tally: Tally,
    title: Option<String>,
    state: State,
}

impl<'a> Assembler<'a> {
    /// Create an assembler; fails if the options cannot produce a page.
    pub fn new(
        parse: &'a ParseOptions,
        options: &'a LayoutOptions,
        measurer: &'a dyn TextMeasurer,
        images: &'a dyn ImageSource,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            ctx: LayoutContext::new(options, measurer, images),
            parse,
            cursor: Cursor::new(options.page, options.pagination.max_pages),
            counters: ListCounters::default(),
            tally: Tally::default(),
            title: None,
            state: State::Ready,
        })
    }

    /// Lay out `input` and return the finished document.
    pub fn run(mut self, input: &str) -> Result<Document> {
        let prepared = CleanupPipeline::new(self.parse.cleanup.clone()).process(input);
        let lines = prepared.lines();
        let classifier = LineClassifier::new(self.parse);

        for index in 0..lines.len() {
            if self.state.skip() {
                continue;
            }
            let classified = classifier.classify(&lines[index..]);
            let line = prepared.source_line(index);
            self.place(&classified.block, line)
                .map_err(|e| e.at_line(line))?;
            self.state = State::after(&classified.block, classified.consumed);
        }

        Ok(self.finish())
    }

    /// Dispatch one block to its renderer.
    fn place(&mut self, block: &Block, line: usize) -> Result<()> {
        let ctx = &self.ctx;
        let options = ctx.options;
        let cursor = &mut self.cursor;
        let tally = &mut self.tally;

        match block {
            Block::Blank => {
                self.counters.clear();
            }
            Block::Heading { level, text } => {
                self.counters.clear();
                ctx.policy.before_block(cursor)?;
                render_heading(ctx, cursor, tally, *level, text)?;
                if *level == 1 && self.title.is_none() {
                    self.title = Some(text.clone());
                }
            }
            Block::Paragraph { text, lead_in } => {
                if !has_visible_text(text) {
                    return Ok(());
                }
                ctx.policy.before_block(cursor)?;
                let left = cursor.geometry().left();
                if render_paragraph(ctx, cursor, tally, text, left)? > 0 {
                    let after = if *lead_in {
                        options.spacing.lead_in_after
                    } else {
                        options.spacing.paragraph_after
                    };
                    cursor.advance(after * options.body_line_height());
                    tally.stats.paragraph_count += 1;
                }
            }
            Block::ListItem {
                level,
                explicit,
                text,
            } => {
                ctx.policy.before_block(cursor)?;
                let marker = match explicit {
                    Some(number) => {
                        self.counters.truncate_below(*level);
                        number.clone()
                    }
                    None => match options.list_marker {
                        ListMarker::Numbered => format!("{}.", self.counters.take(*level)),
                        ListMarker::Bullet => {
                            self.counters.truncate_below(*level);
                            BULLET.to_string()
                        }
                    },
                };
                render_list_item(ctx, cursor, tally, *level, &marker, text)?;
            }
            Block::Image { path, caption, .. } => {
                // pages turn only once the image resolves
                render_image(ctx, cursor, tally, line, path, caption.as_deref())?;
            }
            Block::Code { lines, .. } => {
                ctx.policy.before_block(cursor)?;
                render_code(ctx, cursor, tally, line, lines)?;
            }
            Block::Callout { kind, title, text } => {
                ctx.policy.before_block(cursor)?;
                render_callout(ctx, cursor, tally, line, *kind, title.as_deref(), text)?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Document {
        let geometry = *self.cursor.geometry();
        let pages = self.cursor.into_pages();
        let mut document = Document::new(geometry);

        document.metadata.title = self.title;
        document.metadata.page_count = pages.len() as u32;
        document.warnings = self.tally.warnings;
        document.stats = self.tally.stats;
        document.stats.page_count = pages.len() as u32;
        document.pages = pages;

        log::debug!(
            "Laid out {} blocks on {} pages ({} warnings)",
            document.stats.block_count(),
            document.page_count(),
            document.warnings.len()
        );
        document
    }
}
