//! Markup parsing: input preparation, line classification and inline spans.

mod block;
mod classifier;
mod cleanup;
mod inline;
mod options;

pub use block::{Block, CalloutKind, Classified};
pub use classifier::LineClassifier;
pub use cleanup::{
    CleanupOptions, CleanupPipeline, DiagramInsert, PreparedInput, DEFAULT_DIAGRAM_PLACEHOLDER,
};
pub use inline::{has_emphasis, parse_spans, spans_text, InlineSpan};
pub use options::ParseOptions;

/// Prepare and classify a whole input, pairing each block with the 1-based
/// input line it starts on.
///
/// Blank lines are kept so callers can see list boundaries.
pub fn parse_blocks(input: &str, options: &ParseOptions) -> Vec<(usize, Block)> {
    let prepared = CleanupPipeline::new(options.cleanup.clone()).process(input);
    let lines = prepared.lines();
    let classifier = LineClassifier::new(options);

    let mut blocks = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let classified = classifier.classify(&lines[index..]);
        blocks.push((prepared.source_line(index), classified.block));
        index += classified.consumed + 1;
    }
    blocks
}
