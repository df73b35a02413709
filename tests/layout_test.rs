//! Integration tests for the layout engine.

use pagemark::error::{Error, Result};
use pagemark::{
    layout, layout_with, Document, DrawOp, FontFace, ImageInfo, ImageSource, LayoutOptions,
    PageGeometry, ParseOptions, StandardFontMetrics, TextMeasurer, TextRun, WarningKind,
};

const EPS: f32 = 0.01;

/// Image source that knows no images.
struct NoImages;

impl ImageSource for NoImages {
    fn probe(&self, _reference: &str) -> Result<Option<ImageInfo>> {
        Ok(None)
    }
}

/// Image source whose backing store is unavailable.
struct DeniedImages;

impl ImageSource for DeniedImages {
    fn probe(&self, reference: &str) -> Result<Option<ImageInfo>> {
        Err(Error::ImageSource {
            path: reference.to_string(),
            reason: "permission denied".into(),
        })
    }
}

/// Measurer that always fails.
struct BrokenMetrics;

impl TextMeasurer for BrokenMetrics {
    fn measure(&self, _text: &str, _face: FontFace, _size: f32) -> Result<f32> {
        Err(Error::Measure("metrics unavailable".into()))
    }
}

fn mixed_document(repeats: usize) -> String {
    let mut input = String::from("# Operations Handbook\n\n");
    for i in 0..repeats {
        input.push_str(&format!("## Section {}\n\n", i + 1));
        input.push_str(
            "Every section starts with a paragraph long enough to wrap over several lines, \
             so that justification and page splitting both get exercised by the layout \
             engine while it fills the page from top to bottom.\n\n",
        );
        input.push_str("The steps are as follows:\n");
        input.push_str("- Prepare the environment\n");
        input.push_str("  - Check the **toolchain** version\n");
        input.push_str("- Run the deployment\n\n");
        input.push_str("> Warning: Back up the database before running migrations.\n\n");
        input.push_str("```bash\n./deploy.sh --env staging\n\n./verify.sh\n```\n\n");
    }
    input
}

fn runs(doc: &Document) -> Vec<&TextRun> {
    doc.pages.iter().flat_map(|p| p.text_runs()).collect()
}

fn list_markers(doc: &Document, x: f32) -> Vec<String> {
    runs(doc)
        .into_iter()
        .filter(|r| (r.origin.x - x).abs() < EPS)
        .map(|r| r.text.clone())
        .collect()
}

#[test]
fn test_every_op_within_page_bounds() {
    let options = LayoutOptions::default();
    let doc = layout(&mixed_document(12), &options).unwrap();
    assert!(doc.page_count() > 1);

    let geometry = doc.geometry;
    for page in &doc.pages {
        for op in &page.ops {
            let (top, bottom) = op.vertical_extent();
            assert!(top >= geometry.top() - EPS, "{:?} above top margin", op);
            assert!(bottom <= geometry.bottom() + EPS, "{:?} below bottom margin", op);
        }
    }
}

#[test]
fn test_pages_numbered_in_order() {
    let doc = layout(&mixed_document(12), &LayoutOptions::default()).unwrap();
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.number, i as u32 + 1);
        assert!(!page.is_empty());
    }
    assert_eq!(doc.stats.page_count, doc.page_count());
    assert_eq!(doc.metadata.title.as_deref(), Some("Operations Handbook"));
}

#[test]
fn test_justified_lines_fit_column() {
    let metrics = StandardFontMetrics::new();
    let text = "Justified body text spreads its inter-word spacing so that every line except \
                the last one reaches the right margin exactly, which only works when the \
                natural width of the line never exceeds the column to begin with. "
        .repeat(4);
    let doc = layout(&text, &LayoutOptions::default()).unwrap();
    let column = doc.geometry.content_width();

    let lines = runs(&doc);
    assert!(lines.len() > 3);
    for run in &lines {
        let natural = metrics.measure(&run.text, run.face, run.size).unwrap();
        assert!(natural <= column + EPS, "'{}' is {} wide", run.text, natural);
        if run.word_spacing > 0.0 {
            let stretched = natural + run.gap_count() as f32 * run.word_spacing;
            assert!((stretched - column).abs() < 0.05);
        }
    }
    let last = lines.last().unwrap();
    assert_eq!(last.word_spacing, 0.0);
}

#[test]
fn test_unjustified_lines_have_no_spacing() {
    let text = "word ".repeat(300);
    let options = LayoutOptions::default().with_justify(false);
    let doc = layout(&text, &options).unwrap();
    assert!(runs(&doc).iter().all(|r| r.word_spacing == 0.0));
}

#[test]
fn test_list_numbering_resets_after_blank() {
    let input = "- one\n- two\n- three\n\n- four\n- five";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    let x = doc.geometry.left() + LayoutOptions::default().indent.list;

    assert_eq!(list_markers(&doc, x), vec!["1.", "2.", "3.", "1.", "2."]);
    assert_eq!(doc.stats.list_item_count, 5);
}

#[test]
fn test_list_numbering_resets_after_heading() {
    let input = "- one\n- two\n## Next\n- three";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    let x = doc.geometry.left() + LayoutOptions::default().indent.list;

    assert_eq!(list_markers(&doc, x), vec!["1.", "2.", "1."]);
}

#[test]
fn test_nested_list_numbering() {
    let input = "- a\n  - a.1\n  - a.2\n- b\n  - b.1";
    let options = LayoutOptions::default();
    let doc = layout(input, &options).unwrap();
    let outer = doc.geometry.left() + options.indent.list;
    let inner = outer + options.indent.nested;

    assert_eq!(list_markers(&doc, outer), vec!["1.", "2."]);
    assert_eq!(list_markers(&doc, inner), vec!["1.", "2.", "1."]);
}

#[test]
fn test_explicit_numbers_preserved() {
    let input = "3. alpha\n3. beta\n3. gamma\n3. delta\n3. epsilon";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    let x = doc.geometry.left() + LayoutOptions::default().indent.list;

    assert_eq!(list_markers(&doc, x), vec!["3."; 5]);
}

#[test]
fn test_title_then_body() {
    let doc = layout("# Title\n\nBody paragraph text.", &LayoutOptions::default()).unwrap();
    assert_eq!(doc.page_count(), 1);

    let lines = runs(&doc);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "Title");
    assert_eq!(lines[0].face, FontFace::Bold);
    assert_eq!(lines[0].origin.y, doc.geometry.top());
    assert_eq!(lines[1].text, "Body paragraph text.");
    assert_eq!(lines[1].face, FontFace::Regular);
    assert!(lines[1].origin.y > lines[0].origin.y + lines[0].size);
}

#[test]
fn test_single_page_has_no_trailing_page() {
    let input = "# Short\n\nOne paragraph.\n\n- item\n- item\n\n";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    assert_eq!(doc.page_count(), 1);
}

#[test]
fn test_layout_is_deterministic() {
    let input = mixed_document(6);
    let options = LayoutOptions::default();
    let first = layout(&input, &options).unwrap();
    let second = layout(&input, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_image_changes_nothing() {
    let options = LayoutOptions::default();
    let without = layout("Intro text.\n\nOutro text.", &options).unwrap();
    let with = layout("Intro text.\n\n![chart](no/such/chart.png)\n\nOutro text.", &options)
        .unwrap();

    assert_eq!(with.pages, without.pages);
    assert_eq!(with.pages[0].image_count(), 0);
    assert_eq!(with.stats.missing_image_count, 1);
    assert_eq!(with.warnings.len(), 1);
    assert_eq!(with.warnings[0].line, 3);
    assert!(matches!(with.warnings[0].kind, WarningKind::MissingImage { .. }));
}

/// One-line paragraphs that leave the cursor in the bottom safety zone of
/// an A4 page.
fn page_of_paragraphs() -> String {
    (1..=28).map(|i| format!("Line {}\n\n", i)).collect()
}

#[test]
fn test_missing_image_at_page_bottom_adds_no_page() {
    let options = LayoutOptions::default();
    let filler = page_of_paragraphs();
    let base = layout(&filler, &options).unwrap();
    let with = layout(&format!("{}![x](no/such/file.png)\n", filler), &options).unwrap();

    assert_eq!(base.page_count(), 1);
    assert_eq!(with.page_count(), 1);
    assert_eq!(with.pages, base.pages);
    assert_eq!(with.warnings.len(), 1);
    assert_eq!(with.warnings[0].line, 57);
}

#[test]
fn test_blank_paragraph_at_page_bottom_adds_no_page() {
    let options = LayoutOptions::default();
    let filler = page_of_paragraphs();
    let base = layout(&filler, &options).unwrap();
    let with = layout(&format!("{}` `\n", filler), &options).unwrap();

    assert_eq!(with.page_count(), 1);
    assert_eq!(with.pages, base.pages);
    assert_eq!(with.stats.paragraph_count, base.stats.paragraph_count);
}

#[test]
fn test_warning_line_counts_wrapper_fence() {
    let input = "```markdown\n# T\n\n![x](no/such.png)\n```";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    assert_eq!(doc.warnings.len(), 1);
    assert_eq!(doc.warnings[0].line, 4);
}

#[test]
fn test_error_line_counts_wrapper_fence() {
    let page = PageGeometry::new(115.0, 400.0, 50.0);
    let options = LayoutOptions::default().with_page(page);
    let err = layout("```markdown\n# T\n\n# MMMMMMMM\n```", &options).unwrap_err();
    assert_eq!(err.line(), Some(4));
}

#[test]
fn test_image_source_failure_is_fatal() {
    let err = layout_with(
        "Intro.\n\n![chart](charts/q3.png)",
        &ParseOptions::default(),
        &LayoutOptions::default(),
        &StandardFontMetrics::new(),
        &DeniedImages,
    )
    .unwrap_err();
    assert_eq!(err.line(), Some(3));
    match err {
        Error::RenderFailed { source, .. } => {
            assert!(matches!(*source, Error::ImageSource { ref path, .. } if path == "charts/q3.png"));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_code_block_never_split() {
    // usable height holds about 20 code lines
    let page = PageGeometry::new(595.0, 334.0, 50.0);
    let options = LayoutOptions::default().with_page(page);
    let mut input = String::from("Lead paragraph.\n\n```rust\n");
    for i in 0..50 {
        input.push_str(&format!("let value_{} = {};\n", i, i));
    }
    input.push_str("```\n");

    let doc = layout(&input, &options).unwrap();

    let pages_with_code: Vec<_> = doc
        .pages
        .iter()
        .filter(|p| p.text_runs().any(|r| r.face == FontFace::Mono))
        .collect();
    assert_eq!(pages_with_code.len(), 1);
    let mono = pages_with_code[0]
        .text_runs()
        .filter(|r| r.face == FontFace::Mono)
        .count();
    assert_eq!(mono, 50);
    assert!(doc
        .warnings
        .iter()
        .any(|w| matches!(w.kind, WarningKind::Condensed { .. })));
    for op in &pages_with_code[0].ops {
        assert!(op.vertical_extent().1 <= page.bottom() + EPS);
    }
}

#[test]
fn test_code_block_moves_whole_to_next_page() {
    let options = LayoutOptions::default();
    let mut input = "Filler line.\n".repeat(27);
    input.push_str("```\nfirst\nsecond\nthird\nfourth\n```\n");

    let doc = layout(&input, &options).unwrap();
    assert_eq!(doc.page_count(), 2);
    let second = &doc.pages[1];
    assert!(matches!(second.ops[0], DrawOp::Rect(_)));
    assert_eq!(
        second.text_runs().filter(|r| r.face == FontFace::Mono).count(),
        4
    );
}

#[test]
fn test_heading_kept_with_next_lines() {
    let options = LayoutOptions::default();
    let mut input = "Filler line.\n".repeat(27);
    input.push_str("## Stranded?\nFollowing paragraph.\n");

    let doc = layout(&input, &options).unwrap();
    let heading_page = doc
        .pages
        .iter()
        .find(|p| p.text_runs().any(|r| r.text == "Stranded?"))
        .unwrap();
    assert!(heading_page
        .text_runs()
        .any(|r| r.text == "Following paragraph."));
}

#[test]
fn test_callout_box() {
    let input = "> **Tip:** Cache the dependency directory\n> between builds.";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    let page = &doc.pages[0];

    let rects: Vec<_> = page
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Rect(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(rects.len(), 2);
    let palette = &LayoutOptions::default().callouts.palette;
    assert_eq!(rects[0].fill, Some(palette.tip.fill));

    let text = page.plain_text();
    assert!(text.contains("Tip"));
    assert!(text.contains("Cache the dependency directory between builds."));
    assert_eq!(doc.stats.callout_count, 1);
}

#[test]
fn test_bold_spans_use_bold_face() {
    let doc = layout("Plain then **strong words** then plain.", &LayoutOptions::default())
        .unwrap();
    let lines = runs(&doc);
    assert!(lines
        .iter()
        .any(|r| r.face == FontFace::Bold && r.text.contains("strong words")));
    assert!(lines.iter().all(|r| !r.text.contains("**")));
}

#[test]
fn test_unmatched_emphasis_is_literal() {
    let doc = layout("A stray ** marker.", &LayoutOptions::default()).unwrap();
    let lines = runs(&doc);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].text, "A stray ** marker.");
}

#[test]
fn test_wrapping_fence_removed() {
    let input = "```markdown\n# Report\n\nBody.\n```";
    let doc = layout(input, &LayoutOptions::default()).unwrap();
    assert_eq!(doc.stats.code_block_count, 0);
    assert_eq!(doc.stats.heading_count, 1);
    assert_eq!(doc.metadata.title.as_deref(), Some("Report"));
}

#[test]
fn test_empty_input_single_blank_page() {
    for input in ["", "\n\n", "   \t  \n"] {
        let doc = layout(input, &LayoutOptions::default()).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].is_empty());
        assert!(doc.warnings.is_empty());
    }
}

#[test]
fn test_page_limit_reported_with_line() {
    let options = LayoutOptions::default().with_max_pages(2);
    let input = "A line of text.\n".repeat(200);

    let err = layout(&input, &options).unwrap_err();
    match err {
        Error::RenderFailed { line, source } => {
            assert!(line > 1);
            assert!(matches!(*source, Error::PageLimitExceeded(2)));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_measure_failure_is_fatal() {
    let err = layout_with(
        "# Heading",
        &ParseOptions::default(),
        &LayoutOptions::default(),
        &BrokenMetrics,
        &NoImages,
    )
    .unwrap_err();
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_unbreakable_glyph_is_config_error() {
    // a bold 22pt M is wider than the 15pt column
    let page = PageGeometry::new(115.0, 400.0, 50.0);
    let options = LayoutOptions::default().with_page(page);
    let err = layout("# MMMMMMMM", &options).unwrap_err();
    assert_eq!(err.line(), Some(1));
    assert!(matches!(err, Error::RenderFailed { ref source, .. } if matches!(**source, Error::Config(_))));
}
