//! End-to-end tests: markup in, PDF file out.

use std::fs;
use std::path::Path;

use lopdf::Object;
use pagemark::{render, render_file, LayoutOptions, Pagemark, PdfOptions, WarningKind};

fn write_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]))
        .save(path)
        .unwrap();
}

fn image_streams(doc: &lopdf::Document) -> usize {
    doc.objects
        .values()
        .filter(|obj| match obj {
            Object::Stream(stream) => stream
                .dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .map(|name| name == b"Image")
                .unwrap_or(false),
            _ => false,
        })
        .count()
}

#[test]
fn test_render_writes_loadable_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");
    let input = "# Release Notes\n\nVersion 2 ships today.\n\n- Faster startup\n- Smaller binary";

    let report = render(input, &output, &LayoutOptions::default()).unwrap();
    assert_eq!(report.page_count, 1);
    assert!(report.is_clean());
    assert_eq!(report.bytes_written, fs::metadata(&output).unwrap().len());
    assert_eq!(report.stats.heading_count, 1);
    assert_eq!(report.stats.list_item_count, 2);

    let loaded = lopdf::Document::load(&output).unwrap();
    assert_eq!(loaded.get_pages().len(), 1);
}

#[test]
fn test_multi_page_pdf_page_count() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("long.pdf");
    let input = "A paragraph that repeats until the document runs over several pages.\n"
        .repeat(120);

    let report = render(&input, &output, &LayoutOptions::default()).unwrap();
    assert!(report.page_count > 1);

    let loaded = lopdf::Document::load(&output).unwrap();
    assert_eq!(loaded.get_pages().len() as u32, report.page_count);
}

#[test]
fn test_render_file_resolves_images_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("chart.png"), 400, 200);
    let input = dir.path().join("doc.md");
    fs::write(
        &input,
        "# Results\n\n![Chart](chart.png)\n*Throughput per release*\n\n![Chart again](chart.png)\n",
    )
    .unwrap();
    let output = dir.path().join("doc.pdf");

    let report = render_file(&input, &output, &LayoutOptions::default()).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.stats.image_count, 2);

    let loaded = lopdf::Document::load(&output).unwrap();
    assert_eq!(image_streams(&loaded), 1);
}

#[test]
fn test_missing_image_still_writes_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let report = render(
        "Before.\n\n![Gone](missing/gone.png)\n\nAfter.",
        &output,
        &LayoutOptions::default(),
    )
    .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        report.warnings[0].kind,
        WarningKind::MissingImage { ref path } if path == "missing/gone.png"
    ));
    let loaded = lopdf::Document::load(&output).unwrap();
    assert_eq!(image_streams(&loaded), 0);
}

#[test]
fn test_diagram_inserted_at_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let diagram = dir.path().join("flow.png");
    write_png(&diagram, 300, 150);
    let input = "# Project\n\nOverview text.\n\n[WORKFLOW_DIAGRAM_PLACEHOLDER]\n\n## Details\n\nMore.";

    let rendered = Pagemark::new().with_diagram(&diagram).layout(input).unwrap();
    let doc = rendered.document();
    assert_eq!(doc.stats.image_count, 1);
    assert_eq!(doc.pages[0].image_count(), 1);

    let text = doc.plain_text();
    assert!(text.contains("Workflow Diagram"));
    assert!(text.contains("Figure 1: High-level workflow architecture of the project"));
    assert!(!text.contains("PLACEHOLDER"));
}

#[test]
fn test_pdf_info_title() {
    let rendered = Pagemark::new()
        .with_pdf_options(PdfOptions::default().with_title("Field Guide"))
        .layout("# Ignored Heading\n\nText.")
        .unwrap();
    let bytes = rendered.to_pdf().unwrap();

    let loaded = lopdf::Document::load_mem(&bytes).unwrap();
    let info_id = loaded.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = loaded.get_object(info_id).unwrap().as_dict().unwrap();
    match info.get(b"Title").unwrap() {
        Object::String(bytes, _) => assert_eq!(bytes, b"Field Guide"),
        other => panic!("unexpected title {:?}", other),
    }
}

#[test]
fn test_empty_input_writes_one_blank_page() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("empty.pdf");

    let report = render("", &output, &LayoutOptions::default()).unwrap();
    assert_eq!(report.page_count, 1);

    let loaded = lopdf::Document::load(&output).unwrap();
    assert_eq!(loaded.get_pages().len(), 1);
}
