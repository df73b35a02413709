//! PDF serialization of laid-out documents.
//!
//! Pages are written with the standard Type1 fonts (no embedding) in
//! WinAnsiEncoding. Images are decoded, flattened onto white and stored as
//! Flate-compressed RGB XObjects, each file once per document.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};

use super::PdfOptions;
use crate::error::{Error, Result};
use crate::model::{Color, DrawOp, Document, FilledRect, FontFace, ImageOp, Page, TextRun};

/// Distance from the top of a line box to the baseline, per point of font size.
const BASELINE_RATIO: f32 = 0.8;

/// Serialize a document to PDF bytes.
pub fn to_pdf(doc: &Document, options: &PdfOptions) -> Result<Vec<u8>> {
    let mut pdf = lopdf::Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let mut font_dict = Dictionary::new();
    for face in FontFace::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(face.resource_name(), font_id);
    }

    let images = embed_images(&mut pdf, doc, options.compress)?;
    let mut xobjects = Dictionary::new();
    for (name, id) in images.values() {
        xobjects.set(name.as_str(), *id);
    }

    let mut resources = dictionary! { "Font" => font_dict };
    if !xobjects.is_empty() {
        resources.set("XObject", xobjects);
    }
    let resources_id = pdf.add_object(resources);

    let mut kids = Vec::with_capacity(doc.pages.len());
    for page in &doc.pages {
        let content = page_content(page, &images)?;
        let stream = content_stream(content, options.compress)?;
        let content_id = pdf.add_object(stream);
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);

    let info_id = pdf.add_object(info_dictionary(doc, options));
    pdf.trailer.set("Info", info_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    log::debug!("Wrote {} pages, {} bytes of PDF", doc.pages.len(), bytes.len());
    Ok(bytes)
}

/// Serialize a document and write it to `path`.
///
/// Returns the number of bytes written.
pub fn write_pdf(doc: &Document, path: impl AsRef<Path>, options: &PdfOptions) -> Result<u64> {
    let bytes = to_pdf(doc, options)?;
    std::fs::write(path.as_ref(), &bytes)?;
    Ok(bytes.len() as u64)
}

fn info_dictionary(doc: &Document, options: &PdfOptions) -> Dictionary {
    let mut info = Dictionary::new();
    let title = options.title.as_ref().or(doc.metadata.title.as_ref());
    if let Some(title) = title {
        info.set("Title", text_string(title));
    }
    let author = options.author.as_ref().or(doc.metadata.author.as_ref());
    if let Some(author) = author {
        info.set("Author", text_string(author));
    }
    info.set("Creator", text_string(&options.creator));
    info.set("Producer", text_string(concat!("pagemark ", env!("CARGO_PKG_VERSION"))));

    let created = options.creation_date.unwrap_or_else(Utc::now);
    info.set(
        "CreationDate",
        Object::string_literal(created.format("D:%Y%m%d%H%M%S+00'00'").to_string()),
    );
    info
}

/// PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Embedded images keyed by source file: resource name and object id.
type ImageTable = BTreeMap<PathBuf, (String, ObjectId)>;

fn embed_images(pdf: &mut lopdf::Document, doc: &Document, compress: bool) -> Result<ImageTable> {
    let mut table = ImageTable::new();
    let sources = doc.pages.iter().flat_map(|p| p.ops.iter()).filter_map(|op| match op {
        DrawOp::Image(img) => Some(&img.source),
        _ => None,
    });

    for source in sources {
        if table.contains_key(source) {
            continue;
        }
        let stream = image_stream(source, compress)?;
        let id = pdf.add_object(stream);
        let name = format!("Im{}", table.len() + 1);
        table.insert(source.clone(), (name, id));
    }
    Ok(table)
}

fn image_stream(path: &Path, compress: bool) -> Result<Stream> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    // flatten transparency onto a white page
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as u32;
        for channel in [r, g, b] {
            let blended = (channel as u32 * alpha + 255 * (255 - alpha)) / 255;
            rgb.push(blended as u8);
        }
    }

    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };
    let data = if compress {
        dict.set("Filter", "FlateDecode");
        deflate(&rgb)?
    } else {
        rgb
    };
    log::debug!("Embedded image {} ({}x{})", path.display(), width, height);
    Ok(Stream::new(dict, data))
}

fn content_stream(content: Content, compress: bool) -> Result<Stream> {
    let encoded = content
        .encode()
        .map_err(|e| Error::Pdf(format!("content stream encoding failed: {}", e)))?;
    if compress {
        Ok(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(&encoded)?,
        ))
    } else {
        Ok(Stream::new(Dictionary::new(), encoded))
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn page_content(page: &Page, images: &ImageTable) -> Result<Content> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect(rect) => rect_ops(&mut ops, rect, page.height),
            DrawOp::Text(run) => text_ops(&mut ops, run, page.height),
            DrawOp::Image(img) => image_ops(&mut ops, img, images, page.height)?,
        }
    }
    Ok(Content { operations: ops })
}

fn color_operands(color: Color) -> Vec<Object> {
    color.components().into_iter().map(Object::Real).collect()
}

fn rect_ops(ops: &mut Vec<Operation>, rect: &FilledRect, page_height: f32) {
    let r = rect.rect;
    let paint = match (rect.fill, rect.border) {
        (Some(_), Some(_)) => "B",
        (Some(_), None) => "f",
        (None, Some(_)) => "S",
        (None, None) => return,
    };

    ops.push(Operation::new("q", vec![]));
    if let Some(fill) = rect.fill {
        ops.push(Operation::new("rg", color_operands(fill)));
    }
    if let Some(border) = rect.border {
        ops.push(Operation::new("RG", color_operands(border)));
        ops.push(Operation::new("w", vec![rect.border_width.into()]));
    }
    ops.push(Operation::new(
        "re",
        vec![
            r.x.into(),
            (page_height - r.bottom()).into(),
            r.width.into(),
            r.height.into(),
        ],
    ));
    ops.push(Operation::new(paint, vec![]));
    ops.push(Operation::new("Q", vec![]));
}

fn text_ops(ops: &mut Vec<Operation>, run: &TextRun, page_height: f32) {
    let baseline = page_height - run.origin.y - run.size * BASELINE_RATIO;
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("rg", color_operands(run.color)));
    ops.push(Operation::new(
        "Tf",
        vec![
            Object::Name(run.face.resource_name().as_bytes().to_vec()),
            run.size.into(),
        ],
    ));
    ops.push(Operation::new("Tw", vec![run.word_spacing.into()]));
    ops.push(Operation::new("Td", vec![run.origin.x.into(), baseline.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(to_winansi(&run.text))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn image_ops(
    ops: &mut Vec<Operation>,
    img: &ImageOp,
    images: &ImageTable,
    page_height: f32,
) -> Result<()> {
    let (name, _) = images
        .get(&img.source)
        .ok_or_else(|| Error::Pdf(format!("image {} was not embedded", img.source.display())))?;
    let r = img.rect;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            r.width.into(),
            0.into(),
            0.into(),
            r.height.into(),
            r.x.into(),
            (page_height - r.bottom()).into(),
        ],
    ));
    ops.push(Operation::new(
        "Do",
        vec![Object::Name(name.as_bytes().to_vec())],
    ));
    ops.push(Operation::new("Q", vec![]));
    Ok(())
}

/// Encode text for the WinAnsiEncoding base fonts.
///
/// Characters outside the encoding become `?`.
pub fn to_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{201A}' => 0x82,
            '\u{0192}' => 0x83,
            '\u{201E}' => 0x84,
            '\u{2026}' => 0x85,
            '\u{2020}' => 0x86,
            '\u{2021}' => 0x87,
            '\u{02C6}' => 0x88,
            '\u{2030}' => 0x89,
            '\u{0160}' => 0x8A,
            '\u{2039}' => 0x8B,
            '\u{0152}' => 0x8C,
            '\u{017D}' => 0x8E,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{02DC}' => 0x98,
            '\u{2122}' => 0x99,
            '\u{0161}' => 0x9A,
            '\u{203A}' => 0x9B,
            '\u{0153}' => 0x9C,
            '\u{017E}' => 0x9E,
            '\u{0178}' => 0x9F,
            _ => b'?',
        })
        .collect()
}
