//! PDF writer built on lopdf.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::{DocumentExporter, ExportCoordinator};
use crate::error::Result;
use crate::model::{DrawCommand, Outline, PaginatedDocument, RenderedPage};
use crate::render::FontFace;

/// Baseline offset from the top of a line, as a fraction of the font size.
const ASCENT: f32 = 0.8;

/// Writes paginated reports as PDF using the standard Helvetica faces.
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    compress: Option<bool>,
}

impl PdfExporter {
    /// Create an exporter that follows the report's compression option.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force content stream compression on or off.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = Some(compress);
        self
    }

    /// Encode a paginated document.
    pub fn write(&self, doc: &PaginatedDocument) -> Result<Vec<u8>> {
        write_pdf(doc, self.compress.unwrap_or(true))
    }
}

impl DocumentExporter for PdfExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "PDF"
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn export(&self, report: &ExportCoordinator) -> Result<Vec<u8>> {
        let doc = report.to_paginated()?;
        let compress = self.compress.unwrap_or(report.options().compress);
        write_pdf(&doc, compress)
    }
}

/// Serialize a paginated document to PDF bytes.
pub fn write_pdf(doc: &PaginatedDocument, compress: bool) -> Result<Vec<u8>> {
    let mut pdf = Document::with_version("1.7");
    let pages_id = pdf.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = pdf.add_object(dictionary! { "Font" => fonts });

    let width = doc.geometry.page_width;
    let height = doc.geometry.page_height;
    let mut page_ids = Vec::with_capacity(doc.pages.len());

    for page in &doc.pages {
        let data = page_content(page, height).encode()?;
        let stream = if compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data)?;
            Stream::new(dictionary! { "Filter" => "FlateDecode" }, encoder.finish()?)
        } else {
            Stream::new(dictionary! {}, data)
        };
        let content_id = pdf.add_object(stream);

        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    pdf.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }
        .into(),
    );

    let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => pages_id };
    if let Some(outlines_id) = build_outlines(&mut pdf, &doc.outline, &page_ids, height) {
        catalog.set("Outlines", outlines_id);
        catalog.set("PageMode", "UseOutlines");
    }
    let catalog_id = pdf.add_object(catalog);
    pdf.trailer.set("Root", catalog_id);

    let created = doc
        .metadata
        .generated_at
        .format("D:%Y%m%d%H%M%SZ")
        .to_string();
    let info_id = pdf.add_object(dictionary! {
        "Title" => text_string(&doc.metadata.title()),
        "Author" => text_string(&doc.metadata.company),
        "Subject" => text_string(&format!("Report Type: {}", doc.metadata.report_type)),
        "Producer" => text_string(concat!("reportdoc ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(created),
    });
    pdf.trailer.set("Info", info_id);

    let mut buffer = Vec::new();
    pdf.save_to(&mut buffer)?;

    log::debug!(
        "wrote PDF: {} pages, {} bytes, {} bookmarks",
        page_ids.len(),
        buffer.len(),
        doc.outline.total_items()
    );
    Ok(buffer)
}

/// Content stream for one page. Font state is only emitted when it changes.
fn page_content(page: &RenderedPage, page_height: f32) -> Content {
    let mut ops = Vec::new();
    let mut current: Option<(FontFace, f32)> = None;

    for cmd in page.commands() {
        if cmd.text.is_empty() {
            continue;
        }

        ops.push(Operation::new("BT", vec![]));
        let face = FontFace::for_bold(cmd.bold);
        if current != Some((face, cmd.font_size)) {
            ops.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(face.resource_name().as_bytes().to_vec()),
                    cmd.font_size.into(),
                ],
            ));
            current = Some((face, cmd.font_size));
        }
        ops.push(Operation::new("Td", vec![cmd.x.into(), pdf_y(cmd, page_height).into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(to_win_ansi(&cmd.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    Content { operations: ops }
}

/// Convert a top-down line position to a PDF baseline.
fn pdf_y(cmd: &DrawCommand, page_height: f32) -> f32 {
    page_height - (cmd.y + cmd.font_size * ASCENT)
}

/// Flat bookmark list; returns the outline root if there is anything to link.
fn build_outlines(
    pdf: &mut Document,
    outline: &Outline,
    page_ids: &[ObjectId],
    page_height: f32,
) -> Option<ObjectId> {
    let items: Vec<_> = outline
        .items
        .iter()
        .filter_map(|item| {
            let page_id = *page_ids.get((item.page as usize).checked_sub(1)?)?;
            let dest: Vec<Object> = vec![
                Object::Reference(page_id),
                "FitH".into(),
                (page_height - item.y).into(),
            ];
            Some((pdf.new_object_id(), item.title.as_str(), dest))
        })
        .collect();

    let (first, last) = match (items.first(), items.last()) {
        (Some(first), Some(last)) => (first.0, last.0),
        _ => return None,
    };

    let root_id = pdf.new_object_id();
    for (i, (id, title, dest)) in items.iter().enumerate() {
        let mut dict = dictionary! {
            "Title" => text_string(title),
            "Parent" => root_id,
            "Dest" => dest.clone(),
        };
        if i > 0 {
            dict.set("Prev", items[i - 1].0);
        }
        if let Some(next) = items.get(i + 1) {
            dict.set("Next", next.0);
        }
        pdf.objects.insert(*id, dict.into());
    }

    pdf.objects.insert(
        root_id,
        dictionary! {
            "Type" => "Outlines",
            "First" => first,
            "Last" => last,
            "Count" => items.len() as i64,
        }
        .into(),
    );
    Some(root_id)
}

fn text_string(text: &str) -> Object {
    Object::String(to_win_ansi(text), StringFormat::Literal)
}

/// Encode text for a WinAnsiEncoding font.
///
/// Latin-1 maps directly; common typographic punctuation maps to the
/// 0x80-0x9F block. Anything else becomes `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    let mut unmapped = 0usize;
    let bytes = s
        .chars()
        .map(|c| match win_ansi_byte(c) {
            Some(b) => b,
            None => {
                unmapped += 1;
                b'?'
            }
        })
        .collect();

    if unmapped > 0 {
        log::warn!("{} character(s) not representable in WinAnsi: {:?}", unmapped, s);
    }
    bytes
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let b = match c {
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
        '\t' => b' ',
        c if (c as u32) < 0x20 || (0x80..0xA0).contains(&(c as u32)) => return None,
        c if (c as u32) <= 0xFF => c as u8,
        _ => return None,
    };
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OutlineItem, PageGeometry, ReportMetadata};

    fn cmd(y: f32, text: &str, bold: bool) -> DrawCommand {
        DrawCommand {
            x: 72.0,
            y,
            text: text.to_string(),
            bold,
            font_size: 11.0,
        }
    }

    fn sample(pages: usize) -> PaginatedDocument {
        let mut outline = Outline::new();
        outline.add_item(OutlineItem::new("1. Executive Summary", 1, 144.0, 1));
        PaginatedDocument {
            metadata: ReportMetadata::default(),
            geometry: PageGeometry::letter(),
            pages: (0..pages)
                .map(|index| RenderedPage {
                    index,
                    header: vec![cmd(72.0, "Header", true)],
                    body: vec![cmd(144.0, "Revenue ", false), cmd(144.0, "up", true)],
                })
                .collect(),
            outline,
        }
    }

    #[test]
    fn test_win_ansi_mapping() {
        assert_eq!(to_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(to_win_ansi("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("\u{20AC}5 \u{2014} ok"), vec![0x80, b'5', b' ', 0x97, b' ', b'o', b'k']);
        assert_eq!(to_win_ansi("\u{4E2D}"), vec![b'?']);
    }

    #[test]
    fn test_page_content_font_switching() {
        let page = &sample(1).pages[0];
        let content = page_content(page, 792.0);
        let fonts: Vec<_> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tf")
            .map(|op| op.operands[0].as_name().unwrap().to_vec())
            .collect();
        assert_eq!(fonts, vec![b"F2".to_vec(), b"F1".to_vec(), b"F2".to_vec()]);

        let shows = content.operations.iter().filter(|op| op.operator == "Tj").count();
        assert_eq!(shows, 3);
    }

    #[test]
    fn test_pdf_y_flips_axis() {
        let c = cmd(72.0, "x", false);
        assert!((pdf_y(&c, 792.0) - (792.0 - 72.0 - 8.8)).abs() < 1e-3);
    }

    #[test]
    fn test_write_pdf_loads_back() {
        for compress in [true, false] {
            let bytes = write_pdf(&sample(3), compress).unwrap();
            assert!(bytes.starts_with(b"%PDF-1.7"));

            let loaded = Document::load_mem(&bytes).unwrap();
            assert_eq!(loaded.get_pages().len(), 3);

            let first = *loaded.get_pages().get(&1).unwrap();
            let content = Content::decode(&loaded.get_page_content(first).unwrap()).unwrap();
            let shown: Vec<_> = content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| op.operands[0].as_str().unwrap().to_vec())
                .collect();
            assert_eq!(shown, vec![b"Header".to_vec(), b"Revenue ".to_vec(), b"up".to_vec()]);
        }
    }

    #[test]
    fn test_outline_written() {
        let bytes = write_pdf(&sample(1), false).unwrap();
        let loaded = Document::load_mem(&bytes).unwrap();
        let catalog = loaded.catalog().unwrap();
        assert!(catalog.get(b"Outlines").is_ok());
    }
}
