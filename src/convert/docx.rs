//! DOCX (WordprocessingML) writer.
//!
//! Produces a minimal package: content types, relationships, styles, core
//! properties and the main document part. Word handles pagination.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{DocumentExporter, ExportCoordinator};
use crate::error::Result;
use crate::model::{FlowDocument, PageGeometry, ParagraphKind, ParagraphNode, Run};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="0"/></w:pPr><w:rPr><w:rFonts w:ascii="Helvetica" w:hAnsi="Helvetica" w:cs="Helvetica"/><w:sz w:val="22"/></w:rPr></w:style>
<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="60"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:sz w:val="26"/></w:rPr></w:style>
<w:style w:type="paragraph" w:customStyle="1" w:styleId="ReportMetadata"><w:name w:val="Report Metadata"/><w:basedOn w:val="Normal"/><w:rPr><w:sz w:val="24"/></w:rPr></w:style>
</w:styles>"#;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Writes flow documents as DOCX packages.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }

    /// Encode a flow document; `geometry` sets the section page size and margins.
    pub fn write(&self, doc: &FlowDocument, geometry: &PageGeometry) -> Result<Vec<u8>> {
        write_docx(doc, geometry)
    }
}

impl DocumentExporter for DocxExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "DOCX"
    }

    fn mime_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }

    fn export(&self, report: &ExportCoordinator) -> Result<Vec<u8>> {
        write_docx(&report.to_flow(), report.geometry())
    }
}

/// Serialize a flow document to DOCX bytes.
pub fn write_docx(doc: &FlowDocument, geometry: &PageGeometry) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", deflated)?;
    zip.write_all(ROOT_RELS_XML.as_bytes())?;

    zip.start_file("word/_rels/document.xml.rels", deflated)?;
    zip.write_all(DOCUMENT_RELS_XML.as_bytes())?;

    zip.start_file("word/styles.xml", deflated)?;
    zip.write_all(STYLES_XML.as_bytes())?;

    zip.start_file("docProps/core.xml", deflated)?;
    zip.write_all(core_xml(doc).as_bytes())?;

    zip.start_file("word/document.xml", deflated)?;
    zip.write_all(document_xml(doc, geometry).as_bytes())?;

    let bytes = zip.finish()?.into_inner();
    log::debug!(
        "wrote DOCX: {} paragraphs, {} bytes",
        doc.paragraph_count(),
        bytes.len()
    );
    Ok(bytes)
}

fn document_xml(doc: &FlowDocument, geometry: &PageGeometry) -> String {
    let mut xml = String::with_capacity(256 + doc.paragraphs.len() * 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!("\n<w:document xmlns:w=\"{}\"><w:body>", W_NS));

    for paragraph in &doc.paragraphs {
        write_paragraph(&mut xml, paragraph);
    }

    // Word measures page setup in twentieths of a point.
    let twips = |pt: f32| (pt * 20.0).round() as i64;
    xml.push_str(&format!(
        "<w:sectPr><w:pgSz w:w=\"{}\" w:h=\"{}\"/><w:pgMar w:top=\"{}\" w:right=\"{}\" w:bottom=\"{}\" w:left=\"{}\" w:header=\"0\" w:footer=\"0\" w:gutter=\"0\"/></w:sectPr>",
        twips(geometry.page_width),
        twips(geometry.page_height),
        twips(geometry.margin_top),
        twips(geometry.margin_left),
        twips(geometry.margin_bottom),
        twips(geometry.margin_left),
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn write_paragraph(xml: &mut String, paragraph: &ParagraphNode) {
    xml.push_str("<w:p>");
    let style = match paragraph.kind {
        ParagraphKind::Metadata => Some("ReportMetadata"),
        ParagraphKind::Heading { .. } => Some("Heading1"),
        ParagraphKind::Body => None,
    };
    if let Some(style) = style {
        xml.push_str(&format!("<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>", style));
    }
    for run in paragraph.runs.iter().filter(|r| !r.is_empty()) {
        write_run(xml, run);
    }
    xml.push_str("</w:p>");
}

fn write_run(xml: &mut String, run: &Run) {
    xml.push_str("<w:r>");
    if run.bold {
        xml.push_str("<w:rPr><w:b/></w:rPr>");
    }
    xml.push_str("<w:t xml:space=\"preserve\">");
    xml.push_str(&xml_text(&run.text));
    xml.push_str("</w:t></w:r>");
}

fn core_xml(doc: &FlowDocument) -> String {
    let meta = &doc.metadata;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:title>{}</dc:title>
<dc:creator>{}</dc:creator>
<dc:subject>{}</dc:subject>
<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>
</cp:coreProperties>"#,
        xml_text(&meta.title()),
        xml_text(&meta.company),
        meta.report_type,
        meta.generated_at.format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

/// Escape text content, dropping control characters XML 1.0 cannot carry.
fn xml_text(text: &str) -> String {
    if text.chars().any(|c| c.is_control() && c != '\t') {
        let cleaned: String = text
            .chars()
            .filter(|c| !c.is_control() || *c == '\t')
            .collect();
        escape(cleaned.as_str()).into_owned()
    } else {
        escape(text).into_owned()
    }
}
