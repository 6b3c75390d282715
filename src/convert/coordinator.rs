//! Single-parse export coordination.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ExportOptions, ExportResult, ExporterRegistry, OutputFormat};
use crate::error::Result;
use crate::layout::Paginator;
use crate::model::{
    FlowDocument, Outline, OutlineItem, Page, PageGeometry, PaginatedDocument, ParsedDocument,
    ReportMetadata,
};
use crate::parser::{MarkupParser, Section, SectionDetector};
use crate::render::{FlowRenderer, PdfRenderer};

/// Owns one parsed report and feeds both renderers from it.
///
/// The raw text is parsed exactly once, in [`ExportCoordinator::new`]. Every
/// export afterwards works from the same [`ParsedDocument`], so PDF and DOCX
/// outputs always agree on content and bold styling.
#[derive(Debug, Clone)]
pub struct ExportCoordinator {
    parsed: ParsedDocument,
    metadata: ReportMetadata,
    geometry: PageGeometry,
    options: ExportOptions,
}

impl ExportCoordinator {
    /// Parse `raw` with default options.
    pub fn new(raw: &str, metadata: ReportMetadata, geometry: PageGeometry) -> Result<Self> {
        Self::with_options(raw, metadata, geometry, ExportOptions::default())
    }

    /// Parse `raw` with custom options.
    ///
    /// Geometry and options are validated before anything is parsed; on
    /// error no coordinator exists and nothing can be exported.
    pub fn with_options(
        raw: &str,
        metadata: ReportMetadata,
        geometry: PageGeometry,
        options: ExportOptions,
    ) -> Result<Self> {
        geometry.validate()?;
        let parser = MarkupParser::with_options(options.parse.clone())?;
        let parsed = parser.parse(raw);

        log::info!(
            "parsed report for {} ({} lines)",
            metadata.company,
            parsed.line_count()
        );

        Ok(Self {
            parsed,
            metadata,
            geometry,
            options,
        })
    }

    /// The shared parsed document.
    pub fn parsed(&self) -> &ParsedDocument {
        &self.parsed
    }

    pub fn metadata(&self) -> &ReportMetadata {
        &self.metadata
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn detector(&self) -> SectionDetector {
        SectionDetector::new().with_bold_headers(self.options.parse.detect_bold_headers)
    }

    /// Section headers found in the report.
    pub fn sections(&self) -> Vec<Section> {
        self.detector().detect(&self.parsed)
    }

    /// Lines assigned to pages.
    pub fn pages(&self) -> Result<Vec<Page>> {
        Ok(Paginator::new(self.geometry)?.paginate(&self.parsed))
    }

    /// Paginated draw commands, ready for a PDF writer.
    pub fn to_paginated(&self) -> Result<PaginatedDocument> {
        let pages = self.pages()?;
        let outline = self.outline(&pages);
        let renderer = PdfRenderer::new(self.geometry, self.options.render.clone());
        let rendered = renderer.render(&pages, &self.metadata);

        Ok(PaginatedDocument {
            metadata: self.metadata.clone(),
            geometry: self.geometry,
            pages: rendered,
            outline,
        })
    }

    /// Paragraph/run tree, ready for a flowing writer.
    pub fn to_flow(&self) -> FlowDocument {
        FlowRenderer::new()
            .with_detector(self.detector())
            .render_document(&self.parsed, &self.metadata)
    }

    /// Bookmarks pointing at the page and position of each section header.
    fn outline(&self, pages: &[Page]) -> Outline {
        let positions: Vec<(u32, f32)> = pages
            .iter()
            .flat_map(|page| page.lines.iter().map(move |l| (page.number(), l.y)))
            .collect();

        let mut outline = Outline::new();
        for section in self.sections() {
            if let Some(&(page, y)) = positions.get(section.line_index) {
                outline.add_item(OutlineItem::new(
                    section.display_title(),
                    page,
                    y,
                    section.level,
                ));
            }
        }
        outline
    }

    /// Output file name for this report.
    pub fn file_name(&self, ext: &str) -> String {
        report_file_name(&self.metadata.company, ext)
    }

    /// Export with the built-in exporters.
    pub fn export(&self, format: OutputFormat) -> Result<ExportResult> {
        ExporterRegistry::with_defaults().export(self, format.extension())
    }

    /// Export with the exporter registered for `ext`.
    pub fn export_with(&self, registry: &ExporterRegistry, ext: &str) -> Result<ExportResult> {
        registry.export(self, ext)
    }

    /// Export and write to `dir`, returning the written path.
    pub fn save(&self, dir: &Path, format: OutputFormat) -> Result<PathBuf> {
        let result = self.export(format)?;
        fs::create_dir_all(dir)?;
        let path = dir.join(&result.file_name);
        fs::write(&path, &result.bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), result.len());
        Ok(path)
    }

    /// Summary numbers for the report.
    pub fn stats(&self) -> Result<DocumentStats> {
        let pages = self.pages()?;
        let text = self.parsed.plain_text();
        Ok(DocumentStats {
            line_count: self.parsed.line_count(),
            page_count: pages.len(),
            bold_run_count: self.parsed.bold_run_count(),
            section_count: self.sections().len(),
            word_count: text.split_whitespace().count(),
            char_count: text.chars().filter(|c| *c != '\n').count(),
            lines_per_page: self.geometry.lines_per_page(),
        })
    }
}

/// Counts describing a parsed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    pub line_count: usize,
    pub page_count: usize,
    pub bold_run_count: usize,
    pub section_count: usize,
    pub word_count: usize,
    pub char_count: usize,
    pub lines_per_page: usize,
}

/// `{company}-financial-report.{ext}`, with the company name reduced to a
/// filesystem-safe slug.
pub fn report_file_name(company: &str, ext: &str) -> String {
    format!(
        "{}-financial-report.{}",
        company_slug(company),
        ext.trim_start_matches('.')
    )
}

fn company_slug(company: &str) -> String {
    let mut slug = String::with_capacity(company.len());
    for c in company.trim().chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if (c == '-' || c.is_whitespace()) && !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.to_string()
    }
}

/// Export several reports in parallel.
///
/// Results are returned in input order; one failing report does not affect
/// the others.
pub fn render_batch(reports: &[ExportCoordinator], format: OutputFormat) -> Vec<Result<ExportResult>> {
    let registry = ExporterRegistry::with_defaults();
    reports
        .par_iter()
        .map(|report| registry.export(report, format.extension()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::ReportType;
    use chrono::NaiveDate;

    fn meta() -> ReportMetadata {
        ReportMetadata::new("Acme Corp", ReportType::Quarterly)
            .with_generated_on(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
    }

    fn small_geometry() -> PageGeometry {
        PageGeometry::letter()
            .with_page_height(100.0)
            .with_vertical_margins(10.0, 10.0)
            .with_header_height(20.0)
            .with_line_height(20.0)
    }

    #[test]
    fn test_company_slug() {
        assert_eq!(company_slug("Acme Corp"), "Acme-Corp");
        assert_eq!(company_slug("  Acme   Corp, Inc. "), "Acme-Corp-Inc");
        assert_eq!(company_slug("a/b\\c"), "abc");
        assert_eq!(company_slug("snake_case-name"), "snake_case-name");
        assert_eq!(company_slug("///"), "report");
        assert_eq!(company_slug(""), "report");
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("Acme Corp", "pdf"),
            "Acme-Corp-financial-report.pdf"
        );
        assert_eq!(
            report_file_name("Acme Corp", ".docx"),
            "Acme-Corp-financial-report.docx"
        );
    }

    #[test]
    fn test_invalid_geometry_rejected_before_parse() {
        let geometry = PageGeometry::letter().with_line_height(0.0);
        let result = ExportCoordinator::new("text", meta(), geometry);
        assert!(matches!(result, Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let options = ExportOptions::new().with_parse_options(
            crate::parser::ParseOptions::new().with_delimiter('a'),
        );
        let result = ExportCoordinator::with_options("text", meta(), PageGeometry::letter(), options);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn test_outline_points_at_section_lines() {
        let raw = "*1. Executive Summary*\na\nb\nc\n*2. Revenue Analysis*\nd";
        let report = ExportCoordinator::new(raw, meta(), small_geometry()).unwrap();
        let doc = report.to_paginated().unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.outline.items.len(), 2);
        assert_eq!(doc.outline.items[0].title, "1. Executive Summary");
        assert_eq!(doc.outline.items[0].page, 1);
        assert_eq!(doc.outline.items[0].y, 30.0);
        assert_eq!(doc.outline.items[1].page, 2);
        assert_eq!(doc.outline.items[1].y, 50.0);
    }

    #[test]
    fn test_both_views_share_parse() {
        let raw = "Revenue grew *12%* year over year.";
        let report = ExportCoordinator::new(raw, meta(), PageGeometry::letter()).unwrap();

        let flow = report.to_flow();
        let paginated = report.to_paginated().unwrap();
        let content: Vec<_> = flow.content_paragraphs().collect();

        assert_eq!(content.len(), 1);
        assert_eq!(content[0].runs, report.parsed().lines()[0].runs);
        assert_eq!(paginated.pages[0].line_texts(), vec![content[0].plain_text()]);
    }

    #[test]
    fn test_stats() {
        let raw = "*1. Executive Summary*\nRevenue grew *12%*.\n\nDone";
        let report = ExportCoordinator::new(raw, meta(), PageGeometry::letter()).unwrap();
        let stats = report.stats().unwrap();

        assert_eq!(stats.line_count, 4);
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.bold_run_count, 2);
        assert_eq!(stats.section_count, 1);
        assert_eq!(stats.word_count, 7);
        assert_eq!(stats.lines_per_page, 36);
    }

    #[test]
    fn test_render_batch_keeps_order() {
        let reports: Vec<_> = ["Alpha", "Beta", "Gamma"]
            .iter()
            .map(|name| {
                let meta = ReportMetadata::new(*name, ReportType::Annual);
                ExportCoordinator::new("body", meta, PageGeometry::letter()).unwrap()
            })
            .collect();

        let results = render_batch(&reports, OutputFormat::Json);
        let names: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().file_name)
            .collect();
        assert_eq!(
            names,
            vec![
                "Alpha-financial-report.json",
                "Beta-financial-report.json",
                "Gamma-financial-report.json",
            ]
        );
    }
}
