//! # reportdoc
//!
//! Render AI-generated financial report text into paginated PDF and flowing
//! DOCX documents.
//!
//! Report text arrives as plain lines with a paired bold delimiter
//! (`*bold*` by default). The text is parsed once into runs, then fed to two
//! renderers: one produces positioned draw commands on fixed-size pages, the
//! other produces a paragraph/run tree for word processors. Both outputs carry
//! the same metadata header and the same bold styling.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reportdoc::{ExportCoordinator, OutputFormat, PageGeometry, ReportMetadata, ReportType};
//!
//! fn main() -> reportdoc::Result<()> {
//!     let raw = "*1. Executive Summary*\nRevenue grew *12%* year over year.";
//!     let meta = ReportMetadata::new("Acme Corp", ReportType::Quarterly);
//!
//!     let report = ExportCoordinator::new(raw, meta, PageGeometry::letter())?;
//!     let pdf = report.export(OutputFormat::Pdf)?;
//!     std::fs::write(&pdf.file_name, &pdf.bytes)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bold markup**: strict delimiter alternation, unmatched spans close at line end
//! - **Pagination**: line-based layout under a fixed metadata header band
//! - **Output formats**: PDF (lopdf), DOCX (zip), JSON
//! - **Section detection**: numbered and bold headers become bookmarks and headings
//! - **Parallel processing**: Uses Rayon for page rendering and batch export

pub mod convert;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{
    render_batch, DocumentExporter, DocumentStats, ExportCoordinator, ExportOptions, ExportResult,
    ExporterRegistry, OutputFormat,
};
pub use error::{Error, Result};
pub use layout::{paginate, Paginator};
pub use model::{
    DrawCommand, FlowDocument, Line, Outline, OutlineItem, Page, PageGeometry, PaginatedDocument,
    ParagraphKind, ParagraphNode, ParsedDocument, PositionedLine, RenderedPage, ReportMetadata,
    ReportType, Run,
};
pub use parser::{MarkupParser, ParseOptions, ReportSection, Section, SectionDetector};
pub use render::{FlowRenderer, JsonFormat, PdfRenderer, RenderOptions};

use std::path::{Path, PathBuf};

/// Parse report text with the default `*` delimiter.
///
/// # Example
///
/// ```
/// let doc = reportdoc::parse("*Executive Summary*\nRevenue grew 10%.");
/// assert_eq!(doc.line_count(), 2);
/// assert!(doc.lines()[0].runs[0].bold);
/// ```
pub fn parse(raw: &str) -> ParsedDocument {
    MarkupParser::new().parse(raw)
}

/// Parse report text with custom options.
pub fn parse_with_options(raw: &str, options: ParseOptions) -> Result<ParsedDocument> {
    Ok(MarkupParser::with_options(options)?.parse(raw))
}

/// Parse and paginate report text, producing draw commands for every page.
///
/// # Example
///
/// ```
/// use reportdoc::{render_paginated, PageGeometry, ReportMetadata};
///
/// let doc = render_paginated("", &ReportMetadata::default(), PageGeometry::letter()).unwrap();
/// assert_eq!(doc.page_count(), 1);
/// assert_eq!(doc.content_line_count(), 0);
/// ```
pub fn render_paginated(
    raw: &str,
    metadata: &ReportMetadata,
    geometry: PageGeometry,
) -> Result<PaginatedDocument> {
    ExportCoordinator::new(raw, metadata.clone(), geometry)?.to_paginated()
}

/// Parse report text into the paragraph/run tree used by flowing formats.
pub fn render_flow(raw: &str, metadata: &ReportMetadata) -> FlowDocument {
    FlowRenderer::new().render_document(&parse(raw), metadata)
}

/// Export report text to a single format.
pub fn export(
    raw: &str,
    metadata: &ReportMetadata,
    geometry: PageGeometry,
    format: OutputFormat,
) -> Result<ExportResult> {
    ExportCoordinator::new(raw, metadata.clone(), geometry)?.export(format)
}

/// Builder for configuring and running report exports.
///
/// # Example
///
/// ```no_run
/// use reportdoc::{Reportdoc, ReportType, OutputFormat};
///
/// let path = Reportdoc::new()
///     .company("Acme Corp")
///     .report_type(ReportType::Annual)
///     .with_delimiter('_')
///     .a4()
///     .build("_1. Executive Summary_\nRevenue grew.")?
///     .save("reports".as_ref(), OutputFormat::Docx)?;
/// # Ok::<(), reportdoc::Error>(())
/// ```
pub struct Reportdoc {
    metadata: ReportMetadata,
    geometry: PageGeometry,
    options: ExportOptions,
}

impl Reportdoc {
    /// Create a new builder with letter geometry and default options.
    pub fn new() -> Self {
        Self {
            metadata: ReportMetadata::default(),
            geometry: PageGeometry::letter(),
            options: ExportOptions::default(),
        }
    }

    /// Set the company name.
    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.metadata.company = company.into();
        self
    }

    /// Set the report type.
    pub fn report_type(mut self, report_type: ReportType) -> Self {
        self.metadata.report_type = report_type;
        self
    }

    /// Replace the metadata entirely.
    pub fn metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the page geometry.
    pub fn geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Use A4 page geometry.
    pub fn a4(self) -> Self {
        self.geometry(PageGeometry::a4())
    }

    /// Set the bold delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.options.parse = self.options.parse.with_delimiter(delimiter);
        self
    }

    /// Render pages on the current thread only.
    pub fn sequential(mut self) -> Self {
        self.options.render = self.options.render.sequential();
        self
    }

    /// Write PDF content streams uncompressed.
    pub fn uncompressed(mut self) -> Self {
        self.options.compress = false;
        self
    }

    /// Set the full export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse `raw` and return a coordinator ready for export.
    pub fn build(self, raw: &str) -> Result<ExportCoordinator> {
        ExportCoordinator::with_options(raw, self.metadata, self.geometry, self.options)
    }

    /// Parse `raw` and save every built-in format into `dir`.
    pub fn save_all(self, raw: &str, dir: &Path) -> Result<Vec<PathBuf>> {
        let report = self.build(raw)?;
        OutputFormat::ALL
            .iter()
            .map(|format| report.save(dir, *format))
            .collect()
    }
}

impl Default for Reportdoc {
    fn default() -> Self {
        Self::new()
    }
}
