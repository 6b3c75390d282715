//! Export module providing a plugin architecture for output formats.
//!
//! An [`ExportCoordinator`] owns one parsed report; exporters registered in
//! an [`ExporterRegistry`] turn it into bytes for a given file extension.
//!
//! # Example
//!
//! ```no_run
//! use reportdoc::convert::{ExportCoordinator, OutputFormat};
//! use reportdoc::model::{PageGeometry, ReportMetadata, ReportType};
//!
//! fn main() -> reportdoc::Result<()> {
//!     let meta = ReportMetadata::new("Acme Corp", ReportType::Quarterly);
//!     let report = ExportCoordinator::new("*1. Executive Summary*\nRevenue grew 10%.", meta, PageGeometry::letter())?;
//!
//!     let path = report.save("out".as_ref(), OutputFormat::Pdf)?;
//!     println!("{}", path.display());
//!     Ok(())
//! }
//! ```

mod coordinator;
mod docx;
mod json;
mod pdf;

pub use coordinator::{render_batch, report_file_name, DocumentStats, ExportCoordinator};
pub use docx::DocxExporter;
pub use json::{JsonExporter, JsonLayout};
pub use pdf::PdfExporter;

use crate::error::{Error, Result};
use crate::parser::ParseOptions;
use crate::render::{JsonFormat, RenderOptions};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Options for the whole export pipeline.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Markup parsing options
    pub parse: ParseOptions,

    /// Draw-command options
    pub render: RenderOptions,

    /// JSON output format
    pub json_format: JsonFormat,

    /// Flate-compress PDF content streams
    pub compress: bool,
}

impl ExportOptions {
    /// Create new export options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set JSON output format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Enable or disable PDF stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            render: RenderOptions::default(),
            json_format: JsonFormat::Pretty,
            compress: true,
        }
    }
}

/// Built-in output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Paginated PDF
    #[default]
    Pdf,

    /// Flowing DOCX
    Docx,

    /// JSON dump of the flow document
    Json,
}

impl OutputFormat {
    /// All built-in formats.
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Pdf, OutputFormat::Docx, OutputFormat::Json];

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Docx => "docx",
            OutputFormat::Json => "json",
        }
    }

    /// MIME type of the output.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let ext = s.trim().trim_start_matches('.').to_lowercase();
        OutputFormat::ALL
            .into_iter()
            .find(|f| f.extension() == ext)
            .ok_or(Error::UnsupportedFormat(ext))
    }
}

/// Result of exporting a report.
#[derive(Debug, Clone)]
pub struct ExportResult {
    /// Encoded document
    pub bytes: Vec<u8>,

    /// Suggested file name (`{company}-financial-report.{ext}`)
    pub file_name: String,

    /// MIME type of the output
    pub mime_type: &'static str,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new(bytes: Vec<u8>, file_name: String, mime_type: &'static str) -> Self {
        Self {
            bytes,
            file_name,
            mime_type,
        }
    }

    /// Get content length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Trait for document exporters.
///
/// Implement this trait to add support for a new output format.
pub trait DocumentExporter: Send + Sync {
    /// Get the supported file extensions for this exporter.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this exporter.
    fn name(&self) -> &str;

    /// MIME type of the produced bytes.
    fn mime_type(&self) -> &'static str;

    /// Encode a report.
    fn export(&self, report: &ExportCoordinator) -> Result<Vec<u8>>;

    /// Check if this exporter supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document exporters.
///
/// The registry maps file extensions to exporters.
pub struct ExporterRegistry {
    exporters: HashMap<String, Arc<dyn DocumentExporter>>,
    by_name: HashMap<String, Arc<dyn DocumentExporter>>,
}

impl ExporterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            exporters: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the PDF, DOCX and JSON exporters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExporter::new()));
        registry.register(Arc::new(DocxExporter::new()));
        registry.register(Arc::new(JsonExporter::new()));
        registry
    }

    /// Register an exporter.
    ///
    /// The exporter will be registered for all its supported extensions.
    pub fn register(&mut self, exporter: Arc<dyn DocumentExporter>) {
        for ext in exporter.supported_extensions() {
            self.exporters.insert(ext.to_lowercase(), exporter.clone());
        }
        self.by_name.insert(exporter.name().to_lowercase(), exporter);
    }

    /// Get an exporter by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentExporter>> {
        self.exporters
            .get(&ext.trim_start_matches('.').to_lowercase())
            .cloned()
    }

    /// Get an exporter by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentExporter>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.get_by_extension(ext).is_some()
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.exporters.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Export a report using the exporter registered for `ext`.
    pub fn export(&self, report: &ExportCoordinator, ext: &str) -> Result<ExportResult> {
        let exporter = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))?;

        let ext = ext.trim_start_matches('.').to_lowercase();
        log::debug!("exporting {} with {} exporter", ext, exporter.name());
        let bytes = exporter.export(report)?;
        Ok(ExportResult::new(
            bytes,
            report.file_name(&ext),
            exporter.mime_type(),
        ))
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_options_builder() {
        let options = ExportOptions::new()
            .with_compression(false)
            .with_json_format(JsonFormat::Compact)
            .with_parse_options(ParseOptions::new().with_delimiter('_'));

        assert!(!options.compress);
        assert_eq!(options.json_format, JsonFormat::Compact);
        assert_eq!(options.parse.delimiter, '_');
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(".DOCX".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert!(matches!(
            "odt".parse::<OutputFormat>(),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_registry_with_defaults() {
        let registry = ExporterRegistry::with_defaults();
        assert!(registry.supports("pdf"));
        assert!(registry.supports("PDF"));
        assert!(registry.supports("docx"));
        assert!(registry.supports("json"));
        assert!(!registry.supports("odt"));
        assert_eq!(registry.supported_extensions(), vec!["docx", "json", "pdf"]);
    }

    #[test]
    fn test_registry_get_by_name() {
        let registry = ExporterRegistry::with_defaults();
        let exporter = registry.get_by_name("docx");
        assert!(exporter.is_some());
        assert_eq!(exporter.unwrap().supported_extensions(), &["docx"]);
    }
}
