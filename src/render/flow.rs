//! Paragraph/run tree generation for flowing formats.

use crate::model::{FlowDocument, ParagraphKind, ParagraphNode, ParsedDocument, ReportMetadata};
use crate::parser::SectionDetector;

/// Builds the flow document model from a parsed document.
///
/// No pagination is applied; flowing formats compute their own page breaks.
#[derive(Debug, Clone)]
pub struct FlowRenderer {
    sections: Option<SectionDetector>,
}

impl FlowRenderer {
    /// Create a renderer that tags detected section headers.
    pub fn new() -> Self {
        Self {
            sections: Some(SectionDetector::new()),
        }
    }

    /// Use a custom section detector.
    pub fn with_detector(mut self, detector: SectionDetector) -> Self {
        self.sections = Some(detector);
        self
    }

    /// Emit every content paragraph as body text.
    pub fn without_sections(mut self) -> Self {
        self.sections = None;
        self
    }

    /// Metadata block followed by one paragraph per line.
    pub fn render(&self, doc: &ParsedDocument, metadata: &ReportMetadata) -> Vec<ParagraphNode> {
        let header = metadata.header_lines();
        let mut paragraphs = Vec::with_capacity(header.len() + doc.line_count());
        paragraphs.extend(header.into_iter().map(ParagraphNode::metadata));

        for (idx, line) in doc.lines().iter().enumerate() {
            let kind = self
                .sections
                .as_ref()
                .and_then(|d| d.detect_line(idx, line))
                .map(|s| ParagraphKind::Heading { level: s.level })
                .unwrap_or(ParagraphKind::Body);
            paragraphs.push(ParagraphNode::new(line.runs.clone()).with_kind(kind));
        }

        paragraphs
    }

    /// Render into a [`FlowDocument`].
    pub fn render_document(&self, doc: &ParsedDocument, metadata: &ReportMetadata) -> FlowDocument {
        FlowDocument {
            metadata: metadata.clone(),
            paragraphs: self.render(doc, metadata),
        }
    }
}

impl Default for FlowRenderer {
    fn default() -> Self {
        Self::new()
    }
}
