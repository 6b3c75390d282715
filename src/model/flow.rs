//! Flow-format (paragraph/run) document types.

use super::{ReportMetadata, Run};
use serde::{Deserialize, Serialize};

/// Role of a paragraph in the flow output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParagraphKind {
    /// Part of the leading metadata block
    Metadata,
    /// A detected section header
    Heading {
        /// Heading level (1 = top)
        level: u8,
    },
    /// Ordinary content
    #[default]
    Body,
}

/// One paragraph of the flow document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphNode {
    /// Runs copied verbatim from the source line
    pub runs: Vec<Run>,

    /// Paragraph role, used by writers for styling only
    #[serde(default)]
    pub kind: ParagraphKind,
}

impl ParagraphNode {
    /// Create a body paragraph.
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs,
            kind: ParagraphKind::Body,
        }
    }

    /// Create a fully bold metadata paragraph.
    pub fn metadata(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::bold(text)],
            kind: ParagraphKind::Metadata,
        }
    }

    /// Set the paragraph kind.
    pub fn with_kind(mut self, kind: ParagraphKind) -> Self {
        self.kind = kind;
        self
    }

    /// Concatenated run text.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if this paragraph belongs to the metadata block.
    pub fn is_metadata(&self) -> bool {
        self.kind == ParagraphKind::Metadata
    }

    /// Heading level, if this paragraph is a section header.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            ParagraphKind::Heading { level } => Some(level),
            _ => None,
        }
    }
}

/// A pagination-agnostic document: metadata block followed by content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDocument {
    /// Report metadata
    pub metadata: ReportMetadata,

    /// Paragraphs, metadata block first
    pub paragraphs: Vec<ParagraphNode>,
}

impl FlowDocument {
    /// Paragraphs of the leading metadata block.
    pub fn metadata_paragraphs(&self) -> impl Iterator<Item = &ParagraphNode> {
        self.paragraphs.iter().take_while(|p| p.is_metadata())
    }

    /// Paragraphs after the metadata block.
    pub fn content_paragraphs(&self) -> impl Iterator<Item = &ParagraphNode> {
        self.paragraphs.iter().skip_while(|p| p.is_metadata())
    }

    /// Number of paragraphs, metadata included.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Plain text, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(ParagraphNode::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
