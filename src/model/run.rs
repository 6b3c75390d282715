//! Run, line and parsed-document types.

use serde::{Deserialize, Serialize};

/// A contiguous span of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content, never containing a markup delimiter
    pub text: String,

    /// Whether the run is rendered bold
    pub bold: bool,
}

impl Run {
    /// Create a run with an explicit style.
    pub fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }

    /// Create a regular (non-bold) run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    /// Create a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }

    /// Check if this run has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One input line decomposed into runs.
///
/// A line with zero runs is a blank line; it still occupies vertical space
/// when paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Runs in reading order
    pub runs: Vec<Run>,
}

impl Line {
    /// Create an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line from runs.
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Concatenate run text in order.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Check if the line is blank (no runs, or only empty runs).
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// Check if every non-empty run is bold and at least one exists.
    pub fn is_fully_bold(&self) -> bool {
        let mut visible = self.runs.iter().filter(|r| !r.text.trim().is_empty()).peekable();
        visible.peek().is_some() && visible.all(|r| r.bold)
    }

    /// Number of runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }
}

/// Parsed representation of a raw report text, one [`Line`] per input line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    lines: Vec<Line>,
}

impl ParsedDocument {
    /// Create a parsed document from lines in document order.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Lines in document order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Check if the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of bold runs with visible text.
    pub fn bold_run_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| l.runs.iter())
            .filter(|r| r.bold && !r.is_empty())
            .count()
    }

    /// Plain text with delimiters stripped, lines joined by `\n`.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
