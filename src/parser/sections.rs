//! Section header detection.
//!
//! Report text arrives with numbered headers (`1. Executive Summary`) and
//! often wraps them in bold markup. Detection is informational: it drives
//! PDF bookmarks and DOCX heading styles and never rejects input.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Line, ParsedDocument};

/// Numbered lines longer than this are treated as list items, not headers,
/// unless they are fully bold.
const MAX_HEADER_LEN: usize = 80;

/// The canonical sections of a generated financial report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    ExecutiveSummary,
    IncomeStatement,
    BalanceSheet,
    CashFlowStatement,
    KeyFinancialRatios,
    RevenueCostBreakdown,
    MarketCompetitiveAnalysis,
    DebtCapitalStructure,
    FinancialForecasts,
    RisksChallenges,
    ManagementStrategyOutlook,
}

impl ReportSection {
    /// All sections in report order.
    pub const ALL: [ReportSection; 11] = [
        ReportSection::ExecutiveSummary,
        ReportSection::IncomeStatement,
        ReportSection::BalanceSheet,
        ReportSection::CashFlowStatement,
        ReportSection::KeyFinancialRatios,
        ReportSection::RevenueCostBreakdown,
        ReportSection::MarketCompetitiveAnalysis,
        ReportSection::DebtCapitalStructure,
        ReportSection::FinancialForecasts,
        ReportSection::RisksChallenges,
        ReportSection::ManagementStrategyOutlook,
    ];

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            ReportSection::ExecutiveSummary => "Executive Summary",
            ReportSection::IncomeStatement => "Income Statement",
            ReportSection::BalanceSheet => "Balance Sheet",
            ReportSection::CashFlowStatement => "Cash Flow Statement",
            ReportSection::KeyFinancialRatios => "Key Financial Ratios",
            ReportSection::RevenueCostBreakdown => "Revenue & Cost Breakdown",
            ReportSection::MarketCompetitiveAnalysis => "Market & Competitive Analysis",
            ReportSection::DebtCapitalStructure => "Debt & Capital Structure",
            ReportSection::FinancialForecasts => "Financial Forecasts",
            ReportSection::RisksChallenges => "Risks & Challenges",
            ReportSection::ManagementStrategyOutlook => "Management Strategy & Outlook",
        }
    }

    /// Position in the report (1-based).
    pub fn number(&self) -> u32 {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(0)
    }

    /// Match a header title against the canonical sections.
    ///
    /// Comparison ignores case, a trailing colon and `and` versus `&`.
    pub fn from_title(title: &str) -> Option<Self> {
        let wanted = normalize_title(title);
        Self::ALL
            .into_iter()
            .find(|s| normalize_title(s.title()) == wanted)
    }
}

fn normalize_title(title: &str) -> String {
    title
        .trim()
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
        .replace(" and ", " & ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A detected section header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Index of the header line in the parsed document
    pub line_index: usize,

    /// Number printed before the title, if any
    pub number: Option<u32>,

    /// Header title without the number prefix
    pub title: String,

    /// Heading level (1 = top)
    pub level: u8,

    /// Canonical section this header names, if recognised
    pub known: Option<ReportSection>,
}

impl Section {
    /// Full header text as it appears in the document.
    pub fn display_title(&self) -> String {
        match self.number {
            Some(n) => format!("{}. {}", n, self.title),
            None => self.title.clone(),
        }
    }
}

/// Finds section headers in a parsed document.
#[derive(Debug, Clone)]
pub struct SectionDetector {
    numbered: Regex,
    detect_bold_headers: bool,
}

impl SectionDetector {
    /// Create a detector recognising numbered and fully bold headers.
    pub fn new() -> Self {
        Self {
            numbered: Regex::new(r"^\s*(\d{1,3})[.)]\s+(\S.*?)\s*$")
                .expect("section header pattern is valid"),
            detect_bold_headers: true,
        }
    }

    /// Enable or disable fully-bold-line detection.
    pub fn with_bold_headers(mut self, detect: bool) -> Self {
        self.detect_bold_headers = detect;
        self
    }

    /// Check a single line.
    pub fn detect_line(&self, line_index: usize, line: &Line) -> Option<Section> {
        let text = line.plain_text();
        let fully_bold = line.is_fully_bold();

        if let Some(caps) = self.numbered.captures(&text) {
            let title = caps[2].trim_end_matches(':').trim().to_string();
            if !title.is_empty() && (fully_bold || text.trim().chars().count() <= MAX_HEADER_LEN) {
                return Some(Section {
                    line_index,
                    number: caps[1].parse().ok(),
                    known: ReportSection::from_title(&title),
                    title,
                    level: 1,
                });
            }
        }

        if self.detect_bold_headers && fully_bold {
            let title = text.trim().trim_end_matches(':').trim().to_string();
            if !title.is_empty() {
                return Some(Section {
                    line_index,
                    number: None,
                    known: ReportSection::from_title(&title),
                    title,
                    level: 1,
                });
            }
        }

        None
    }

    /// All section headers in document order.
    pub fn detect(&self, doc: &ParsedDocument) -> Vec<Section> {
        let sections: Vec<Section> = doc
            .lines()
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| self.detect_line(idx, line))
            .collect();
        log::debug!("detected {} section headers", sections.len());
        sections
    }
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MarkupParser;

    #[test]
    fn test_numbered_headers() {
        let doc = MarkupParser::new().parse(
            "*1. Executive Summary*\nRevenue grew.\n2) Balance Sheet:\nAssets rose.",
        );
        let sections = SectionDetector::new().detect(&doc);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].line_index, 0);
        assert_eq!(sections[0].number, Some(1));
        assert_eq!(sections[0].title, "Executive Summary");
        assert_eq!(sections[0].known, Some(ReportSection::ExecutiveSummary));
        assert_eq!(sections[1].line_index, 2);
        assert_eq!(sections[1].title, "Balance Sheet");
        assert_eq!(sections[1].display_title(), "2. Balance Sheet");
    }

    #[test]
    fn test_bold_headers_toggle() {
        let doc = MarkupParser::new().parse("*Risks and Challenges*\nbody");

        let sections = SectionDetector::new().detect(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].number, None);
        assert_eq!(sections[0].known, Some(ReportSection::RisksChallenges));

        let none = SectionDetector::new().with_bold_headers(false).detect(&doc);
        assert!(none.is_empty());
    }

    #[test]
    fn test_long_numbered_line_is_not_a_header() {
        let long = format!("3. {}", "word ".repeat(30));
        let doc = MarkupParser::new().parse(&long);
        assert!(SectionDetector::new().detect(&doc).is_empty());
    }

    #[test]
    fn test_header_length_counts_characters() {
        // 78 characters, but well over 80 bytes
        let title = format!("4. {}", "\u{e9}".repeat(75));
        assert_eq!(title.chars().count(), 78);
        assert!(title.len() > 80);

        let doc = MarkupParser::new().parse(&title);
        let sections = SectionDetector::new().detect(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].number, Some(4));
    }

    #[test]
    fn test_section_numbers_and_titles() {
        assert_eq!(ReportSection::ExecutiveSummary.number(), 1);
        assert_eq!(ReportSection::ManagementStrategyOutlook.number(), 11);
        assert_eq!(
            ReportSection::from_title("revenue and cost breakdown:"),
            Some(ReportSection::RevenueCostBreakdown)
        );
        assert_eq!(ReportSection::from_title("Appendix"), None);
    }
}
