//! Report metadata shared by every output format.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of financial report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Quarterly report
    #[default]
    Quarterly,
    /// Annual report
    Annual,
}

impl ReportType {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Quarterly => "Quarterly",
            ReportType::Annual => "Annual",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" | "q" => Ok(ReportType::Quarterly),
            "annual" | "yearly" | "a" => Ok(ReportType::Annual),
            other => Err(format!("unknown report type: {}", other)),
        }
    }
}

/// Caller-supplied metadata printed in the page header and the flow
/// document's leading block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Company the report is about
    pub company: String,

    /// Quarterly or annual
    pub report_type: ReportType,

    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl ReportMetadata {
    /// Create metadata stamped with the current time.
    pub fn new(company: impl Into<String>, report_type: ReportType) -> Self {
        Self {
            company: company.into(),
            report_type,
            generated_at: Utc::now(),
        }
    }

    /// Set the generation timestamp.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Set the generation date (midnight UTC).
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_at = date.and_time(chrono::NaiveTime::MIN).and_utc();
        self
    }

    /// Document title, e.g. `Quarterly Financial Report`.
    pub fn title(&self) -> String {
        format!("{} Financial Report", self.report_type)
    }

    /// Generation date as `YYYY-MM-DD`.
    pub fn date_string(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// Header lines in display order: title, company, report type, date.
    ///
    /// Both the paginated header and the flow metadata block are built from
    /// this list.
    pub fn header_lines(&self) -> Vec<String> {
        vec![
            self.title(),
            format!("Company: {}", self.company),
            format!("Report Type: {}", self.report_type),
            format!("Generated: {}", self.date_string()),
        ]
    }
}

impl Default for ReportMetadata {
    fn default() -> Self {
        Self::new("", ReportType::default())
    }
}
