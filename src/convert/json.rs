//! JSON exporter.

use super::{DocumentExporter, ExportCoordinator};
use crate::error::Result;
use crate::render::to_json;

/// Which document model the JSON output carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonLayout {
    /// Paragraph/run tree
    #[default]
    Flow,
    /// Pages of positioned draw commands
    Paginated,
}

/// Serializes a report's document model as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    layout: JsonLayout,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the document model to serialize.
    pub fn with_layout(mut self, layout: JsonLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl DocumentExporter for JsonExporter {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "JSON"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn export(&self, report: &ExportCoordinator) -> Result<Vec<u8>> {
        let format = report.options().json_format;
        let json = match self.layout {
            JsonLayout::Flow => to_json(&report.to_flow(), format)?,
            JsonLayout::Paginated => to_json(&report.to_paginated()?, format)?,
        };
        Ok(json.into_bytes())
    }
}
