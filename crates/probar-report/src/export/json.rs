//! JSON file exporter.

use super::{resolve_file_target, write_file, ReportExporter};
use crate::report::{Report, ReportState};
use crate::result::ReportResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Writes the report and its metadata as a pretty-printed JSON document
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileExporter;

/// On-disk JSON shape
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    identifier: &'a str,
    name: String,
    locale: String,
    sequence: u32,
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a ReportState>,
    content: &'a str,
}

impl JsonFileExporter {
    /// Format name
    pub const FORMAT: &'static str = "json";

    /// Create a JSON exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the JSON document for a report
    pub fn render(report: &dyn Report) -> ReportResult<String> {
        let id = report.id();
        let document = JsonReport {
            identifier: id.canonical_string(),
            name: report.name(),
            locale: id.locale().to_string(),
            sequence: id.sequence(),
            generated_at: report.generation_timestamp(),
            state: report.state(),
            content: report.content(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

impl ReportExporter for JsonFileExporter {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn export(&self, report: &dyn Report, target: &str) -> ReportResult<()> {
        let path = resolve_file_target(report, target, "json")?;
        let json = Self::render(report)?;
        write_file(target, &path, &json)
    }
}
