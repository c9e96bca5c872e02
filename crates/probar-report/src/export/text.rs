//! Plain text file exporter.

use super::{resolve_file_target, write_file, ReportExporter};
use crate::report::Report;
use crate::result::ReportResult;

/// Writes the rendered report text to a file
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFileExporter;

impl TextFileExporter {
    /// Format name
    pub const FORMAT: &'static str = "text";

    /// Create a text exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportExporter for TextFileExporter {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn export(&self, report: &dyn Report, target: &str) -> ReportResult<()> {
        let path = resolve_file_target(report, target, "txt")?;
        write_file(target, &path, report.content())
    }
}
