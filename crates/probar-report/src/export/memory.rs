//! In-memory exporter.
//!
//! Targets are logical sink names. Useful for tests and for pipelines that
//! post-process report text before writing it themselves.

use super::ReportExporter;
use crate::report::Report;
use crate::result::ReportResult;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Captures exported report text keyed by target
#[derive(Debug, Default)]
pub struct MemoryExporter {
    sinks: Mutex<BTreeMap<String, String>>,
}

impl MemoryExporter {
    /// Format name
    pub const FORMAT: &'static str = "memory";

    /// Create an empty memory exporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text last exported to `target`
    #[must_use]
    pub fn get(&self, target: &str) -> Option<String> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
    }

    /// Remove and return the text exported to `target`
    pub fn take(&self, target: &str) -> Option<String> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(target)
    }

    /// Targets written so far, sorted
    #[must_use]
    pub fn targets(&self) -> Vec<String> {
        self.sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl ReportExporter for MemoryExporter {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn export(&self, report: &dyn Report, target: &str) -> ReportResult<()> {
        let _ = self
            .sinks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(target.to_string(), report.content().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExporterRegistry;
    use crate::identifier::LocalizedReportIdentifier;
    use crate::report::TemplateReport;
    use chrono::Utc;
    use std::sync::Arc;

    #[test]
    fn test_capture_and_take() {
        let report = TemplateReport::new(
            LocalizedReportIdentifier::parse("[a::en::0]").unwrap(),
            Utc::now(),
            "body".to_string(),
            Vec::new(),
            Arc::new(ExporterRegistry::new()),
        );
        let exporter = MemoryExporter::new();
        exporter.export(&report, "sink-b").unwrap();
        exporter.export(&report, "sink-a").unwrap();

        assert_eq!(exporter.targets(), vec!["sink-a", "sink-b"]);
        assert_eq!(exporter.take("sink-a").as_deref(), Some("body"));
        assert_eq!(exporter.get("sink-a"), None);
        assert_eq!(exporter.get("sink-b").as_deref(), Some("body"));
    }
}
