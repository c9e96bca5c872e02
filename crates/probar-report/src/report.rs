//! Compiled Reports
//!
//! A report is constructed by a generator, finalizes its lazily computed
//! state on the first export, and can then be exported any number of times:
//!
//! ```text
//! Constructed ──export()──► finalize_state() (once) ──► Exported (repeatable)
//! ```

use crate::export::ExporterRegistry;
use crate::identifier::LocalizedReportIdentifier;
use crate::result::ReportResult;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Derived report state, computed on first export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportState {
    /// Hex SHA-256 of the report content
    pub digest: String,
    /// Number of lines in the content
    pub line_count: usize,
    /// Content length in bytes
    pub byte_len: usize,
}

impl ReportState {
    /// Compute the state of a content string
    #[must_use]
    pub fn of(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes())
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        Self {
            digest,
            line_count: content.lines().count(),
            byte_len: content.len(),
        }
    }
}

/// A finished, exportable report
pub trait Report: fmt::Debug + Send + Sync {
    /// Identifier the report was compiled for
    fn id(&self) -> &LocalizedReportIdentifier;

    /// Human-readable name
    fn name(&self) -> String {
        self.id().id().to_string()
    }

    /// When the report was generated
    fn generation_timestamp(&self) -> DateTime<Utc>;

    /// Rendered report text
    fn content(&self) -> &str;

    /// Registry used by [`Report::export`]
    fn exporters(&self) -> &ExporterRegistry;

    /// Compute any lazily derived state; must be idempotent
    fn finalize_state(&self) {}

    /// Derived state, once finalized
    fn state(&self) -> Option<&ReportState> {
        None
    }

    /// Export through the exporter registered for `format`
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::UnknownFormat`] if no exporter handles `format`
    /// (the report is left untouched), or whatever the exporter reports.
    fn export(&self, format: &str, target: &str) -> ReportResult<()>
    where
        Self: Sized,
    {
        self.exporters().export(self, format, target)
    }
}

/// Report produced by template compilation
#[derive(Debug)]
pub struct TemplateReport {
    id: LocalizedReportIdentifier,
    generation_timestamp: DateTime<Utc>,
    content: String,
    templates: Vec<LocalizedReportIdentifier>,
    exporters: Arc<ExporterRegistry>,
    state: OnceLock<ReportState>,
}

impl TemplateReport {
    /// Create a report
    ///
    /// `templates` lists the identifiers of the templates that were rendered,
    /// in rendering order.
    #[must_use]
    pub fn new(
        id: LocalizedReportIdentifier,
        generation_timestamp: DateTime<Utc>,
        content: String,
        templates: Vec<LocalizedReportIdentifier>,
        exporters: Arc<ExporterRegistry>,
    ) -> Self {
        Self {
            id,
            generation_timestamp,
            content,
            templates,
            exporters,
            state: OnceLock::new(),
        }
    }

    /// Identifiers of the rendered templates, in order
    #[must_use]
    pub fn templates(&self) -> &[LocalizedReportIdentifier] {
        &self.templates
    }

    /// Check whether the state has been finalized
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.state.get().is_some()
    }
}

impl Report for TemplateReport {
    fn id(&self) -> &LocalizedReportIdentifier {
        &self.id
    }

    fn generation_timestamp(&self) -> DateTime<Utc> {
        self.generation_timestamp
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn exporters(&self) -> &ExporterRegistry {
        &self.exporters
    }

    fn finalize_state(&self) {
        let _ = self.state.get_or_init(|| ReportState::of(&self.content));
    }

    fn state(&self) -> Option<&ReportState> {
        self.state.get()
    }
}

impl fmt::Display for TemplateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
