//! Format → exporter dispatch.

use super::{JsonFileExporter, TextFileExporter};
use crate::report::Report;
use crate::result::{require_non_empty, ReportError, ReportResult};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Strategy writing a report to an external target under one format
pub trait ReportExporter: fmt::Debug + Send + Sync {
    /// Format name this exporter is registered under
    fn format(&self) -> &str;

    /// Write the report to `target`
    ///
    /// The exporter decides what `target` means: a file path, a directory or
    /// a logical sink name.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidTarget`] if the target cannot be written.
    fn export(&self, report: &dyn Report, target: &str) -> ReportResult<()>;
}

/// Registry of exporters, unique by format
#[derive(Default)]
pub struct ExporterRegistry {
    exporters: BTreeMap<String, Arc<dyn ReportExporter>>,
}

impl ExporterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled `text` and `json` exporters
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_exporters([
            Arc::new(TextFileExporter::new()) as Arc<dyn ReportExporter>,
            Arc::new(JsonFileExporter::new()),
        ])
    }

    /// Create a registry from exporters; a later exporter replaces an
    /// earlier one of the same format
    pub fn from_exporters<I>(exporters: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ReportExporter>>,
    {
        let exporters = exporters
            .into_iter()
            .map(|exporter| (exporter.format().to_string(), exporter))
            .collect();
        Self { exporters }
    }

    /// Register an exporter under its format
    ///
    /// # Errors
    ///
    /// [`ReportError::DuplicateFormat`] if the format is taken and
    /// `overwrite_existing` is false; [`ReportError::InvalidArgument`] if the
    /// exporter reports an empty format.
    pub fn register(&mut self, exporter: Arc<dyn ReportExporter>, overwrite_existing: bool) -> ReportResult<()> {
        let format = exporter.format().to_string();
        require_non_empty(&format, "exporter format")?;

        if self.exporters.contains_key(&format) && !overwrite_existing {
            return Err(ReportError::DuplicateFormat { format });
        }

        tracing::debug!(format = %format, exporter = ?exporter, "exporter registered");
        let _ = self.exporters.insert(format, exporter);
        Ok(())
    }

    /// Exporter registered for `format`
    ///
    /// # Errors
    ///
    /// [`ReportError::UnknownFormat`] carrying the known formats.
    pub fn lookup(&self, format: &str) -> ReportResult<Arc<dyn ReportExporter>> {
        require_non_empty(format, "format")?;
        self.exporters.get(format).cloned().ok_or_else(|| ReportError::UnknownFormat {
            format: format.to_string(),
            known: self.formats().map(String::from).collect(),
        })
    }

    /// Look up the exporter, finalize the report, then export it
    ///
    /// Nothing about the report is touched unless the lookup succeeds.
    pub fn export(&self, report: &dyn Report, format: &str, target: &str) -> ReportResult<()> {
        require_non_empty(target, "target")?;
        let exporter = self.lookup(format)?;

        report.finalize_state();
        tracing::debug!(report = %report.id(), format, target, "exporting report");
        exporter.export(report, target)
    }

    /// Known formats in sorted order
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.exporters.keys().map(String::as_str)
    }

    /// Check whether a format has an exporter
    #[must_use]
    pub fn contains(&self, format: &str) -> bool {
        self.exporters.contains_key(format)
    }

    /// Number of registered exporters
    #[must_use]
    pub fn len(&self) -> usize {
        self.exporters.len()
    }

    /// Check whether no exporter is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }
}

impl fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExporterRegistry")
            .field("formats", &self.formats().collect::<Vec<_>>())
            .finish()
    }
}
