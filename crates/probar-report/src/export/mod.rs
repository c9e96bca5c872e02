//! Report Exporters
//!
//! Exporters are strategies registered by format name. The registry looks the
//! exporter up, asks the report to finalize its state, and hands it over.
//!
//! ```text
//! report.export("json", "out/") ──► ExporterRegistry::lookup("json")
//!                                     │ UnknownFormat { known: [...] }
//!                                     ▼
//!                           report.finalize_state() ──► JsonFileExporter::export
//! ```

mod json;
mod memory;
mod registry;
mod text;

pub use json::JsonFileExporter;
pub use memory::MemoryExporter;
pub use registry::{ExporterRegistry, ReportExporter};
pub use text::TextFileExporter;

use crate::report::Report;
use crate::result::{ReportError, ReportResult};
use std::path::{Path, PathBuf};

/// Resolve a file target
///
/// An existing directory receives `<id>_<locale>_<sequence>.<extension>`,
/// with path-unsafe characters of the id replaced by `_`; anything else is
/// taken as a file path whose parent must exist.
fn resolve_file_target(report: &dyn Report, target: &str, extension: &str) -> ReportResult<PathBuf> {
    let path = Path::new(target);
    if path.is_dir() {
        let id = report.id();
        return Ok(path.join(format!(
            "{}_{}_{}.{extension}",
            file_name_segment(id.id()),
            id.locale(),
            id.sequence()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(ReportError::invalid_target(
                target,
                format!("parent directory {} does not exist", parent.display()),
            ));
        }
    }
    Ok(path.to_path_buf())
}

/// Keep ASCII alphanumerics, `-`, `_` and `.`; everything else becomes `_`
fn file_name_segment(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_file(target: &str, path: &Path, contents: &str) -> ReportResult<()> {
    std::fs::write(path, contents).map_err(|e| ReportError::invalid_target(target, e.to_string()))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}
