//! Probar Report: localized coverage report generation
//!
//! Aggregates location-keyed coverage records (or plain string tokens) under
//! scope ids, compiles them against localized `${token}` templates, and
//! exports the finished report through a registry of format writers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  PROBAR-REPORT Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Producers  │    │ Aggregator │    │ Template   │            │
//! │   │ add_data() │───►│ scope→data │───►│ Compiler   │            │
//! │   └────────────┘    └────────────┘    └─────┬──────┘            │
//! │                                             ▼                   │
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ text/json/ │◄───│ Exporter   │◄───│ Report     │            │
//! │   │ memory     │    │ Registry   │    │ export()   │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use probar_report::{
//!     CoverageRecord, CoverageReportGenerator, Report, ReportGenerator, SourceLocation,
//!     LocalizedReportIdentifier,
//! };
//!
//! let mut generator = CoverageReportGenerator::new();
//! let location = SourceLocation::new("app", "Parser", "parse()", 42, 0)?;
//! generator.add_data("classCoverage", CoverageRecord::new(location.clone(), 2))?;
//! generator.add_data("classCoverage", CoverageRecord::new(location, 3))?;
//! generator.add_template(
//!     LocalizedReportIdentifier::parse("[classCoverage::en::0]")?,
//!     "Covered ${covered} of ${locations}: ${records}",
//! )?;
//!
//! let report = generator.compile_report_str("[classCoverage::en_GB::0]")?;
//! assert_eq!(report.content(), "Covered 1 of 1: [app.Parser::parse(),line:42,segment:0: 5]");
//! # Ok::<(), probar_report::ReportError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod aggregator;
mod config;
mod generator;
mod identifier;
mod locale;
mod localizable;
mod report;
mod result;

/// Location-keyed coverage records and their merge policy
#[allow(clippy::cast_precision_loss)]
pub mod coverage;

/// Format exporters and their registry
#[allow(clippy::missing_errors_doc)]
pub mod export;

/// Tracing subscriber setup
pub mod logging;

/// Template selection and placeholder rendering
pub mod template;

pub use aggregator::{Aggregator, ScopeData, TokenMap};
pub use config::{GeneratorConfig, GeneratorConfigBuilder, LocaleMatch, UnresolvedTokens};
pub use coverage::{CoverageRecord, CoverageRecords, CoverageSummary, SourceLocation};
pub use export::{ExporterRegistry, JsonFileExporter, MemoryExporter, ReportExporter, TextFileExporter};
pub use generator::{
    CoverageReportGenerator, ReportGenerator, StringTemplateReportGenerator, TemplateReportGenerator,
};
pub use identifier::LocalizedReportIdentifier;
pub use locale::Locale;
pub use localizable::{LocalResources, LocalizableReport, MapResources, NAME_KEY};
pub use report::{Report, ReportState, TemplateReport};
pub use result::{ReportError, ReportResult};
pub use template::{SelectedTemplate, TemplateCompiler, TemplateStore};
