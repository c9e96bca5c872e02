//! Report Generators
//!
//! A generator owns the scope data pushed by producers and the templates
//! registered for report identifiers. Compiling an identifier selects the
//! applicable templates, resolves the tokens of the scope named by the
//! identifier's id and renders them into a [`TemplateReport`].
//!
//! ```text
//! add_data(scope, record) ──► Aggregator<D>
//! add_template(id, text)  ──► TemplateStore
//!
//! compile_report(id) ──► select(id) ──► render(tokens(id.id())) ──► TemplateReport
//! ```

use crate::aggregator::{Aggregator, ScopeData, TokenMap};
use crate::config::GeneratorConfig;
use crate::coverage::CoverageRecords;
use crate::export::ExporterRegistry;
use crate::identifier::LocalizedReportIdentifier;
use crate::report::{Report, TemplateReport};
use crate::result::ReportResult;
use crate::template::{SelectedTemplate, TemplateCompiler, TemplateStore};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Aggregates data and compiles it into reports
pub trait ReportGenerator {
    /// Record type accepted from producers
    type Data;

    /// Report type produced by compilation
    type Output: Report;

    /// Merge one record into a scope
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] for an empty scope id or a
    /// rejected record.
    fn add_data(&mut self, scope_id: &str, data: Self::Data) -> ReportResult<()>;

    /// Register a template; existing templates are never overwritten
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::DuplicateTemplate`] if the identifier is taken.
    fn add_template(&mut self, identifier: LocalizedReportIdentifier, template: &str) -> ReportResult<()>;

    /// Compile the report for `identifier`
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] if no template applies.
    fn compile_report(&self, identifier: &LocalizedReportIdentifier) -> ReportResult<Self::Output>;
}

/// Template substitution generator over any [`ScopeData`]
#[derive(Debug)]
pub struct TemplateReportGenerator<D> {
    aggregator: Aggregator<D>,
    templates: TemplateStore,
    compiler: TemplateCompiler,
    config: GeneratorConfig,
    exporters: Arc<ExporterRegistry>,
}

/// Generator aggregating location-keyed hit counts
pub type CoverageReportGenerator = TemplateReportGenerator<CoverageRecords>;

/// Generator aggregating plain string tokens
pub type StringTemplateReportGenerator = TemplateReportGenerator<TokenMap>;

impl<D: ScopeData> Default for TemplateReportGenerator<D> {
    fn default() -> Self {
        Self::from_parts(
            GeneratorConfig::default(),
            TemplateCompiler::default(),
            Arc::new(ExporterRegistry::with_defaults()),
        )
    }
}

impl<D: ScopeData> TemplateReportGenerator<D> {
    /// Create a generator with default config and the bundled exporters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator from a configuration
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] if the config is invalid.
    pub fn with_config(config: GeneratorConfig) -> ReportResult<Self> {
        let compiler = TemplateCompiler::from_config(&config)?;
        Ok(Self::from_parts(config, compiler, Arc::new(ExporterRegistry::with_defaults())))
    }

    fn from_parts(config: GeneratorConfig, compiler: TemplateCompiler, exporters: Arc<ExporterRegistry>) -> Self {
        Self {
            aggregator: Aggregator::new(),
            templates: TemplateStore::new(),
            compiler,
            config,
            exporters,
        }
    }

    /// Share `exporters` with every report compiled from now on
    #[must_use]
    pub fn with_exporters(mut self, exporters: Arc<ExporterRegistry>) -> Self {
        self.exporters = exporters;
        self
    }

    /// Stamp compiled reports with a fixed generation time
    #[must_use]
    pub fn with_generation_time(mut self, time: DateTime<Utc>) -> Self {
        self.config.generation_time = Some(time);
        self
    }

    /// Merge a batch of records into a scope, all or nothing
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] for an empty scope id, an empty
    /// batch or any rejected record.
    pub fn add_all<I>(&mut self, scope_id: &str, records: I) -> ReportResult<()>
    where
        I: IntoIterator<Item = D::Record>,
    {
        self.aggregator.add_all(scope_id, records)
    }

    /// Fold another generator's scope data into this one
    ///
    /// Templates of `other` are ignored.
    pub fn merge_data(&mut self, other: Self) {
        self.aggregator.merge_from(other.aggregator);
    }

    /// Tokens of a scope; an unknown scope yields an empty map
    #[must_use]
    pub fn resolve_tokens(&self, scope_id: &str) -> Cow<'_, TokenMap> {
        self.aggregator.tokens(scope_id)
    }

    /// Templates that apply to `identifier`, in sequence order
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] if none applies.
    pub fn select_templates(&self, identifier: &LocalizedReportIdentifier) -> ReportResult<Vec<SelectedTemplate<'_>>> {
        self.templates.select(identifier, self.config.locale_match)
    }

    /// Parse `identifier` and compile its report
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] for empty text or when no
    /// template applies; [`crate::ReportError::MalformedIdentifierText`] if
    /// the text does not parse.
    pub fn compile_report_str(&self, identifier: &str) -> ReportResult<TemplateReport> {
        let identifier = LocalizedReportIdentifier::parse(identifier)?;
        self.compile_report(&identifier)
    }

    /// Aggregated scope data
    #[must_use]
    pub fn aggregator(&self) -> &Aggregator<D> {
        &self.aggregator
    }

    /// Registered templates
    #[must_use]
    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl StringTemplateReportGenerator {
    /// Set one token in a scope
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] for an empty scope id or key.
    pub fn add_token(&mut self, scope_id: &str, key: impl Into<String>, value: impl Into<String>) -> ReportResult<()> {
        self.aggregator.add_data(scope_id, (key.into(), value.into()))
    }

    /// Put all tokens into a scope; later values replace earlier ones
    ///
    /// # Errors
    ///
    /// [`crate::ReportError::InvalidArgument`] for an empty scope id, no
    /// tokens, or an empty key.
    pub fn add_tokens<I, K, V>(&mut self, scope_id: &str, tokens: I) -> ReportResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aggregator
            .add_all(scope_id, tokens.into_iter().map(|(k, v)| (k.into(), v.into())))
    }
}

impl<D: ScopeData> ReportGenerator for TemplateReportGenerator<D> {
    type Data = D::Record;
    type Output = TemplateReport;

    fn add_data(&mut self, scope_id: &str, data: Self::Data) -> ReportResult<()> {
        self.aggregator.add_data(scope_id, data)
    }

    fn add_template(&mut self, identifier: LocalizedReportIdentifier, template: &str) -> ReportResult<()> {
        self.templates.add(identifier, template)
    }

    fn compile_report(&self, identifier: &LocalizedReportIdentifier) -> ReportResult<TemplateReport> {
        let selected = self.select_templates(identifier)?;
        let tokens = self.resolve_tokens(identifier.id());
        let content = self.compiler.compile(&selected, &tokens);
        let rendered: Vec<LocalizedReportIdentifier> =
            selected.iter().map(|template| template.identifier.clone()).collect();

        tracing::debug!(
            report = %identifier,
            templates = rendered.len(),
            tokens = tokens.len(),
            bytes = content.len(),
            "report compiled"
        );

        Ok(TemplateReport::new(
            identifier.clone(),
            self.config.generation_time.unwrap_or_else(Utc::now),
            content,
            rendered,
            Arc::clone(&self.exporters),
        ))
    }
}

impl<D: ScopeData + fmt::Display> fmt::Display for TemplateReportGenerator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "TemplateReportGenerator held ({}) templates for the following identifiers:",
            self.templates.len()
        )?;
        let identifiers: Vec<&str> = self
            .templates
            .identifiers()
            .map(LocalizedReportIdentifier::canonical_string)
            .collect();
        writeln!(f, " [{}]", identifiers.join(", "))?;
        writeln!(f, "The following tokens were known:")?;
        write!(f, "{}", self.aggregator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{CoverageRecord, SourceLocation};
    use crate::export::MemoryExporter;
    use crate::locale::Locale;
    use crate::result::ReportError;
    use chrono::TimeZone;

    fn id(text: &str) -> LocalizedReportIdentifier {
        LocalizedReportIdentifier::parse(text).unwrap()
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 12, 17, 0, 7, 0).unwrap()
    }

    fn location(line: u32) -> SourceLocation {
        SourceLocation::new(
            "net.sourceforge.cobertura.reporting.api",
            "LocalizedReportIdentifier",
            "toString()",
            line,
            0,
        )
        .unwrap()
    }

    mod string_template_tests {
        use super::*;

        #[test]
        fn test_single_token_replaced() {
            let mut generator = StringTemplateReportGenerator::new();
            generator.add_token("classCoverage", "foo_1", "bar_1").unwrap();
            generator.add_template(id("[classCoverage::sv_SE::0]"), "Line: ${foo_1}").unwrap();

            let report = generator.compile_report(&id("[classCoverage::sv_SE::0]")).unwrap();
            assert_eq!(report.content(), "Line: bar_1");
        }

        #[test]
        fn test_templates_concatenated_in_sequence_order() {
            let mut generator = StringTemplateReportGenerator::new();
            generator
                .add_tokens("classCoverage", (0..10).map(|i| (format!("foo_{i}"), format!("bar_{i}"))))
                .unwrap();
            generator
                .add_template(id("[classCoverage::sv_SE::1]"), "Line 3: ${foo_3}\nLine 4: ${foo_4}\n")
                .unwrap();
            generator
                .add_template(id("[classCoverage::sv_SE::0]"), "Line 1: ${foo_1}\nLine 2: ${foo_2}\n")
                .unwrap();

            let report = generator.compile_report_str("[classCoverage::sv_SE::0]").unwrap();
            assert_eq!(
                report.content(),
                "Line 1: bar_1\nLine 2: bar_2\nLine 3: bar_3\nLine 4: bar_4\n"
            );
            assert_eq!(
                report.templates(),
                &[id("[classCoverage::sv_SE::0]"), id("[classCoverage::sv_SE::1]")]
            );
        }

        #[test]
        fn test_unknown_scope_leaves_placeholders() {
            let mut generator = StringTemplateReportGenerator::new();
            generator.add_token("other", "foo", "bar").unwrap();
            generator.add_template(id("[report::en::0]"), "${foo}").unwrap();
            let report = generator.compile_report(&id("[report::en::0]")).unwrap();
            assert_eq!(report.content(), "${foo}");
        }

        #[test]
        fn test_later_tokens_overwrite() {
            let mut generator = StringTemplateReportGenerator::new();
            generator.add_tokens("r", [("a", "1"), ("b", "2")]).unwrap();
            generator.add_tokens("r", [("a", "3")]).unwrap();
            assert_eq!(generator.resolve_tokens("r").get("a"), Some("3"));
            assert_eq!(generator.resolve_tokens("r").get("b"), Some("2"));
        }

        #[test]
        fn test_empty_token_batch_rejected() {
            let mut generator = StringTemplateReportGenerator::new();
            let err = generator.add_tokens("r", Vec::<(String, String)>::new()).unwrap_err();
            assert!(matches!(err, ReportError::InvalidArgument { .. }));
        }

        #[test]
        fn test_duplicate_template_keeps_first() {
            let mut generator = StringTemplateReportGenerator::new();
            generator.add_template(id("[r::en::0]"), "first").unwrap();
            let err = generator.add_template(id("[r::en::0]"), "second").unwrap_err();
            assert!(matches!(err, ReportError::DuplicateTemplate { .. }));
            assert_eq!(generator.compile_report_str("[r::en::0]").unwrap().content(), "first");
        }

        #[test]
        fn test_no_template_is_invalid_argument() {
            let generator = StringTemplateReportGenerator::new();
            let err = generator.compile_report(&id("[r::en::0]")).unwrap_err();
            assert!(matches!(err, ReportError::InvalidArgument { .. }));
        }

        #[test]
        fn test_compile_report_str_rejects_empty_and_malformed() {
            let generator = StringTemplateReportGenerator::new();
            assert!(matches!(
                generator.compile_report_str("").unwrap_err(),
                ReportError::InvalidArgument { .. }
            ));
            assert!(matches!(
                generator.compile_report_str("[r::en]").unwrap_err(),
                ReportError::MalformedIdentifierText { .. }
            ));
        }

        #[test]
        fn test_compilation_is_deterministic() {
            let mut generator = StringTemplateReportGenerator::new().with_generation_time(fixed_time());
            generator.add_tokens("r", [("x", "1"), ("y", "2")]).unwrap();
            generator.add_template(id("[r::en::1]"), "${y}").unwrap();
            generator.add_template(id("[r::en_US::0]"), "${x}").unwrap();

            let first = generator.compile_report_str("[r::en_GB::0]").unwrap();
            let second = generator.compile_report_str("[r::en_GB::0]").unwrap();
            assert_eq!(first.content(), "12");
            assert_eq!(first.content(), second.content());
            assert_eq!(first.templates(), second.templates());
            assert_eq!(first.generation_timestamp(), second.generation_timestamp());
        }

        #[test]
        fn test_exact_locale_config() {
            let config = GeneratorConfig::builder()
                .locale_match(crate::config::LocaleMatch::Exact)
                .build()
                .unwrap();
            let mut generator = StringTemplateReportGenerator::with_config(config).unwrap();
            generator.add_template(id("[r::en_US::0]"), "us").unwrap();
            assert!(generator.compile_report_str("[r::en_GB::0]").is_err());
            assert_eq!(generator.compile_report_str("[r::en_US::0]").unwrap().content(), "us");
        }

        #[test]
        fn test_config_with_empty_delimiters_rejected() {
            let config = GeneratorConfig {
                placeholder_prefix: String::new(),
                placeholder_suffix: String::new(),
                ..GeneratorConfig::default()
            };
            let err = StringTemplateReportGenerator::with_config(config).unwrap_err();
            assert!(matches!(err, ReportError::InvalidArgument { .. }));
        }

        #[test]
        fn test_display_summarises_state() {
            let mut generator = StringTemplateReportGenerator::new();
            generator.add_token("classCoverage", "foo_1", "bar_1").unwrap();
            generator.add_template(id("[classCoverage::sv_SE::0]"), "x").unwrap();
            assert_eq!(
                generator.to_string(),
                "TemplateReportGenerator held (1) templates for the following identifiers:\n \
                 [[classCoverage::sv_SE::0]]\n\
                 The following tokens were known:\n\
                 {classCoverage={foo_1=bar_1}}"
            );
        }
    }

    mod coverage_tests {
        use super::*;

        #[test]
        fn test_adding_data_compiles_locations() {
            let swedish = Locale::new("sv", "se").unwrap();
            let test_id = LocalizedReportIdentifier::new("testId", swedish).unwrap();
            let mut generator = CoverageReportGenerator::new().with_generation_time(fixed_time());
            generator.add_template(test_id.clone(), "${records}").unwrap();

            for i in 0..10_u32 {
                generator
                    .add_data("testId", CoverageRecord::new(location(109 + i), u64::from(i % 4 * 2)))
                    .unwrap();
            }

            let report = generator.compile_report(&test_id).unwrap();
            assert_eq!(report.generation_timestamp(), fixed_time());
            assert_eq!(report.id(), &test_id);
            assert!(report.content().contains(
                "net.sourceforge.cobertura.reporting.api.LocalizedReportIdentifier::toString(),line:109,segment:0: 0"
            ));
            assert_eq!(generator.aggregator().scope("testId").unwrap().len(), 10);
        }

        #[test]
        fn test_same_location_hits_are_summed() {
            let test_id = LocalizedReportIdentifier::new("testId", Locale::new("sv", "SE").unwrap()).unwrap();
            let mut generator = CoverageReportGenerator::new();
            generator.add_template(test_id.clone(), "${records}").unwrap();
            for hits in [2, 3, 4, 5, 6] {
                generator.add_data("testId", CoverageRecord::new(location(109), hits)).unwrap();
            }

            assert_eq!(
                generator.aggregator().to_string(),
                "{testId=[net.sourceforge.cobertura.reporting.api.\
                 LocalizedReportIdentifier::toString(),line:109,segment:0: 20]}"
            );
            let report = generator.compile_report(&test_id).unwrap();
            assert!(report.content().ends_with("segment:0: 20]"));
        }

        #[test]
        fn test_summary_tokens() {
            let mut generator = CoverageReportGenerator::new();
            generator
                .add_all("cov", [CoverageRecord::new(location(1), 0), CoverageRecord::new(location(2), 3)])
                .unwrap();
            generator
                .add_template(id("[cov::en::0]"), "${covered}/${locations} (${coverage_percent}%)")
                .unwrap();
            let report = generator.compile_report_str("[cov::en::0]").unwrap();
            assert_eq!(report.content(), "1/2 (50.0%)");
        }

        #[test]
        fn test_merge_data_from_workers() {
            let mut main = CoverageReportGenerator::new();
            main.add_data("cov", CoverageRecord::new(location(5), 1)).unwrap();
            let mut worker = CoverageReportGenerator::new();
            worker.add_data("cov", CoverageRecord::new(location(5), 2)).unwrap();
            worker.add_data("cov", CoverageRecord::new(location(6), 1)).unwrap();

            main.merge_data(worker);
            let records = main.aggregator().scope("cov").unwrap();
            assert_eq!(records.hit_count(&location(5)), Some(3));
            assert_eq!(records.len(), 2);
        }

        #[test]
        fn test_compiled_report_uses_shared_exporters() {
            let memory = Arc::new(MemoryExporter::new());
            let mut registry = ExporterRegistry::new();
            registry.register(memory.clone(), false).unwrap();

            let mut generator = CoverageReportGenerator::new().with_exporters(Arc::new(registry));
            generator.add_data("cov", CoverageRecord::new(location(7), 4)).unwrap();
            generator.add_template(id("[cov::en::0]"), "hits=${hits}").unwrap();

            let report = generator.compile_report_str("[cov::en::0]").unwrap();
            report.export("memory", "sink").unwrap();
            assert_eq!(memory.get("sink").as_deref(), Some("hits=4"));
        }
    }
}
