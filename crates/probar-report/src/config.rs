//! Generator configuration
//!
//! Configuration can be built in code or loaded from YAML/JSON:
//!
//! ```yaml
//! placeholder_prefix: "${"
//! placeholder_suffix: "}"
//! unresolved: verbatim      # or: blank
//! locale_match: language    # or: exact
//! generation_time: 2013-12-17T00:07:00Z
//! ```

use crate::result::{require_non_empty, ReportResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to render for a placeholder whose token is unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedTokens {
    /// Keep the placeholder text as-is (aids debugging)
    #[default]
    Verbatim,
    /// Replace the placeholder with nothing
    Blank,
}

/// How a template's locale must relate to the requested locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleMatch {
    /// Primary language subtag must match; region is ignored
    #[default]
    Language,
    /// Language and region must both match
    Exact,
}

/// Template report generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Opening placeholder delimiter
    pub placeholder_prefix: String,
    /// Closing placeholder delimiter
    pub placeholder_suffix: String,
    /// Rendering of unknown tokens
    pub unresolved: UnresolvedTokens,
    /// Template selection rule
    pub locale_match: LocaleMatch,
    /// Fixed generation timestamp (defaults to the time of compilation)
    pub generation_time: Option<DateTime<Utc>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            placeholder_prefix: "${".to_string(),
            placeholder_suffix: "}".to_string(),
            unresolved: UnresolvedTokens::Verbatim,
            locale_match: LocaleMatch::Language,
            generation_time: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a builder for generator config
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Load configuration from YAML
    pub fn from_yaml_str(yaml: &str) -> ReportResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that placeholder delimiters are usable
    pub fn validate(&self) -> ReportResult<()> {
        require_non_empty(&self.placeholder_prefix, "placeholder_prefix")?;
        require_non_empty(&self.placeholder_suffix, "placeholder_suffix")
    }
}

/// Builder for generator configuration
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Set the placeholder delimiters
    #[must_use]
    pub fn placeholders(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.config.placeholder_prefix = prefix.into();
        self.config.placeholder_suffix = suffix.into();
        self
    }

    /// Set the rendering of unknown tokens
    #[must_use]
    pub fn unresolved(mut self, unresolved: UnresolvedTokens) -> Self {
        self.config.unresolved = unresolved;
        self
    }

    /// Set the template selection rule
    #[must_use]
    pub fn locale_match(mut self, locale_match: LocaleMatch) -> Self {
        self.config.locale_match = locale_match;
        self
    }

    /// Fix the generation timestamp of compiled reports
    #[must_use]
    pub fn generation_time(mut self, time: DateTime<Utc>) -> Self {
        self.config.generation_time = Some(time);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> ReportResult<GeneratorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
