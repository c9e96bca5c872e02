//! Result and error types for probar-report.

use thiserror::Error;

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while aggregating, compiling or exporting reports
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required value was empty, missing or out of range
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// A template is already registered for the identifier
    #[error("Template for identifier {identifier} already added. Will not overwrite existing template.")]
    DuplicateTemplate {
        /// Canonical form of the conflicting identifier
        identifier: String,
    },

    /// An exporter is already registered for the format
    #[error("Could not add exporter since it conflicts with an existing exporter for format [{format}]")]
    DuplicateFormat {
        /// Conflicting format
        format: String,
    },

    /// No exporter is registered for the requested format
    #[error("No exporter supports format [{format}]. Supported formats: {known:?}")]
    UnknownFormat {
        /// Requested format
        format: String,
        /// Formats known to the registry at lookup time
        known: Vec<String>,
    },

    /// Identifier text could not be parsed
    #[error("Incorrect identifier structure. Required format: [id::locale::sequence]. Got: {text} ({reason})")]
    MalformedIdentifierText {
        /// Offending text
        text: String,
        /// What was wrong with it
        reason: String,
    },

    /// An exporter rejected its target
    #[error("Invalid export target [{target}]: {message}")]
    InvalidTarget {
        /// Target as given to the exporter
        target: String,
        /// Error message
        message: String,
    },

    /// Localized resources have no bundle for the locale
    #[error("Could not assign locale [{locale}]. Nonexistent resource?")]
    UnsupportedLocale {
        /// Requested locale
        locale: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ReportError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a malformed identifier text error
    #[must_use]
    pub fn malformed(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifierText {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid target error
    #[must_use]
    pub fn invalid_target(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Fail with [`ReportError::InvalidArgument`] when `value` is empty.
pub(crate) fn require_non_empty(value: &str, name: &str) -> ReportResult<()> {
    if value.is_empty() {
        return Err(ReportError::invalid_argument(format!(
            "Cannot handle empty {name} argument."
        )));
    }
    Ok(())
}
