//! Localized Report Identifiers
//!
//! A [`LocalizedReportIdentifier`] names one localized, possibly multi-part
//! template artifact: `{id, locale, sequence}`. Its canonical text form
//!
//! ```text
//! [classCoverage::sv_SE::0]
//! ```
//!
//! is used for display, for round-trip parsing, and as the sole basis of
//! equality, hashing and ordering.

use crate::locale::Locale;
use crate::result::{require_non_empty, ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Identifier for a localized report artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalizedReportIdentifier {
    id: String,
    locale: Locale,
    sequence: u32,
    canonical: String,
}

impl LocalizedReportIdentifier {
    /// Separator between the id, locale and sequence segments
    pub const SEPARATOR: &'static str = "::";

    /// Create an identifier with sequence 0
    pub fn new(id: impl Into<String>, locale: Locale) -> ReportResult<Self> {
        Self::with_sequence(id, locale, 0)
    }

    /// Create an identifier with an explicit sequence
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidArgument`] if `id` is empty, contains the
    /// separator or ends with `:`, or if `sequence` is negative or exceeds
    /// `u32::MAX`.
    pub fn with_sequence(id: impl Into<String>, locale: Locale, sequence: i64) -> ReportResult<Self> {
        let id = id.into();
        require_non_empty(&id, "id")?;
        // A trailing ':' would merge with the following separator
        if id.contains(Self::SEPARATOR) || id.ends_with(':') {
            return Err(ReportError::invalid_argument(format!(
                "Identifier id [{id}] must not contain '{}' or end with ':'",
                Self::SEPARATOR
            )));
        }
        let sequence = u32::try_from(sequence).map_err(|_| {
            ReportError::invalid_argument(format!(
                "Cannot handle negative or oversized sequence argument ({sequence})."
            ))
        })?;

        let canonical = format!(
            "[{id}{sep}{locale}{sep}{sequence}]",
            sep = Self::SEPARATOR
        );
        Ok(Self {
            id,
            locale,
            sequence,
            canonical,
        })
    }

    /// Parse the canonical `[id::locale::sequence]` form
    ///
    /// The leading `[` and trailing `]` are optional.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidArgument`] for empty input;
    /// [`ReportError::MalformedIdentifierText`] unless the text holds exactly
    /// two separators around non-empty, valid segments.
    pub fn parse(text: &str) -> ReportResult<Self> {
        require_non_empty(text, "identifier text")?;

        let body = text.strip_prefix('[').unwrap_or(text);
        let body = body.strip_suffix(']').unwrap_or(body);

        let segments: Vec<&str> = body.split(Self::SEPARATOR).collect();
        let [id, locale, sequence] = segments.as_slice() else {
            return Err(ReportError::malformed(
                text,
                format!(
                    "expected exactly two '{}' separators, found {}",
                    Self::SEPARATOR,
                    segments.len().saturating_sub(1)
                ),
            ));
        };

        if id.is_empty() || locale.is_empty() || sequence.is_empty() {
            return Err(ReportError::malformed(text, "empty segment"));
        }

        let locale = Locale::parse(locale).map_err(|e| ReportError::malformed(text, e.to_string()))?;
        let sequence: u32 = sequence
            .parse()
            .map_err(|_| ReportError::malformed(text, format!("sequence [{sequence}] is not a non-negative integer")))?;

        Self::with_sequence(*id, locale, i64::from(sequence))
            .map_err(|e| ReportError::malformed(text, e.to_string()))
    }

    /// The logical id, also used as the scope id for data lookup
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Locale of this artifact
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Position of this part among parts sharing id and language
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Canonical `[id::locale::sequence]` text
    #[must_use]
    pub fn canonical_string(&self) -> &str {
        &self.canonical
    }

    /// Compare against a possibly absent identifier; absence sorts first
    #[must_use]
    pub fn compare_optional(&self, other: Option<&Self>) -> Ordering {
        other.map_or(Ordering::Greater, |that| self.cmp(that))
    }
}

impl PartialEq for LocalizedReportIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for LocalizedReportIdentifier {}

impl Hash for LocalizedReportIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for LocalizedReportIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocalizedReportIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for LocalizedReportIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for LocalizedReportIdentifier {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocalizedReportIdentifier {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocalizedReportIdentifier> for String {
    fn from(identifier: LocalizedReportIdentifier) -> Self {
        identifier.canonical
    }
}
