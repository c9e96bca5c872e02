//! Language and region tags for localized report artifacts.
//!
//! Locales render the way resource bundles name them: `sv` or `sv_SE`.
//! Parsing also accepts the BCP 47 hyphen form (`sv-se`) and normalizes case.

use crate::result::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language tag with an optional region
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Create a locale from a language subtag only
    pub fn language(language: &str) -> ReportResult<Self> {
        Ok(Self {
            language: normalize_language(language)?,
            region: None,
        })
    }

    /// Create a locale from language and region subtags
    pub fn new(language: &str, region: &str) -> ReportResult<Self> {
        Ok(Self {
            language: normalize_language(language)?,
            region: Some(normalize_region(region)?),
        })
    }

    /// Parse `sv`, `sv_SE` or `sv-SE` (case-insensitive)
    pub fn parse(text: &str) -> ReportResult<Self> {
        let mut parts = text.split(&['_', '-'][..]);
        let language = parts.next().unwrap_or_default();
        let locale = match (parts.next(), parts.next()) {
            (None, _) => Self::language(language)?,
            (Some(region), None) => Self::new(language, region)?,
            (Some(_), Some(_)) => {
                return Err(ReportError::invalid_argument(format!(
                    "Locale [{text}] has more than two subtags"
                )))
            }
        };
        Ok(locale)
    }

    /// Primary language subtag (lowercase)
    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language
    }

    /// Region subtag (uppercase), if any
    #[must_use]
    pub fn region_code(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Check whether both locales share the primary language subtag
    #[must_use]
    pub fn same_language(&self, other: &Self) -> bool {
        self.language == other.language
    }

    /// The language-only locale this one falls back to
    #[must_use]
    pub fn without_region(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }
}

fn normalize_language(language: &str) -> ReportResult<String> {
    if language.is_empty() {
        return Err(ReportError::invalid_argument(
            "Cannot handle empty locale language argument.",
        ));
    }
    if !(2..=8).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ReportError::invalid_argument(format!(
            "Locale language [{language}] must be 2-8 ASCII letters"
        )));
    }
    Ok(language.to_ascii_lowercase())
}

fn normalize_region(region: &str) -> ReportResult<String> {
    let alpha = region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic());
    let numeric = region.len() == 3 && region.chars().all(|c| c.is_ascii_digit());
    if !alpha && !numeric {
        return Err(ReportError::invalid_argument(format!(
            "Locale region [{region}] must be 2 ASCII letters or 3 digits"
        )));
    }
    Ok(region.to_ascii_uppercase())
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}_{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}
