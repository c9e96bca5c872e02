//! Localizable Reports
//!
//! Wraps a compiled report so that its display name (and any other keyed
//! text) comes from per-locale resource bundles. The active locale can be
//! switched at runtime; it is the only mutable state and sits behind a mutex.

use crate::export::ExporterRegistry;
use crate::identifier::LocalizedReportIdentifier;
use crate::locale::Locale;
use crate::report::{Report, ReportState};
use crate::result::{ReportError, ReportResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Key holding a report's localized name
pub const NAME_KEY: &str = "name";

/// Source of localized strings
pub trait LocalResources: fmt::Debug + Send + Sync {
    /// Value of `key` for `locale`, if any
    fn localized(&self, key: &str, locale: &Locale) -> Option<String>;

    /// Check whether a bundle exists for `locale`
    fn supports(&self, locale: &Locale) -> bool;
}

/// In-memory resource bundles keyed by locale
///
/// A lookup for `sv_SE` that misses falls back to the `sv` bundle.
#[derive(Debug, Clone, Default)]
pub struct MapResources {
    bundles: BTreeMap<Locale, BTreeMap<String, String>>,
}

impl MapResources {
    /// Create empty resources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry in a locale's bundle
    #[must_use]
    pub fn with(mut self, locale: &Locale, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(locale, key, value);
        self
    }

    /// Add or replace one entry in a locale's bundle
    pub fn insert(&mut self, locale: &Locale, key: impl Into<String>, value: impl Into<String>) {
        let _ = self
            .bundles
            .entry(locale.clone())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Locales with a bundle, sorted
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.bundles.keys()
    }
}

impl LocalResources for MapResources {
    fn localized(&self, key: &str, locale: &Locale) -> Option<String> {
        let lookup = |locale: &Locale| self.bundles.get(locale).and_then(|bundle| bundle.get(key)).cloned();
        lookup(locale).or_else(|| {
            locale
                .region_code()
                .and_then(|_| lookup(&locale.without_region()))
        })
    }

    fn supports(&self, locale: &Locale) -> bool {
        self.bundles.contains_key(locale) || self.bundles.contains_key(&locale.without_region())
    }
}

/// A report whose name and texts follow a switchable locale
pub struct LocalizableReport<R, S> {
    inner: R,
    resources: S,
    active_locale: Mutex<Locale>,
}

impl<R: Report, S: LocalResources> LocalizableReport<R, S> {
    /// Wrap a report, activating `locale`
    ///
    /// # Errors
    ///
    /// [`ReportError::UnsupportedLocale`] if the resources have no bundle for
    /// `locale`; [`ReportError::InvalidArgument`] if they define no non-empty
    /// `name` for it.
    pub fn new(inner: R, resources: S, locale: Locale) -> ReportResult<Self> {
        if !resources.supports(&locale) {
            return Err(ReportError::UnsupportedLocale {
                locale: locale.to_string(),
            });
        }
        let has_name = resources
            .localized(NAME_KEY, &locale)
            .is_some_and(|name| !name.is_empty());
        if !has_name {
            return Err(ReportError::invalid_argument(format!(
                "Property '{NAME_KEY}' must be defined within the resources for [{locale}]"
            )));
        }

        Ok(Self {
            inner,
            resources,
            active_locale: Mutex::new(locale),
        })
    }

    /// Switch the active locale
    ///
    /// # Errors
    ///
    /// [`ReportError::UnsupportedLocale`] if no bundle exists; the active
    /// locale is left unchanged.
    pub fn set_locale(&self, locale: Locale) -> ReportResult<()> {
        let mut active = self.active_locale.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.resources.supports(&locale) {
            return Err(ReportError::UnsupportedLocale {
                locale: locale.to_string(),
            });
        }
        tracing::debug!(report = %self.inner.id(), from = %*active, to = %locale, "locale switched");
        *active = locale;
        Ok(())
    }

    /// Currently active locale
    #[must_use]
    pub fn locale(&self) -> Locale {
        self.active_locale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Localized text for `key` under the active locale
    #[must_use]
    pub fn localized(&self, key: &str) -> Option<String> {
        self.resources.localized(key, &self.locale())
    }

    /// Wrapped report
    #[must_use]
    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Report, S: LocalResources> Report for LocalizableReport<R, S> {
    fn id(&self) -> &LocalizedReportIdentifier {
        self.inner.id()
    }

    fn name(&self) -> String {
        self.localized(NAME_KEY)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.inner.name())
    }

    fn generation_timestamp(&self) -> DateTime<Utc> {
        self.inner.generation_timestamp()
    }

    fn content(&self) -> &str {
        self.inner.content()
    }

    fn exporters(&self) -> &ExporterRegistry {
        self.inner.exporters()
    }

    fn finalize_state(&self) {
        self.inner.finalize_state();
    }

    fn state(&self) -> Option<&ReportState> {
        self.inner.state()
    }
}

impl<R: fmt::Debug, S: fmt::Debug> fmt::Debug for LocalizableReport<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let locale = self
            .active_locale
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        f.debug_struct("LocalizableReport")
            .field("inner", &self.inner)
            .field("resources", &self.resources)
            .field("active_locale", &locale)
            .finish()
    }
}
