//! Template registration and selection.

use crate::config::LocaleMatch;
use crate::identifier::LocalizedReportIdentifier;
use crate::result::{require_non_empty, ReportError, ReportResult};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// A template chosen for compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedTemplate<'a> {
    /// Identifier the template was registered under
    pub identifier: &'a LocalizedReportIdentifier,
    /// Raw template text
    pub text: &'a str,
}

/// Identifier → raw template text, never silently overwritten
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: BTreeMap<LocalizedReportIdentifier, String>,
}

impl TemplateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    ///
    /// # Errors
    ///
    /// [`ReportError::DuplicateTemplate`] if the identifier already holds a
    /// template (the existing one is kept); [`ReportError::InvalidArgument`]
    /// for empty template text.
    pub fn add(&mut self, identifier: LocalizedReportIdentifier, text: impl Into<String>) -> ReportResult<()> {
        let text = text.into();
        require_non_empty(&text, "template")?;

        match self.templates.entry(identifier) {
            btree_map::Entry::Occupied(existing) => Err(ReportError::DuplicateTemplate {
                identifier: existing.key().to_string(),
            }),
            btree_map::Entry::Vacant(slot) => {
                tracing::debug!(identifier = %slot.key(), bytes = text.len(), "template registered");
                let _ = slot.insert(text);
                Ok(())
            }
        }
    }

    /// Template registered under exactly this identifier
    #[must_use]
    pub fn get(&self, identifier: &LocalizedReportIdentifier) -> Option<&str> {
        self.templates.get(identifier).map(String::as_str)
    }

    /// Number of registered templates
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check whether no template is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered identifiers in canonical order
    pub fn identifiers(&self) -> impl Iterator<Item = &LocalizedReportIdentifier> {
        self.templates.keys()
    }

    /// Templates applicable to `identifier`, ordered by sequence
    ///
    /// A template applies when its id equals the requested id and its locale
    /// matches under `locale_match`. When two applicable templates share a
    /// sequence, one whose locale equals the requested locale exactly wins;
    /// otherwise the first in canonical order is kept.
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidArgument`] if no template applies.
    pub fn select(
        &self,
        identifier: &LocalizedReportIdentifier,
        locale_match: LocaleMatch,
    ) -> ReportResult<Vec<SelectedTemplate<'_>>> {
        let requested = identifier.locale();
        let mut by_sequence: BTreeMap<u32, SelectedTemplate<'_>> = BTreeMap::new();

        for (key, text) in &self.templates {
            if key.id() != identifier.id() {
                continue;
            }
            let applies = match locale_match {
                LocaleMatch::Language => key.locale().same_language(requested),
                LocaleMatch::Exact => key.locale() == requested,
            };
            if !applies {
                continue;
            }

            let candidate = SelectedTemplate { identifier: key, text };
            match by_sequence.entry(key.sequence()) {
                btree_map::Entry::Vacant(slot) => {
                    let _ = slot.insert(candidate);
                }
                btree_map::Entry::Occupied(mut slot) => {
                    let held = slot.get().identifier;
                    if held.locale() != requested && key.locale() == requested {
                        tracing::warn!(kept = %key, shadowed = %held, "template shadowed by exact locale match");
                        let _ = slot.insert(candidate);
                    } else {
                        tracing::warn!(kept = %held, shadowed = %key, "template shadowed at equal sequence");
                    }
                }
            }
        }

        if by_sequence.is_empty() {
            return Err(ReportError::invalid_argument(format!(
                "No template found for identifier {identifier}"
            )));
        }
        Ok(by_sequence.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn id(text: &str) -> LocalizedReportIdentifier {
        LocalizedReportIdentifier::parse(text).unwrap()
    }

    fn texts(selected: &[SelectedTemplate<'_>]) -> Vec<String> {
        selected.iter().map(|s| s.text.to_string()).collect()
    }

    #[test]
    fn test_duplicate_rejected_and_first_kept() {
        let mut store = TemplateStore::new();
        store.add(id("[classCoverage::sv_SE::0]"), "first").unwrap();
        let err = store.add(id("[classCoverage::sv_SE::0]"), "second").unwrap_err();
        assert!(matches!(err, ReportError::DuplicateTemplate { .. }));
        assert!(err.to_string().contains("[classCoverage::sv_SE::0]"));
        assert_eq!(store.get(&id("[classCoverage::sv_SE::0]")), Some("first"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_empty_template_rejected() {
        let mut store = TemplateStore::new();
        assert!(store.add(id("[a::en::0]"), "").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_selection_orders_by_sequence() {
        let mut store = TemplateStore::new();
        store.add(id("[classCoverage::sv_SE::1]"), "second").unwrap();
        store.add(id("[classCoverage::sv_SE::0]"), "first").unwrap();

        let selected = store
            .select(&id("[classCoverage::sv_SE::0]"), LocaleMatch::Language)
            .unwrap();
        assert_eq!(texts(&selected), vec!["first", "second"]);
    }

    #[test]
    fn test_selection_sequence_is_numeric_not_lexicographic() {
        let mut store = TemplateStore::new();
        for seq in [10, 2, 1] {
            store.add(id(&format!("[report::en::{seq}]")), format!("part{seq}")).unwrap();
        }
        let selected = store.select(&id("[report::en::0]"), LocaleMatch::Language).unwrap();
        assert_eq!(texts(&selected), vec!["part1", "part2", "part10"]);
    }

    #[test]
    fn test_selection_ignores_region_and_other_ids() {
        let mut store = TemplateStore::new();
        store.add(id("[classCoverage::sv_FI::0]"), "finland").unwrap();
        store.add(id("[classCoverage::en_GB::1]"), "english").unwrap();
        store.add(id("[packageCoverage::sv_SE::1]"), "other").unwrap();

        let selected = store
            .select(&id("[classCoverage::sv_SE::0]"), LocaleMatch::Language)
            .unwrap();
        assert_eq!(texts(&selected), vec!["finland"]);
    }

    #[test]
    fn test_exact_locale_mode() {
        let mut store = TemplateStore::new();
        store.add(id("[classCoverage::sv_FI::0]"), "finland").unwrap();
        let err = store
            .select(&id("[classCoverage::sv_SE::0]"), LocaleMatch::Exact)
            .unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument { .. }));
    }

    #[test]
    fn test_exact_locale_wins_sequence_collision() {
        let mut store = TemplateStore::new();
        store.add(id("[classCoverage::sv_FI::0]"), "finland").unwrap();
        store.add(id("[classCoverage::sv_SE::0]"), "sweden").unwrap();
        store.add(id("[classCoverage::sv::0]"), "swedish").unwrap();

        let se = store.select(&id("[classCoverage::sv_SE::0]"), LocaleMatch::Language).unwrap();
        assert_eq!(texts(&se), vec!["sweden"]);

        let fi = store.select(&id("[classCoverage::sv_FI::0]"), LocaleMatch::Language).unwrap();
        assert_eq!(texts(&fi), vec!["finland"]);

        // No exact match: first in canonical order ("sv::0" < "sv_FI::0")
        let other = LocalizedReportIdentifier::new("classCoverage", Locale::new("sv", "AX").unwrap()).unwrap();
        let ax = store.select(&other, LocaleMatch::Language).unwrap();
        assert_eq!(texts(&ax), vec!["swedish"]);
    }

    #[test]
    fn test_no_templates_is_invalid_argument() {
        let store = TemplateStore::new();
        let err = store.select(&id("[classCoverage::sv_SE::0]"), LocaleMatch::Language).unwrap_err();
        assert!(matches!(err, ReportError::InvalidArgument { .. }));
        assert!(err.to_string().contains("No template found"));
    }
}
