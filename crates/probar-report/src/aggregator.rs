//! Scope Aggregation
//!
//! Producers push records under a caller-chosen scope id. Each scope owns one
//! value implementing [`ScopeData`], which decides how a new record merges
//! into what is already there. Coverage records add hit counts at equal
//! locations; token maps overwrite equal keys.
//!
//! ```text
//! add_data("classCoverage", record) ──► Aggregator ──► scopes["classCoverage"].merge(record)
//!                                                            │
//!                                 compile ◄── tokens() ◄─────┘
//! ```

use crate::result::{require_non_empty, ReportError, ReportResult};
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Mergeable per-scope data
///
/// Implementors define the merge policy for their record type and how their
/// content is exposed as template tokens.
pub trait ScopeData: Default + fmt::Debug {
    /// One datum supplied by a producer
    type Record;

    /// Reject a record before anything is mutated
    fn validate(_record: &Self::Record) -> ReportResult<()> {
        Ok(())
    }

    /// Merge a single record into this value
    fn merge(&mut self, record: Self::Record);

    /// Merge all of another value into this one
    fn absorb(&mut self, other: Self);

    /// Token view of this value for template rendering
    fn tokens(&self) -> Cow<'_, TokenMap>;

    /// Check whether no data has been merged
    fn is_empty(&self) -> bool;
}

/// Ordered token name → value mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    tokens: BTreeMap<String, String>,
}

impl TokenMap {
    /// Create an empty token map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.tokens.insert(key.into(), value.into())
    }

    /// Look up a token value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// Number of tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check whether the map holds no tokens
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate tokens in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ScopeData for TokenMap {
    type Record = (String, String);

    fn validate((key, _): &Self::Record) -> ReportResult<()> {
        require_non_empty(key, "token key")
    }

    fn merge(&mut self, (key, value): Self::Record) {
        if let Some(previous) = self.tokens.insert(key, value) {
            tracing::trace!(previous = %previous, "token value replaced");
        }
    }

    fn absorb(&mut self, other: Self) {
        self.tokens.extend(other.tokens);
    }

    fn tokens(&self) -> Cow<'_, TokenMap> {
        Cow::Borrowed(self)
    }

    fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl fmt::Display for TokenMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

/// Scope id → merged data
#[derive(Debug, Clone)]
pub struct Aggregator<D> {
    scopes: BTreeMap<String, D>,
}

impl<D> Default for Aggregator<D> {
    fn default() -> Self {
        Self {
            scopes: BTreeMap::new(),
        }
    }
}

impl<D: ScopeData> Aggregator<D> {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one record into the scope
    ///
    /// # Errors
    ///
    /// [`ReportError::InvalidArgument`] if `scope_id` is empty or the record is
    /// rejected by [`ScopeData::validate`]. Nothing is mutated on error.
    pub fn add_data(&mut self, scope_id: &str, record: D::Record) -> ReportResult<()> {
        require_non_empty(scope_id, "scope id")?;
        D::validate(&record)?;

        self.scopes.entry(scope_id.to_string()).or_default().merge(record);
        Ok(())
    }

    /// Merge a batch of records into the scope
    ///
    /// All records are validated before the first one is merged.
    pub fn add_all<I>(&mut self, scope_id: &str, records: I) -> ReportResult<()>
    where
        I: IntoIterator<Item = D::Record>,
    {
        require_non_empty(scope_id, "scope id")?;
        let records: Vec<D::Record> = records.into_iter().collect();
        if records.is_empty() {
            return Err(ReportError::invalid_argument(
                "Cannot handle empty data argument.",
            ));
        }
        for record in &records {
            D::validate(record)?;
        }

        let data = self.scopes.entry(scope_id.to_string()).or_default();
        for record in records {
            data.merge(record);
        }
        Ok(())
    }

    /// Merge every scope of another aggregator into this one
    ///
    /// Used to combine per-worker aggregators after a parallel run.
    pub fn merge_from(&mut self, other: Self) {
        for (scope_id, data) in other.scopes {
            match self.scopes.entry(scope_id) {
                btree_map::Entry::Vacant(slot) => {
                    let _ = slot.insert(data);
                }
                btree_map::Entry::Occupied(mut slot) => slot.get_mut().absorb(data),
            }
        }
    }

    /// Data merged under a scope
    #[must_use]
    pub fn scope(&self, scope_id: &str) -> Option<&D> {
        self.scopes.get(scope_id)
    }

    /// Tokens for a scope; an unknown scope yields an empty map
    #[must_use]
    pub fn tokens(&self, scope_id: &str) -> Cow<'_, TokenMap> {
        self.scopes
            .get(scope_id)
            .map_or_else(|| Cow::Owned(TokenMap::new()), |data| data.tokens())
    }

    /// Scope ids in sorted order
    pub fn scope_ids(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Iterate scopes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &D)> {
        self.scopes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of scopes
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Check whether no scope holds data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl<D: fmt::Display> fmt::Display for Aggregator<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (scope_id, data)) in self.scopes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{scope_id}={data}")?;
        }
        f.write_str("}")
    }
}
