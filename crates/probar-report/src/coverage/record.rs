//! Coverage Records
//!
//! A [`CoverageRecord`] ties a hit count to a [`SourceLocation`].
//! [`CoverageRecords`] is the per-scope set: records at an equal location are
//! merged by adding hit counts, never replaced, and iteration follows the
//! locations' natural order so rendered report text is deterministic.

use super::SourceLocation;
use crate::aggregator::{ScopeData, TokenMap};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// One measurement at a location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRecord {
    location: SourceLocation,
    hit_count: u64,
}

impl CoverageRecord {
    /// Create a record
    #[must_use]
    pub fn new(location: SourceLocation, hit_count: u64) -> Self {
        Self {
            location,
            hit_count,
        }
    }

    /// Location of the measurement
    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Number of hits observed
    #[must_use]
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Check if the location was executed at least once
    #[must_use]
    pub fn is_covered(&self) -> bool {
        self.hit_count > 0
    }
}

impl fmt::Display for CoverageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.hit_count)
    }
}

/// Coverage summary statistics for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Number of distinct locations
    pub total_locations: usize,
    /// Locations with hit_count > 0
    pub covered_locations: usize,
    /// Sum of all hit counts (saturating)
    pub total_hits: u64,
    /// Coverage percentage
    pub coverage_percent: f64,
}

/// Location-ordered, merge-on-insert set of coverage records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageRecords {
    hits: BTreeMap<SourceLocation, u64>,
}

impl CoverageRecords {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hits at a location, creating the entry if needed
    pub fn record_hits(&mut self, location: SourceLocation, count: u64) {
        match self.hits.entry(location) {
            btree_map::Entry::Vacant(slot) => {
                let _ = slot.insert(count);
            }
            btree_map::Entry::Occupied(mut slot) => {
                let current = *slot.get();
                let merged = current.checked_add(count).unwrap_or_else(|| {
                    tracing::warn!(location = %slot.key(), "hit count saturated at u64::MAX");
                    u64::MAX
                });
                tracing::trace!(location = %slot.key(), hits = merged, "merged coverage record");
                let _ = slot.insert(merged);
            }
        }
    }

    /// Hit count at a location, if recorded
    #[must_use]
    pub fn hit_count(&self, location: &SourceLocation) -> Option<u64> {
        self.hits.get(location).copied()
    }

    /// Number of distinct locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Check whether no location has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Records in location order
    pub fn iter(&self) -> impl Iterator<Item = CoverageRecord> + '_ {
        self.hits
            .iter()
            .map(|(location, &hits)| CoverageRecord::new(location.clone(), hits))
    }

    /// Number of locations with at least one hit
    #[must_use]
    pub fn covered_count(&self) -> usize {
        self.hits.values().filter(|&&c| c > 0).count()
    }

    /// Summary statistics
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        let total_locations = self.len();
        let covered_locations = self.covered_count();
        let coverage_percent = if total_locations == 0 {
            100.0 // Vacuously true
        } else {
            (covered_locations as f64 / total_locations as f64) * 100.0
        };
        CoverageSummary {
            total_locations,
            covered_locations,
            total_hits: self.hits.values().fold(0u64, |acc, &c| acc.saturating_add(c)),
            coverage_percent,
        }
    }
}

impl ScopeData for CoverageRecords {
    type Record = CoverageRecord;

    fn merge(&mut self, record: Self::Record) {
        self.record_hits(record.location, record.hit_count);
    }

    fn absorb(&mut self, other: Self) {
        for (location, hits) in other.hits {
            self.record_hits(location, hits);
        }
    }

    /// Exposes `records` (the full dump), `locations`, `covered`, `hits` and
    /// `coverage_percent`.
    fn tokens(&self) -> Cow<'_, TokenMap> {
        let summary = self.summary();
        let mut tokens = TokenMap::new();
        let _ = tokens.insert("records", self.to_string());
        let _ = tokens.insert("locations", summary.total_locations.to_string());
        let _ = tokens.insert("covered", summary.covered_locations.to_string());
        let _ = tokens.insert("hits", summary.total_hits.to_string());
        let _ = tokens.insert("coverage_percent", format!("{:.1}", summary.coverage_percent));
        Cow::Owned(tokens)
    }

    fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl Extend<CoverageRecord> for CoverageRecords {
    fn extend<I: IntoIterator<Item = CoverageRecord>>(&mut self, iter: I) {
        for record in iter {
            self.merge(record);
        }
    }
}

impl FromIterator<CoverageRecord> for CoverageRecords {
    fn from_iter<I: IntoIterator<Item = CoverageRecord>>(iter: I) -> Self {
        let mut records = Self::new();
        records.extend(iter);
        records
    }
}

impl fmt::Display for CoverageRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (location, hits)) in self.hits.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{location}: {hits}")?;
        }
        f.write_str("]")
    }
}
