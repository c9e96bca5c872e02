//! Structural Source Locations
//!
//! A [`SourceLocation`] is the merge key for coverage records. It is opaque to
//! the aggregator apart from its equality and natural order, which is the
//! tuple `(package, class_name, method_signature, line, segment)`.

use crate::result::{require_non_empty, ReportResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a measured execution event in the program structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    package: String,
    class_name: String,
    method_signature: String,
    line: u32,
    segment: u32,
}

impl SourceLocation {
    /// Create a location
    ///
    /// The package may be empty (default package); class name and method
    /// signature may not.
    pub fn new(
        package: impl Into<String>,
        class_name: impl Into<String>,
        method_signature: impl Into<String>,
        line: u32,
        segment: u32,
    ) -> ReportResult<Self> {
        let class_name = class_name.into();
        let method_signature = method_signature.into();
        require_non_empty(&class_name, "class_name")?;
        require_non_empty(&method_signature, "method_signature")?;

        Ok(Self {
            package: package.into(),
            class_name,
            method_signature,
            line,
            segment,
        })
    }

    /// Package (may be empty for the default package)
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Simple class name
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Fully qualified class name, `package.Class`
    #[must_use]
    pub fn qualified_class_name(&self) -> String {
        if self.package.is_empty() {
            self.class_name.clone()
        } else {
            format!("{}.{}", self.package, self.class_name)
        }
    }

    /// Method signature, e.g. `toString()`
    #[must_use]
    pub fn method_signature(&self) -> &str {
        &self.method_signature
    }

    /// Source line
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Branch segment within the line
    #[must_use]
    pub fn segment(&self) -> u32 {
        self.segment
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{},line:{},segment:{}",
            self.qualified_class_name(),
            self.method_signature,
            self.line,
            self.segment
        )
    }
}
