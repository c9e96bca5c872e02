//! Location-Keyed Coverage Data
//!
//! Coverage producers (instrumentation, trace parsers) are external; this
//! module only models what they hand over: an opaque structural location and
//! an accumulable hit count.
//!
//! ```text
//! producer ──► CoverageRecord { SourceLocation, hits } ──► CoverageRecords (per scope)
//!                                                          equal location → hits add
//! ```

mod location;
mod record;

pub use location::SourceLocation;
pub use record::{CoverageRecord, CoverageRecords, CoverageSummary};
