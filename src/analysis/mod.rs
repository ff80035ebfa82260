//! Derived analysis over the unified mapping.

pub mod coverage;

pub use coverage::{
    CoverageAnalyzer, CoverageBreakdown, CoverageReport, GapStats, OverallCoverage, SourceRollup,
    VersionCoverage,
};
