//! Coverage breakdown and gap analysis.
//!
//! Recomputed from scratch every run; nothing here is persisted as mutable
//! state. Percentages are rounded to one decimal place, and every division
//! is guarded so an empty denominator reads as 0.0 rather than NaN.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{MethodMapping, MethodName, UnifiedMapping};

/// Count plus percentage of some version-local total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SourceRollup {
    pub count: usize,
    pub percentage: f64,
}

impl SourceRollup {
    fn of(count: usize, total: usize) -> Self {
        Self {
            count,
            percentage: percentage(count, total),
        }
    }
}

/// The eight presence combinations over `{has_docs, has_spec, has_examples}`.
///
/// `has_postman` and `is_complete` deliberately live outside this partition;
/// they are rolled up separately in [`VersionCoverage`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CoverageBreakdown {
    /// docs + spec + examples
    pub complete_all: SourceRollup,
    /// docs + spec, no examples
    pub docs_spec: SourceRollup,
    /// docs + examples, no spec
    pub docs_examples: SourceRollup,
    /// spec + examples, no docs
    pub spec_examples: SourceRollup,
    pub docs_only: SourceRollup,
    pub spec_only: SourceRollup,
    pub examples_only: SourceRollup,
    pub missing_all: SourceRollup,
}

impl CoverageBreakdown {
    pub fn buckets(&self) -> [(&'static str, &SourceRollup); 8] {
        [
            ("docs + spec + examples", &self.complete_all),
            ("docs + spec (no examples)", &self.docs_spec),
            ("docs + examples (no spec)", &self.docs_examples),
            ("spec + examples (no docs)", &self.spec_examples),
            ("docs only", &self.docs_only),
            ("spec only", &self.spec_only),
            ("examples only", &self.examples_only),
            ("missing all", &self.missing_all),
        ]
    }
}

/// Gap statistics against the canonical ground truth.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GapStats {
    pub canonical_methods: usize,
    pub documented_methods: usize,
    /// `|documented ∩ canonical|`, the coverage numerator. Documented
    /// methods absent from the canonical set (deprecated but still
    /// documented) must never push coverage above 100%.
    pub documented_in_canonical: usize,
    pub missing_methods: usize,
    pub coverage_percentage: f64,
    pub completeness_status: String,
}

impl GapStats {
    fn compute(canonical: usize, documented: usize, intersection: usize, missing: usize) -> Self {
        Self {
            canonical_methods: canonical,
            documented_methods: documented,
            documented_in_canonical: intersection,
            missing_methods: missing,
            coverage_percentage: percentage(intersection, canonical),
            completeness_status: if missing == 0 { "complete" } else { "incomplete" }.to_string(),
        }
    }
}

/// One version's full coverage picture.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VersionCoverage {
    pub total_methods: usize,
    pub breakdown: CoverageBreakdown,
    pub docs: SourceRollup,
    pub spec: SourceRollup,
    pub examples: SourceRollup,
    pub postman: SourceRollup,
    pub complete: SourceRollup,
    pub total_examples: usize,
    pub gap: GapStats,
    pub missing: Vec<MethodName>,
}

/// Cross-version aggregates. Raw counts are summed across versions before
/// any percentage is computed, never an average of per-version percentages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OverallCoverage {
    pub total_methods: usize,
    pub docs: SourceRollup,
    pub spec: SourceRollup,
    pub examples: SourceRollup,
    pub postman: SourceRollup,
    pub complete: SourceRollup,
    pub gap: GapStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    pub generated_at: DateTime<Utc>,
    pub versions: BTreeMap<String, VersionCoverage>,
    pub overall: OverallCoverage,
}

pub struct CoverageAnalyzer;

impl CoverageAnalyzer {
    pub fn analyze(unified: &UnifiedMapping) -> CoverageReport {
        let mut versions = BTreeMap::new();
        for (version, map) in &unified.versions {
            let canonical = unified.canonical.get(version).cloned().unwrap_or_default();
            let documented = unified.documented(version);

            let missing: Vec<MethodName> = canonical.difference(&documented).cloned().collect();
            let intersection = canonical.intersection(&documented).count();

            let mappings: Vec<&MethodMapping> = map.values().collect();
            let total = mappings.len();

            versions.insert(
                version.clone(),
                VersionCoverage {
                    total_methods: total,
                    breakdown: breakdown(&mappings, total),
                    docs: SourceRollup::of(count(&mappings, |m| m.has_docs()), total),
                    spec: SourceRollup::of(count(&mappings, |m| m.has_spec()), total),
                    examples: SourceRollup::of(count(&mappings, |m| m.has_examples()), total),
                    postman: SourceRollup::of(count(&mappings, |m| m.has_postman()), total),
                    complete: SourceRollup::of(count(&mappings, |m| m.is_complete()), total),
                    total_examples: mappings.iter().map(|m| m.example_count).sum(),
                    gap: GapStats::compute(
                        canonical.len(),
                        documented.len(),
                        intersection,
                        missing.len(),
                    ),
                    missing,
                },
            );
        }

        let overall = overall(&versions);

        CoverageReport {
            generated_at: Utc::now(),
            versions,
            overall,
        }
    }
}

fn count(mappings: &[&MethodMapping], predicate: impl Fn(&MethodMapping) -> bool) -> usize {
    mappings.iter().filter(|mapping| predicate(mapping)).count()
}

fn breakdown(mappings: &[&MethodMapping], total: usize) -> CoverageBreakdown {
    let bucket = |docs: bool, spec: bool, examples: bool| {
        SourceRollup::of(
            count(mappings, |m| {
                m.has_docs() == docs && m.has_spec() == spec && m.has_examples() == examples
            }),
            total,
        )
    };

    CoverageBreakdown {
        complete_all: bucket(true, true, true),
        docs_spec: bucket(true, true, false),
        docs_examples: bucket(true, false, true),
        spec_examples: bucket(false, true, true),
        docs_only: bucket(true, false, false),
        spec_only: bucket(false, true, false),
        examples_only: bucket(false, false, true),
        missing_all: bucket(false, false, false),
    }
}

fn overall(versions: &BTreeMap<String, VersionCoverage>) -> OverallCoverage {
    let total: usize = versions.values().map(|v| v.total_methods).sum();
    let sum = |get: fn(&VersionCoverage) -> usize| -> usize { versions.values().map(get).sum() };

    let canonical = sum(|v| v.gap.canonical_methods);
    let documented = sum(|v| v.gap.documented_methods);
    let intersection = sum(|v| v.gap.documented_in_canonical);
    let missing = sum(|v| v.gap.missing_methods);

    OverallCoverage {
        total_methods: total,
        docs: SourceRollup::of(sum(|v| v.docs.count), total),
        spec: SourceRollup::of(sum(|v| v.spec.count), total),
        examples: SourceRollup::of(sum(|v| v.examples.count), total),
        postman: SourceRollup::of(sum(|v| v.postman.count), total),
        complete: SourceRollup::of(sum(|v| v.complete.count), total),
        gap: GapStats::compute(canonical, documented, intersection, missing),
    }
}

/// Percentage of `count` over `total`, rounded to one decimal place; an
/// empty total reads as 0.0.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64 * 1000.0).round() / 10.0
    }
}
