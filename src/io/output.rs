use crate::analysis::coverage::{CoverageReport, GapStats};
use crate::core::{MethodName, UnifiedMapping};
use crate::errors::RunDiagnostics;
use chrono::{DateTime, Utc};
use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// Everything a writer needs to render one run.
pub struct RunReport<'a> {
    pub mapping: &'a UnifiedMapping,
    pub coverage: &'a CoverageReport,
    /// Analysis root; artifact paths are made relative to it when possible.
    pub root: &'a Path,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &RunReport<'_>) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

// ---------------------------------------------------------------------------
// JSON artifact document
// ---------------------------------------------------------------------------

/// One method's row in the `method_paths` section.
#[derive(Debug, Clone, Serialize)]
pub struct MethodRecord {
    pub method: String,
    pub docs_path: Option<String>,
    pub spec_path: Option<String>,
    pub examples_path: Option<String>,
    pub example_count: usize,
    pub postman_path: Option<String>,
    pub has_docs: bool,
    pub has_spec: bool,
    pub has_examples: bool,
    pub has_postman: bool,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSummary {
    pub total_errors: usize,
    pub total_warnings: usize,
    #[serde(flatten)]
    pub details: RunDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryStatistics {
    pub generated_at: DateTime<Utc>,
    pub total_methods: usize,
    pub overall: crate::analysis::coverage::OverallCoverage,
    pub version_breakdown: BTreeMap<String, crate::analysis::coverage::VersionCoverage>,
    pub match_stats: crate::core::resolve::MatchStats,
    pub diagnostics: DiagnosticsSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingSection {
    pub description: String,
    pub statistics: MissingStatistics,
    pub methods_lacking_coverage: BTreeMap<String, Vec<MethodName>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissingStatistics {
    pub overall: GapStats,
    pub versions: BTreeMap<String, GapStats>,
}

/// The output artifact: an immutable per-run snapshot consumed downstream
/// as a read-only dependency.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub method_paths: BTreeMap<String, BTreeMap<String, MethodRecord>>,
    pub summary_statistics: SummaryStatistics,
    pub missing: MissingSection,
}

fn relative(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

pub fn build_document(report: &RunReport<'_>) -> ReportDocument {
    let RunReport { mapping, coverage, root } = report;

    let mut method_paths: BTreeMap<String, BTreeMap<String, MethodRecord>> = BTreeMap::new();
    for (version, map) in &mapping.versions {
        let records = method_paths.entry(version.clone()).or_default();
        for (method, entry) in map {
            records.insert(
                method.as_canonical(),
                MethodRecord {
                    method: method.as_canonical(),
                    docs_path: entry.docs_path.as_deref().map(|p| relative(p, root)),
                    spec_path: entry.spec_path.as_deref().map(|p| relative(p, root)),
                    examples_path: entry.examples_path.as_deref().map(|p| relative(p, root)),
                    example_count: entry.example_count,
                    postman_path: entry
                        .postman
                        .as_ref()
                        .map(|link| relative(&link.collection_file, root)),
                    has_docs: entry.has_docs(),
                    has_spec: entry.has_spec(),
                    has_examples: entry.has_examples(),
                    has_postman: entry.has_postman(),
                    is_complete: entry.is_complete(),
                },
            );
        }
    }

    let missing = MissingSection {
        description: "Methods present in the dispatcher ground truth but lacking any \
                      documentation coverage"
            .to_string(),
        statistics: MissingStatistics {
            overall: coverage.overall.gap.clone(),
            versions: coverage
                .versions
                .iter()
                .map(|(version, v)| (version.clone(), v.gap.clone()))
                .collect(),
        },
        methods_lacking_coverage: coverage
            .versions
            .iter()
            .map(|(version, v)| (version.clone(), v.missing.clone()))
            .collect(),
    };

    ReportDocument {
        method_paths,
        summary_statistics: SummaryStatistics {
            generated_at: coverage.generated_at,
            total_methods: mapping.total_methods(),
            overall: coverage.overall.clone(),
            version_breakdown: coverage.versions.clone(),
            match_stats: mapping.match_stats,
            diagnostics: DiagnosticsSummary {
                total_errors: mapping.diagnostics.error_count(),
                total_warnings: mapping.diagnostics.warning_count(),
                details: mapping.diagnostics.clone(),
            },
        },
        missing,
    }
}

pub struct JsonWriter {
    writer: Box<dyn Write>,
}

impl JsonWriter {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl OutputWriter for JsonWriter {
    fn write_report(&mut self, report: &RunReport<'_>) -> anyhow::Result<()> {
        let document = build_document(report);
        let json = serde_json::to_string_pretty(&document)?;
        self.writer.write_all(json.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Terminal report
// ---------------------------------------------------------------------------

pub struct TerminalWriter {
    writer: Box<dyn Write>,
}

impl TerminalWriter {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl OutputWriter for TerminalWriter {
    fn write_report(&mut self, report: &RunReport<'_>) -> anyhow::Result<()> {
        let w = &mut self.writer;
        let coverage = report.coverage;
        let mapping = report.mapping;

        writeln!(w, "{}", "=".repeat(60))?;
        writeln!(w, "{}", "METHOD MAPPING SUMMARY".bold())?;
        writeln!(w, "{}", "=".repeat(60))?;
        writeln!(w, "Total methods: {}", mapping.total_methods())?;

        for (version, v) in &coverage.versions {
            writeln!(w)?;
            writeln!(w, "{} ({} methods)", version.to_uppercase().bold(), v.total_methods)?;
            for (label, rollup) in v.breakdown.buckets() {
                if rollup.count == 0 {
                    continue;
                }
                writeln!(w, "  {:<28} {:>5}  ({:.1}%)", label, rollup.count, rollup.percentage)?;
            }
            writeln!(
                w,
                "  {:<28} {:>5}  ({:.1}%)",
                "complete (docs + spec)".green(),
                v.complete.count,
                v.complete.percentage
            )?;
            writeln!(
                w,
                "  {:<28} {:>5}  ({:.1}%) - {} total examples",
                "with examples",
                v.examples.count,
                v.examples.percentage,
                v.total_examples
            )?;
            writeln!(
                w,
                "  {:<28} {:>5}  ({:.1}%)",
                "with collection links",
                v.postman.count,
                v.postman.percentage
            )?;
            writeln!(
                w,
                "  ground-truth coverage: {} ({} of {} canonical methods)",
                format!("{:.1}%", v.gap.coverage_percentage).bold(),
                v.gap.documented_in_canonical,
                v.gap.canonical_methods
            )?;
            if !v.missing.is_empty() {
                writeln!(w, "  {}", format!("missing {} method(s):", v.missing.len()).yellow())?;
                for method in &v.missing {
                    writeln!(w, "    - {method}")?;
                }
            }
        }

        writeln!(w)?;
        writeln!(
            w,
            "Overall ground-truth coverage: {:.1}% ({})",
            coverage.overall.gap.coverage_percentage, coverage.overall.gap.completeness_status
        )?;
        writeln!(
            w,
            "Match tiers: {} direct, {} variation, {} fuzzy, {} unmatched",
            mapping.match_stats.direct_matches,
            mapping.match_stats.variation_matches,
            mapping.match_stats.fuzzy_matches,
            mapping.match_stats.no_matches
        )?;

        let errors = mapping.diagnostics.error_count();
        let warnings = mapping.diagnostics.warning_count();
        let totals = format!("Errors: {errors}  Warnings: {warnings}");
        if errors == 0 && warnings == 0 {
            writeln!(w, "{}", totals.green())?;
        } else {
            writeln!(w, "{}", totals.yellow())?;
            for warning in &mapping.diagnostics.warnings {
                writeln!(w, "  [warn] {warning}")?;
            }
            for failure in &mapping.diagnostics.failures {
                writeln!(w, "  [{}] {} ({})", failure.source, failure.error, failure.path.display())?;
            }
        }
        writeln!(w, "{}", "=".repeat(60))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Markdown report
// ---------------------------------------------------------------------------

pub struct MarkdownWriter {
    writer: Box<dyn Write>,
}

impl MarkdownWriter {
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl OutputWriter for MarkdownWriter {
    fn write_report(&mut self, report: &RunReport<'_>) -> anyhow::Result<()> {
        let w = &mut self.writer;
        let coverage = report.coverage;
        let mapping = report.mapping;

        writeln!(w, "# Documentation Mapping Report")?;
        writeln!(w)?;
        writeln!(
            w,
            "Generated: {}",
            coverage.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(w)?;
        writeln!(w, "## Summary")?;
        writeln!(w)?;
        writeln!(w, "| Metric | Value |")?;
        writeln!(w, "|--------|-------|")?;
        writeln!(w, "| Total methods | {} |", mapping.total_methods())?;
        writeln!(
            w,
            "| Ground-truth coverage | {:.1}% |",
            coverage.overall.gap.coverage_percentage
        )?;
        writeln!(w, "| Complete (docs + spec) | {} |", coverage.overall.complete.count)?;
        writeln!(w, "| Errors | {} |", mapping.diagnostics.error_count())?;
        writeln!(w, "| Warnings | {} |", mapping.diagnostics.warning_count())?;
        writeln!(w)?;

        for (version, v) in &coverage.versions {
            writeln!(w, "## {version}")?;
            writeln!(w)?;
            writeln!(w, "| Sources present | Methods | % |")?;
            writeln!(w, "|-----------------|---------|---|")?;
            for (label, rollup) in v.breakdown.buckets() {
                writeln!(w, "| {label} | {} | {:.1}% |", rollup.count, rollup.percentage)?;
            }
            writeln!(w)?;
            if !v.missing.is_empty() {
                writeln!(w, "### Missing from documentation ({})", v.missing.len())?;
                writeln!(w)?;
                for method in &v.missing {
                    writeln!(w, "- `{method}`")?;
                }
                writeln!(w)?;
            }
        }

        Ok(())
    }
}
