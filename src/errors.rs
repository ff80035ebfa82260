//! Error taxonomy and run-scoped diagnostics.
//!
//! Scanning and mapping follow a "collect, never abort" policy: every
//! per-file or per-source failure is converted into a counted diagnostic at
//! its origin and the run continues with whatever was recoverable. The only
//! error that propagates out of a build is a failure to write the output
//! artifact itself.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which scanner a diagnostic originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Docs,
    Spec,
    Examples,
    Postman,
    GroundTruth,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Docs => "docs",
            SourceKind::Spec => "spec",
            SourceKind::Examples => "examples",
            SourceKind::Postman => "postman",
            SourceKind::GroundTruth => "ground-truth",
        };
        f.write_str(label)
    }
}

/// Typed failures the run absorbs (or, for `ArtifactWrite`, propagates).
#[derive(Debug, Error)]
pub enum DocmapError {
    /// A scanner's root path does not exist. The scan proceeds with empty
    /// results for that source.
    #[error("{kind} root not found, scanning nothing: {}", path.display())]
    SourceUnavailable { kind: SourceKind, path: PathBuf },

    /// One file failed to parse; its contribution is excluded.
    #[error("failed to parse {}: {message}", path.display())]
    ParseFailure { path: PathBuf, message: String },

    /// The canonical-method artifact is absent or malformed; coverage
    /// degrades to an empty ground-truth set.
    #[error("canonical method set unavailable for {version}, degrading to empty: {reason}")]
    GroundTruthMissing { version: String, reason: String },

    /// Writing the output artifact failed. This is the one fatal case.
    #[error("failed to write output artifact {}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One recorded per-file failure.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub source: SourceKind,
    pub path: PathBuf,
    pub error: String,
}

impl ScanFailure {
    /// Record one file's parse failure under the given source.
    pub fn parse(source: SourceKind, path: PathBuf, error: impl fmt::Display) -> Self {
        let error = DocmapError::ParseFailure {
            path: path.clone(),
            message: error.to_string(),
        };
        Self {
            source,
            path,
            error: error.to_string(),
        }
    }
}

/// Everything a run recorded instead of aborting on.
///
/// Each scan and each per-version build task owns its own instance; the
/// builder merges them after the join barrier. The final report states both
/// totals even when they are zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunDiagnostics {
    pub failures: Vec<ScanFailure>,
    pub warnings: Vec<String>,
}

impl RunDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_failure(&mut self, failure: ScanFailure) {
        log::warn!("{}: {} ({})", failure.source, failure.error, failure.path.display());
        self.failures.push(failure);
    }

    pub fn warn(&mut self, message: impl fmt::Display) {
        let message = message.to_string();
        log::warn!("{message}");
        self.warnings.push(message);
    }

    pub fn merge(&mut self, other: RunDiagnostics) {
        self.failures.extend(other.failures);
        self.warnings.extend(other.warnings);
    }

    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.warnings.is_empty()
    }
}
