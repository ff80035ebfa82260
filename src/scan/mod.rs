//! Source scanners.
//!
//! Each scanner walks one source type and returns, per version, a dictionary
//! keyed in that source's native lexical form. Scanners never normalize:
//! canonicalization happens once, at the mapping-builder boundary. Scanners
//! also never abort: missing roots and unparseable files become recorded
//! diagnostics and the scan continues.

pub mod docs;
pub mod ground_truth;
pub mod openapi;
pub mod postman;
pub mod requests;

pub use docs::{is_overview_page, DocsScan, DocsScanner};
pub use ground_truth::GroundTruthLoader;
pub use openapi::SpecScanner;
pub use postman::PostmanScanner;
pub use requests::{ExampleLocation, ExamplesScanner};

use std::collections::BTreeMap;

use crate::errors::RunDiagnostics;

/// Native-form method key -> location value, for one version of one source.
pub type NativeIndex<T> = BTreeMap<String, T>;

/// Per-version native indexes for one source, plus whatever the scan
/// recorded instead of failing.
#[derive(Debug, Clone, Default)]
pub struct SourceScan<T> {
    pub by_version: BTreeMap<String, NativeIndex<T>>,
    pub diagnostics: RunDiagnostics,
}

impl<T> SourceScan<T> {
    pub fn new() -> Self {
        Self {
            by_version: BTreeMap::new(),
            diagnostics: RunDiagnostics::new(),
        }
    }

    /// The native index for a version; missing versions read as empty.
    pub fn version(&self, version: &str) -> Option<&NativeIndex<T>> {
        self.by_version.get(version)
    }
}
