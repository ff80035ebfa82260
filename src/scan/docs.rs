//! MDX prose-documentation scanner.
//!
//! Walks each version root for `index.mdx` pages and indexes every method
//! name found in a `<CodeGroup>` request body. Pages whose heading carries an
//! `overview` or `structures` tag describe a category rather than one method;
//! they are still indexed (a later filter needs to know what matched them)
//! but their paths are collected into a separate overview set.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{NativeIndex, SourceScan};
use crate::errors::{DocmapError, ScanFailure, SourceKind};

static CODEGROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<CodeGroup[^>]*>(.*?)</CodeGroup>").expect("static regex"));

static CODE_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[a-zA-Z]*\n(.*?)```").expect("static regex"));

static METHOD_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""method"\s*:\s*"([A-Za-z0-9_:.-]+)""#).expect("static regex"));

static OVERVIEW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"##\s+[A-Za-z0-9_:.\\-]+\s*\{\{[^}]*tag\s*:\s*["'](?:overview|structures)["'][^}]*\}\}"#)
        .expect("static regex")
});

/// Content heuristic for category pages: a `##` method heading tagged
/// `overview` or `structures`.
pub fn is_overview_page(content: &str) -> bool {
    OVERVIEW_RE.is_match(content)
}

/// Method names appearing in `"method": "..."` fields inside fenced code
/// blocks of `<CodeGroup>` components, deduplicated and sorted.
fn extract_codegroup_methods(content: &str) -> Vec<String> {
    let mut methods = BTreeSet::new();
    for group in CODEGROUP_RE.captures_iter(content) {
        for block in CODE_FENCE_RE.captures_iter(&group[1]) {
            for field in METHOD_FIELD_RE.captures_iter(&block[1]) {
                methods.insert(field[1].to_string());
            }
        }
    }
    methods.into_iter().collect()
}

/// Result of a docs scan: the per-version method index plus the set of pages
/// the overview heuristic flagged.
#[derive(Debug, Clone, Default)]
pub struct DocsScan {
    pub scan: SourceScan<PathBuf>,
    pub overview_pages: BTreeSet<PathBuf>,
}

pub struct DocsScanner {
    roots: BTreeMap<String, PathBuf>,
}

impl DocsScanner {
    pub fn new(roots: BTreeMap<String, PathBuf>) -> Self {
        Self { roots }
    }

    pub fn scan(&self) -> DocsScan {
        let mut result = DocsScan::default();

        for (version, root) in &self.roots {
            let index = result.scan.by_version.entry(version.clone()).or_default();

            if !root.is_dir() {
                result.scan.diagnostics.warn(DocmapError::SourceUnavailable {
                    kind: SourceKind::Docs,
                    path: root.clone(),
                });
                continue;
            }

            for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
                if entry.file_name() != "index.mdx" || !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let content = match fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(err) => {
                        result.scan.diagnostics.record_failure(ScanFailure::parse(
                            SourceKind::Docs,
                            path.to_path_buf(),
                            err,
                        ));
                        continue;
                    }
                };

                if is_overview_page(&content) {
                    result.overview_pages.insert(path.to_path_buf());
                }

                index_methods(
                    index,
                    extract_codegroup_methods(&content),
                    path,
                    version,
                    &mut result.scan.diagnostics,
                );
            }

            log::debug!("docs scan: {} methods for {version}", index.len());
        }

        result
    }
}

fn index_methods(
    index: &mut NativeIndex<PathBuf>,
    methods: Vec<String>,
    path: &Path,
    version: &str,
    diagnostics: &mut crate::errors::RunDiagnostics,
) {
    for method in methods {
        if let Some(previous) = index.insert(method.clone(), path.to_path_buf()) {
            diagnostics.warn(format!(
                "method '{method}' for {version} found in multiple docs pages: {} and {}",
                previous.display(),
                path.display()
            ));
        }
    }
}
