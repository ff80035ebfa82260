//! JSON request-example scanner.
//!
//! Example trees are laid out as `<method-dir>/<operation-dir>/*.json`, with
//! slug-like method directory names (`task-enable-utxo/init`,
//! `my_balance/default`). The native method name is composed from the two
//! directory levels; the value is the operation directory plus its example
//! count. Operations with no JSON files are omitted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::SourceScan;
use crate::errors::{DocmapError, ScanFailure, SourceKind};

/// Where a method's runnable examples live, and how many there are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleLocation {
    pub dir: PathBuf,
    pub count: usize,
}

pub struct ExamplesScanner {
    roots: BTreeMap<String, PathBuf>,
}

impl ExamplesScanner {
    pub fn new(roots: BTreeMap<String, PathBuf>) -> Self {
        Self { roots }
    }

    pub fn scan(&self) -> SourceScan<ExampleLocation> {
        let mut result = SourceScan::new();

        for (version, root) in &self.roots {
            let index = result.by_version.entry(version.clone()).or_default();

            if !root.is_dir() {
                result.diagnostics.warn(DocmapError::SourceUnavailable {
                    kind: SourceKind::Examples,
                    path: root.clone(),
                });
                continue;
            }

            for method_dir in sorted_subdirs(root, &mut result.diagnostics) {
                let method_base = method_base_name(&dir_name(&method_dir));

                for operation_dir in sorted_subdirs(&method_dir, &mut result.diagnostics) {
                    let count = json_file_count(&operation_dir);
                    if count == 0 {
                        continue;
                    }
                    let method = full_method_name(&method_base, &dir_name(&operation_dir));
                    index.insert(
                        method,
                        ExampleLocation {
                            dir: operation_dir,
                            count,
                        },
                    );
                }
            }

            log::debug!("examples scan: {} methods for {version}", index.len());
        }

        result
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn sorted_subdirs(root: &Path, diagnostics: &mut crate::errors::RunDiagnostics) -> Vec<PathBuf> {
    match fs::read_dir(root) {
        Ok(entries) => {
            let mut dirs: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.is_dir())
                .collect();
            dirs.sort();
            dirs
        }
        Err(err) => {
            diagnostics.record_failure(ScanFailure::parse(
                SourceKind::Examples,
                root.to_path_buf(),
                err,
            ));
            Vec::new()
        }
    }
}

fn json_file_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|entry| {
                    entry.path().extension().and_then(|ext| ext.to_str()) == Some("json")
                })
                .count()
        })
        .unwrap_or(0)
}

/// Promote a method directory name to `::` form, fixing up the
/// `task-enable-<coin>` family whose slug hyphens stand in for underscores.
fn method_base_name(dir: &str) -> String {
    let base = dir.replace('-', "::");
    if base == "task::enable::z::coin" {
        "task::enable_z_coin".to_string()
    } else if base.starts_with("task::enable::") {
        base.replace("::enable::", "::enable_")
    } else {
        base
    }
}

/// Append the operation segment unless the base already ends with it; the
/// `default` operation names the base itself.
fn full_method_name(base: &str, operation_dir: &str) -> String {
    if operation_dir == "default" {
        return base.to_string();
    }
    let operation = operation_dir.replace('-', "_");
    if base.ends_with(&format!("::{operation}")) {
        base.to_string()
    } else {
        format!("{base}::{operation}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn enable_family_directories_recover_their_underscores() {
        assert_eq!(method_base_name("task-enable-utxo"), "task::enable_utxo");
        assert_eq!(method_base_name("task-enable-z-coin"), "task::enable_z_coin");
        assert_eq!(method_base_name("my_balance"), "my_balance");
        assert_eq!(
            method_base_name("lightning-channels-close_channel"),
            "lightning::channels::close_channel"
        );
    }

    #[test]
    fn operation_composition_avoids_duplicate_trailing_segments() {
        assert_eq!(full_method_name("task::enable_utxo", "init"), "task::enable_utxo::init");
        assert_eq!(full_method_name("my_balance", "default"), "my_balance");
        assert_eq!(full_method_name("task::enable_utxo", "user-action"), "task::enable_utxo::user_action");
        assert_eq!(
            full_method_name("stream::balance::enable", "enable"),
            "stream::balance::enable"
        );
    }

    #[test]
    fn scan_counts_json_files_per_operation() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("requests/v2");
        let init = root.join("task-enable-utxo/init");
        let empty = root.join("task-enable-utxo/cancel");
        fs::create_dir_all(&init).unwrap();
        fs::create_dir_all(&empty).unwrap();
        fs::write(init.join("basic.json"), "{}").unwrap();
        fs::write(init.join("with_tx_history.json"), "{}").unwrap();
        fs::write(init.join("readme.md"), "ignored").unwrap();

        let scanner = ExamplesScanner::new(BTreeMap::from([("v2".to_string(), root)]));
        let result = scanner.scan();
        let index = result.version("v2").unwrap();

        assert_eq!(index.len(), 1);
        let location = &index["task::enable_utxo::init"];
        assert_eq!(location.count, 2);
        assert!(location.dir.ends_with("task-enable-utxo/init"));
    }

    #[test]
    fn missing_root_is_a_warning_not_an_error() {
        let scanner = ExamplesScanner::new(BTreeMap::from([(
            "v1".to_string(),
            PathBuf::from("/nonexistent/requests"),
        )]));
        let result = scanner.scan();
        assert!(result.version("v1").unwrap().is_empty());
        assert_eq!(result.diagnostics.warning_count(), 1);
        assert_eq!(result.diagnostics.error_count(), 0);
    }
}
