//! OpenAPI path-spec scanner.
//!
//! Each version maps to a flat directory of per-method YAML files. The method
//! name is recovered, in order of preference, from the path key, from an
//! `operationId` field, or from the request schema's `method` enum. Files
//! yielding no name are recorded and skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::SourceScan;
use crate::errors::{DocmapError, ScanFailure, SourceKind};

static OPERATION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*operationId:\s*(.+?)\s*$").expect("static regex"));

pub struct SpecScanner {
    roots: BTreeMap<String, PathBuf>,
}

impl SpecScanner {
    pub fn new(roots: BTreeMap<String, PathBuf>) -> Self {
        Self { roots }
    }

    pub fn scan(&self) -> SourceScan<PathBuf> {
        let mut result = SourceScan::new();

        for (version, root) in &self.roots {
            let index = result.by_version.entry(version.clone()).or_default();

            if !root.is_dir() {
                result.diagnostics.warn(DocmapError::SourceUnavailable {
                    kind: SourceKind::Spec,
                    path: root.clone(),
                });
                continue;
            }

            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(err) => {
                    result.diagnostics.record_failure(ScanFailure::parse(
                        SourceKind::Spec,
                        root.clone(),
                        err,
                    ));
                    continue;
                }
            };

            let mut files: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    matches!(
                        path.extension().and_then(|ext| ext.to_str()),
                        Some("yaml") | Some("yml")
                    )
                })
                .collect();
            files.sort();

            for path in files {
                let content = match fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(err) => {
                        result.diagnostics.record_failure(ScanFailure::parse(
                            SourceKind::Spec,
                            path.clone(),
                            err,
                        ));
                        continue;
                    }
                };

                match extract_method_name(&content) {
                    Some(method) => {
                        if let Some(previous) = index.insert(method.clone(), path.clone()) {
                            result.diagnostics.warn(format!(
                                "method '{method}' for {version} found in multiple spec files: {} and {}",
                                previous.display(),
                                path.display()
                            ));
                        }
                    }
                    None => result.diagnostics.warn(format!(
                        "could not extract a method name from {}",
                        path.display()
                    )),
                }
            }

            log::debug!("spec scan: {} methods for {version}", index.len());
        }

        result
    }
}

/// Path key, then operationId, then the request schema's method enum.
fn extract_method_name(content: &str) -> Option<String> {
    let parsed: Option<serde_yaml::Value> = serde_yaml::from_str(content).ok();

    if let Some(value) = &parsed {
        if let Some(method) = method_from_path_key(value) {
            return Some(method);
        }
    }

    if let Some(caps) = OPERATION_ID_RE.captures(content) {
        let operation_id = caps[1].trim().trim_matches(['"', '\'']).to_string();
        if !operation_id.is_empty() {
            return Some(operation_id);
        }
    }

    parsed.as_ref().and_then(method_from_schema_enum)
}

/// The first top-level mapping key starting with `/`, with the leading slash
/// and any trailing colon removed.
fn method_from_path_key(value: &serde_yaml::Value) -> Option<String> {
    let mapping = value.as_mapping()?;
    for key in mapping.keys() {
        if let Some(key) = key.as_str() {
            if let Some(stripped) = key.strip_prefix('/') {
                let method = stripped.trim_matches('/').trim_end_matches(':');
                if !method.is_empty() {
                    return Some(method.to_string());
                }
            }
        }
    }
    None
}

/// `post.requestBody.content."application/json".schema` may carry the method
/// name as a single-value enum, either directly or inside an `allOf`.
fn method_from_schema_enum(value: &serde_yaml::Value) -> Option<String> {
    let mapping = value.as_mapping()?;
    for path_value in mapping.values() {
        let schema = path_value
            .get("post")?
            .get("requestBody")
            .and_then(|body| body.get("content"))
            .and_then(|content| content.get("application/json"))
            .and_then(|json| json.get("schema"))?;

        if let Some(all_of) = schema.get("allOf").and_then(|v| v.as_sequence()) {
            for item in all_of {
                if let Some(method) = enum_method_from_properties(item) {
                    return Some(method);
                }
            }
        }

        if let Some(method) = enum_method_from_properties(schema) {
            return Some(method);
        }
    }
    None
}

fn enum_method_from_properties(schema: &serde_yaml::Value) -> Option<String> {
    schema
        .get("properties")?
        .get("method")?
        .get("enum")?
        .as_sequence()?
        .first()?
        .as_str()
        .map(str::to_string)
}
