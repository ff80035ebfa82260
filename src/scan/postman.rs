//! Collaboration-tool collection scanner.
//!
//! Parses Postman-style collection exports and maps each request whose raw
//! JSON body names a method to link metadata (collection file, folder path,
//! request name). The version is read from the collection filename; the
//! source only ever sets a presence flag, so a misattributed version can at
//! worst miss a flag, never skew coverage.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::SourceScan;
use crate::core::PostmanLink;
use crate::errors::{DocmapError, ScanFailure, SourceKind};

#[derive(Debug, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    item: Vec<CollectionItem>,
}

#[derive(Debug, Deserialize)]
struct CollectionItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    item: Option<Vec<CollectionItem>>,
    #[serde(default)]
    request: Option<CollectionRequest>,
}

#[derive(Debug, Deserialize)]
struct CollectionRequest {
    #[serde(default)]
    body: Option<RequestBody>,
}

#[derive(Debug, Deserialize)]
struct RequestBody {
    #[serde(default)]
    raw: Option<String>,
}

pub struct PostmanScanner {
    collections_dir: Option<PathBuf>,
    /// Version names to look for in collection filenames, plus the fallback
    /// when none appears.
    versions: Vec<String>,
    fallback_version: String,
}

impl PostmanScanner {
    pub fn new(
        collections_dir: Option<PathBuf>,
        versions: Vec<String>,
        fallback_version: String,
    ) -> Self {
        Self {
            collections_dir,
            versions,
            fallback_version,
        }
    }

    pub fn scan(&self) -> SourceScan<PostmanLink> {
        let mut result = SourceScan::new();
        for version in &self.versions {
            result.by_version.entry(version.clone()).or_default();
        }

        let Some(dir) = &self.collections_dir else {
            return result;
        };
        if !dir.is_dir() {
            result.diagnostics.warn(DocmapError::SourceUnavailable {
                kind: SourceKind::Postman,
                path: dir.clone(),
            });
            return result;
        }

        let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
                .collect(),
            Err(err) => {
                result
                    .diagnostics
                    .record_failure(ScanFailure::parse(SourceKind::Postman, dir.clone(), err));
                return result;
            }
        };
        files.sort();

        for path in files {
            let collection: CollectionFile = match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
            {
                Ok(collection) => collection,
                Err(err) => {
                    result.diagnostics.record_failure(ScanFailure::parse(
                        SourceKind::Postman,
                        path.clone(),
                        err,
                    ));
                    continue;
                }
            };

            let version = self.version_for(&path);
            let index = result.by_version.entry(version).or_default();
            let mut folder_path = Vec::new();
            walk_items(&collection.item, &mut folder_path, &path, index);
        }

        result
    }

    /// Longest configured version name appearing in the filename wins, so
    /// `v2-dev` is not mistaken for `v2`.
    fn version_for(&self, path: &Path) -> String {
        let filename = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut candidates: Vec<&String> = self.versions.iter().collect();
        candidates.sort_by_key(|name| std::cmp::Reverse(name.len()));
        candidates
            .into_iter()
            .find(|name| filename.contains(name.as_str()))
            .cloned()
            .unwrap_or_else(|| self.fallback_version.clone())
    }
}

fn walk_items(
    items: &[CollectionItem],
    folder_path: &mut Vec<String>,
    collection_file: &Path,
    index: &mut BTreeMap<String, PostmanLink>,
) {
    for item in items {
        if let Some(children) = &item.item {
            folder_path.push(item.name.clone());
            walk_items(children, folder_path, collection_file, index);
            folder_path.pop();
            continue;
        }

        let Some(method) = item
            .request
            .as_ref()
            .and_then(|request| request.body.as_ref())
            .and_then(|body| body.raw.as_deref())
            .and_then(method_from_raw_body)
        else {
            continue;
        };

        index.entry(method).or_insert_with(|| PostmanLink {
            collection_file: collection_file.to_path_buf(),
            folder_path: folder_path.clone(),
            request_name: item.name.clone(),
        });
    }
}

fn method_from_raw_body(raw: &str) -> Option<String> {
    let body: Value = serde_json::from_str(raw).ok()?;
    body.get("method")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection_json() -> String {
        serde_json::json!({
            "info": {"name": "API v2"},
            "item": [{
                "name": "Wallet",
                "item": [{
                    "name": "My Balance",
                    "request": {
                        "method": "POST",
                        "body": {"raw": "{\"method\": \"my_balance\", \"coin\": \"KMD\"}"}
                    }
                }, {
                    "name": "No Body"
                }]
            }]
        })
        .to_string()
    }

    #[test]
    fn requests_map_to_link_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let collections = dir.path().join("collections");
        fs::create_dir_all(&collections).unwrap();
        fs::write(collections.join("api_v2_collection.json"), collection_json()).unwrap();

        let scanner = PostmanScanner::new(
            Some(collections),
            vec!["v1".to_string(), "v2".to_string()],
            "v2".to_string(),
        );
        let result = scanner.scan();
        let index = result.version("v2").unwrap();

        let link = &index["my_balance"];
        assert_eq!(link.request_name, "My Balance");
        assert_eq!(link.folder_path, vec!["Wallet".to_string()]);
        assert!(link.collection_file.ends_with("api_v2_collection.json"));
    }

    #[test]
    fn longer_version_names_win_filename_attribution() {
        let scanner = PostmanScanner::new(
            None,
            vec!["v2".to_string(), "v2-dev".to_string()],
            "v2".to_string(),
        );
        assert_eq!(
            scanner.version_for(Path::new("api_v2-dev_collection.json")),
            "v2-dev"
        );
        assert_eq!(scanner.version_for(Path::new("api_v2_collection.json")), "v2");
        assert_eq!(scanner.version_for(Path::new("collection.json")), "v2");
    }

    #[test]
    fn missing_collections_dir_is_a_warning() {
        let scanner = PostmanScanner::new(
            Some(PathBuf::from("/nonexistent/collections")),
            vec!["v1".to_string()],
            "v1".to_string(),
        );
        let result = scanner.scan();
        assert_eq!(result.diagnostics.warning_count(), 1);
        assert!(result.version("v1").unwrap().is_empty());
    }
}
