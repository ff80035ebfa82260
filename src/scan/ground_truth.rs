//! Ground-truth loader.
//!
//! The authoritative method list comes from a separate dispatcher-code
//! extraction step as a JSON document mapping version to method-name list.
//! Absence or malformation never fails the run: the affected versions get an
//! empty canonical set and a recorded warning, and coverage later reads 0%.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use crate::core::{CanonicalMethodSet, MethodName};
use crate::errors::{DocmapError, RunDiagnostics};

pub struct GroundTruthLoader {
    path: Option<PathBuf>,
    /// Versions that must each carry a (possibly empty) canonical set.
    versions: Vec<String>,
}

impl GroundTruthLoader {
    pub fn new(path: Option<PathBuf>, versions: Vec<String>) -> Self {
        Self { path, versions }
    }

    pub fn load(&self) -> (CanonicalMethodSet, RunDiagnostics) {
        let mut diagnostics = RunDiagnostics::new();

        let raw = match self.read_raw(&mut diagnostics) {
            Some(raw) => raw,
            None => BTreeMap::new(),
        };

        let mut canonical: CanonicalMethodSet = BTreeMap::new();
        for version in &self.versions {
            canonical.entry(version.clone()).or_default();
        }
        for (version, methods) in raw {
            let set: BTreeSet<MethodName> =
                methods.iter().map(|raw| MethodName::parse(raw)).collect();
            canonical.insert(version, set);
        }

        (canonical, diagnostics)
    }

    fn read_raw(&self, diagnostics: &mut RunDiagnostics) -> Option<BTreeMap<String, Vec<String>>> {
        let Some(path) = &self.path else {
            self.warn_all(diagnostics, "no ground-truth artifact configured");
            return None;
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                self.warn_all(
                    diagnostics,
                    &format!("ground-truth artifact unreadable ({}): {err}", path.display()),
                );
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(raw) => Some(raw),
            Err(err) => {
                self.warn_all(
                    diagnostics,
                    &format!("ground-truth artifact malformed ({}): {err}", path.display()),
                );
                None
            }
        }
    }

    /// One warning per configured version, so each version's report carries
    /// its own degradation notice.
    fn warn_all(&self, diagnostics: &mut RunDiagnostics, reason: &str) {
        for version in &self.versions {
            diagnostics.warn(DocmapError::GroundTruthMissing {
                version: version.clone(),
                reason: reason.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_the_flat_version_to_methods_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_methods.json");
        fs::write(
            &path,
            r#"{"v2": ["task::enable_utxo::init", "task::enable_utxo::status"], "v1": ["orderbook"]}"#,
        )
        .unwrap();

        let loader = GroundTruthLoader::new(
            Some(path),
            vec!["v1".to_string(), "v2".to_string()],
        );
        let (canonical, diagnostics) = loader.load();

        assert_eq!(canonical["v2"].len(), 2);
        assert!(canonical["v2"].contains(&MethodName::parse("task::enable_utxo::init")));
        assert_eq!(canonical["v1"].len(), 1);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn missing_artifact_degrades_with_one_warning_per_version() {
        let loader = GroundTruthLoader::new(
            Some(PathBuf::from("/nonexistent/api_methods.json")),
            vec!["v1".to_string(), "v2".to_string()],
        );
        let (canonical, diagnostics) = loader.load();

        assert!(canonical["v1"].is_empty());
        assert!(canonical["v2"].is_empty());
        assert_eq!(diagnostics.warning_count(), 2);
    }

    #[test]
    fn malformed_artifact_degrades_the_same_way() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_methods.json");
        fs::write(&path, "not json at all").unwrap();

        let loader = GroundTruthLoader::new(Some(path), vec!["v2".to_string()]);
        let (canonical, diagnostics) = loader.load();

        assert!(canonical["v2"].is_empty());
        assert_eq!(diagnostics.warning_count(), 1);
    }
}
