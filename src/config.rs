//! Run configuration, loaded from `docmap.toml` and overridden by CLI flags.
//!
//! Configuration is constructed explicitly and injected into the components
//! that need it; there is no process-global config cell.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory set for one documentation version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionConfig {
    /// Version name as it appears in every report (`v1`, `v2`, `v2-dev`).
    pub name: String,

    /// Root of the MDX prose docs for this version.
    #[serde(default)]
    pub docs_dir: Option<PathBuf>,

    /// Flat directory of OpenAPI path-spec YAML files.
    #[serde(default)]
    pub spec_dir: Option<PathBuf>,

    /// Root of the JSON request-example tree.
    #[serde(default)]
    pub examples_dir: Option<PathBuf>,
}

/// Matching knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Normalized-similarity score a fuzzy candidate must strictly exceed to
    /// be accepted. The default of 0.7 corresponds to roughly one third of
    /// the characters differing, which is where false matches start to
    /// outnumber real ones in practice.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the unified-mapping JSON snapshot is written, relative to the
    /// analysis root unless absolute.
    #[serde(default = "default_artifact_path")]
    pub artifact: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact: default_artifact_path(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocmapConfig {
    /// Versions to scan, each with its own directory set.
    #[serde(default = "default_versions")]
    pub versions: Vec<VersionConfig>,

    /// Alias version -> primary version. Alias versions are previews of the
    /// primary; their methods merge into the primary after the build.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,

    /// Ground-truth artifact: JSON mapping version -> method-name list
    /// extracted from dispatcher source code.
    #[serde(default = "default_ground_truth")]
    pub ground_truth: Option<PathBuf>,

    /// Directory of collaboration-tool collection exports.
    #[serde(default = "default_collections_dir")]
    pub collections_dir: Option<PathBuf>,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for DocmapConfig {
    fn default() -> Self {
        Self {
            versions: default_versions(),
            aliases: default_aliases(),
            ground_truth: default_ground_truth(),
            collections_dir: default_collections_dir(),
            matching: MatchingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_fuzzy_threshold() -> f64 {
    0.7
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("unified_method_mapping.json")
}

fn default_ground_truth() -> Option<PathBuf> {
    Some(PathBuf::from("api_methods.json"))
}

fn default_collections_dir() -> Option<PathBuf> {
    Some(PathBuf::from("collections"))
}

fn default_aliases() -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    aliases.insert("v2-dev".to_string(), "v2".to_string());
    aliases
}

fn default_versions() -> Vec<VersionConfig> {
    vec![
        VersionConfig {
            name: "v1".to_string(),
            docs_dir: Some(PathBuf::from("docs/v1")),
            spec_dir: Some(PathBuf::from("openapi/paths/v1")),
            examples_dir: Some(PathBuf::from("requests/v1")),
        },
        VersionConfig {
            name: "v2".to_string(),
            docs_dir: Some(PathBuf::from("docs/v2")),
            spec_dir: Some(PathBuf::from("openapi/paths/v2")),
            examples_dir: Some(PathBuf::from("requests/v2")),
        },
        VersionConfig {
            name: "v2-dev".to_string(),
            docs_dir: Some(PathBuf::from("docs/v2-dev")),
            spec_dir: Some(PathBuf::from("openapi/paths/v2")),
            examples_dir: Some(PathBuf::from("requests/v2")),
        },
    ]
}

impl DocmapConfig {
    /// Load from an explicit path, or from `docmap.toml` under `root` when
    /// present, or fall back to defaults. An explicit path that fails to
    /// load is an error; an absent conventional file is not.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let conventional = root.join("docmap.toml");
        if conventional.is_file() {
            return Self::from_file(&conventional);
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate().map_err(|message| {
            anyhow::anyhow!("Invalid config {}: {}", path.display(), message)
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.matching.fuzzy_threshold) {
            return Err(format!(
                "matching.fuzzy_threshold must be between 0.0 and 1.0, got {}",
                self.matching.fuzzy_threshold
            ));
        }
        for (alias, primary) in &self.aliases {
            if alias == primary {
                return Err(format!("version {alias} cannot alias itself"));
            }
        }
        Ok(())
    }

    /// The primary version a name resolves to (itself unless aliased).
    pub fn primary_version<'a>(&'a self, version: &'a str) -> &'a str {
        self.aliases.get(version).map(String::as_str).unwrap_or(version)
    }

    /// Version names after collapsing aliases into their primaries,
    /// deduplicated and sorted.
    pub fn primary_versions(&self) -> Vec<String> {
        let mut primaries: Vec<String> = self
            .versions
            .iter()
            .map(|v| self.primary_version(&v.name).to_string())
            .collect();
        primaries.sort();
        primaries.dedup();
        primaries
    }

    fn resolve_dir(root: &Path, dir: &Path) -> PathBuf {
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            root.join(dir)
        }
    }

    /// version -> absolute docs root, for every version that configures one.
    pub fn docs_roots(&self, root: &Path) -> BTreeMap<String, PathBuf> {
        self.versions
            .iter()
            .filter_map(|v| {
                v.docs_dir
                    .as_ref()
                    .map(|dir| (v.name.clone(), Self::resolve_dir(root, dir)))
            })
            .collect()
    }

    /// version -> absolute spec root.
    pub fn spec_roots(&self, root: &Path) -> BTreeMap<String, PathBuf> {
        self.versions
            .iter()
            .filter_map(|v| {
                v.spec_dir
                    .as_ref()
                    .map(|dir| (v.name.clone(), Self::resolve_dir(root, dir)))
            })
            .collect()
    }

    /// version -> absolute examples root.
    pub fn examples_roots(&self, root: &Path) -> BTreeMap<String, PathBuf> {
        self.versions
            .iter()
            .filter_map(|v| {
                v.examples_dir
                    .as_ref()
                    .map(|dir| (v.name.clone(), Self::resolve_dir(root, dir)))
            })
            .collect()
    }

    pub fn ground_truth_path(&self, root: &Path) -> Option<PathBuf> {
        self.ground_truth
            .as_ref()
            .map(|path| Self::resolve_dir(root, path))
    }

    pub fn collections_path(&self, root: &Path) -> Option<PathBuf> {
        self.collections_dir
            .as_ref()
            .map(|path| Self::resolve_dir(root, path))
    }

    pub fn artifact_path(&self, root: &Path) -> PathBuf {
        Self::resolve_dir(root, &self.output.artifact)
    }
}
