//! Core data model for the unified method mapping.

pub mod name;
pub mod resolve;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::core::resolve::MatchStats;
use crate::errors::RunDiagnostics;

/// Logical identifier of one API method.
///
/// The canonical form is an ordered sequence of one or more segments;
/// equality and ordering are defined over that sequence, never over whatever
/// raw string a scanner happened to discover. Construction goes through
/// [`name::canonicalize`], so a folder-form token and its canonical form
/// produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodName {
    segments: Vec<String>,
}

impl MethodName {
    /// Parse a method token in any discovered lexical form.
    pub fn parse(raw: &str) -> Self {
        let canonical = name::canonicalize(raw.trim());
        let segments = if canonical.is_empty() {
            Vec::new()
        } else {
            canonical.split("::").map(str::to_string).collect()
        };
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The `::`-joined canonical rendering.
    pub fn as_canonical(&self) -> String {
        self.segments.join("::")
    }

    /// The `-`-joined folder rendering (underscores preserved).
    pub fn folder(&self) -> String {
        self.segments.join("-")
    }

    /// The fully hyphenated URL slug (lossy).
    pub fn slug(&self) -> String {
        name::to_slug(&self.as_canonical())
    }
}

impl fmt::Display for MethodName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_canonical())
    }
}

impl Serialize for MethodName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_canonical())
    }
}

impl<'de> Deserialize<'de> for MethodName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MethodNameVisitor;

        impl Visitor<'_> for MethodNameVisitor {
            type Value = MethodName;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a method name string")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<MethodName, E> {
                Ok(MethodName::parse(value))
            }
        }

        deserializer.deserialize_str(MethodNameVisitor)
    }
}

/// Link metadata for a method's entry in a collaboration-tool collection
/// export. Presence-only: it never counts toward documentation coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostmanLink {
    pub collection_file: PathBuf,
    pub folder_path: Vec<String>,
    pub request_name: String,
}

/// One method's location pointers across every source, for one version.
///
/// Constructed fresh each run by the mapping builder and never mutated
/// afterwards; the JSON artifact is an immutable snapshot of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMapping {
    pub method: MethodName,
    pub version: String,
    pub docs_path: Option<PathBuf>,
    pub spec_path: Option<PathBuf>,
    pub examples_path: Option<PathBuf>,
    pub example_count: usize,
    pub postman: Option<PostmanLink>,
}

impl MethodMapping {
    pub fn new(method: MethodName, version: impl Into<String>) -> Self {
        Self {
            method,
            version: version.into(),
            docs_path: None,
            spec_path: None,
            examples_path: None,
            example_count: 0,
            postman: None,
        }
    }

    pub fn has_docs(&self) -> bool {
        self.docs_path.is_some()
    }

    pub fn has_spec(&self) -> bool {
        self.spec_path.is_some()
    }

    pub fn has_examples(&self) -> bool {
        self.example_count > 0
    }

    pub fn has_postman(&self) -> bool {
        self.postman.is_some()
    }

    /// Complete means prose docs and a path spec both exist; examples and
    /// collection links are tracked separately.
    pub fn is_complete(&self) -> bool {
        self.has_docs() && self.has_spec()
    }
}

/// One version's unified map. Keying by [`MethodName`] makes the canonical
/// name unique within the version and keeps output lexicographically sorted.
pub type VersionMap = BTreeMap<MethodName, MethodMapping>;

/// Authoritative per-version method sets extracted from dispatcher code.
pub type CanonicalMethodSet = BTreeMap<String, BTreeSet<MethodName>>;

/// The full result of one build run: per-version unified maps, the ground
/// truth they are measured against, resolver tier counters, and every
/// diagnostic the run absorbed instead of aborting on.
#[derive(Debug, Clone, Default)]
pub struct UnifiedMapping {
    pub versions: BTreeMap<String, VersionMap>,
    pub canonical: CanonicalMethodSet,
    pub match_stats: MatchStats,
    pub diagnostics: RunDiagnostics,
}

impl UnifiedMapping {
    /// Total method count across every version.
    pub fn total_methods(&self) -> usize {
        self.versions.values().map(BTreeMap::len).sum()
    }

    /// The documented set for a version: every method with a unified entry,
    /// regardless of which individual source populated it.
    pub fn documented(&self, version: &str) -> BTreeSet<MethodName> {
        self.versions
            .get(version)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn method_name_equality_is_over_segments() {
        let canonical = MethodName::parse("task::enable_utxo::init");
        let folder = MethodName::parse("task-enable_utxo-init");
        assert_eq!(canonical, folder);
        assert_eq!(canonical.segments().len(), 3);
    }

    #[test]
    fn method_name_renders_each_form() {
        let name = MethodName::parse("task::enable_utxo::init");
        assert_eq!(name.as_canonical(), "task::enable_utxo::init");
        assert_eq!(name.folder(), "task-enable_utxo-init");
        assert_eq!(name.slug(), "task-enable-utxo-init");
    }

    #[test]
    fn method_name_serializes_as_canonical_string() {
        let name = MethodName::parse("task-enable_utxo-init");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"task::enable_utxo::init\"");
        let back: MethodName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }

    #[test]
    fn empty_token_has_no_segments() {
        let name = MethodName::parse("");
        assert!(name.segments().is_empty());
        assert_eq!(name.as_canonical(), "");
    }

    #[test]
    fn completeness_requires_docs_and_spec() {
        let mut mapping = MethodMapping::new(MethodName::parse("orderbook"), "v1");
        assert!(!mapping.is_complete());
        mapping.docs_path = Some(PathBuf::from("docs/orderbook/index.mdx"));
        assert!(!mapping.is_complete());
        mapping.spec_path = Some(PathBuf::from("openapi/paths/v1/orderbook.yaml"));
        assert!(mapping.is_complete());
        assert!(!mapping.has_examples());
    }
}
