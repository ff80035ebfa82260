//! Unified-mapping construction.
//!
//! The builder fans out every scan concurrently, joins them at a single
//! barrier, and only then merges; the merge never observes a partially
//! completed scan set. Per-version assembly runs as independent parallel
//! tasks, each owning a private [`MatchResolver`]; tier counters and
//! diagnostics are summed after the tasks join, so nothing is locked.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::DocmapConfig;
use crate::core::resolve::{MatchResolver, MatchStats};
use crate::core::{CanonicalMethodSet, MethodMapping, MethodName, UnifiedMapping, VersionMap};
use crate::errors::RunDiagnostics;
use crate::scan::{
    DocsScan, DocsScanner, ExampleLocation, ExamplesScanner, GroundTruthLoader, NativeIndex,
    PostmanScanner, SpecScanner, SourceScan,
};

pub struct MappingBuilder<'a> {
    config: &'a DocmapConfig,
    root: &'a Path,
}

struct VersionBuild {
    version: String,
    map: VersionMap,
    stats: MatchStats,
    overview_filtered: usize,
}

impl<'a> MappingBuilder<'a> {
    pub fn new(config: &'a DocmapConfig, root: &'a Path) -> Self {
        Self { config, root }
    }

    /// Run every scan, assemble one `MethodMapping` per method in the union
    /// of ground truth and discovered keys, then fold alias versions into
    /// their primaries. Never fails: every per-source problem is recorded in
    /// the result's diagnostics instead.
    pub fn build(&self) -> UnifiedMapping {
        let version_names = self.version_names();

        let docs_scanner = DocsScanner::new(self.config.docs_roots(self.root));
        let spec_scanner = SpecScanner::new(self.config.spec_roots(self.root));
        let examples_scanner = ExamplesScanner::new(self.config.examples_roots(self.root));
        let postman_scanner = PostmanScanner::new(
            self.config.collections_path(self.root),
            version_names.clone(),
            self.config
                .primary_versions()
                .last()
                .cloned()
                .unwrap_or_else(|| "v2".to_string()),
        );
        let ground_truth = GroundTruthLoader::new(
            self.config.ground_truth_path(self.root),
            self.config.primary_versions(),
        );

        // Fan-out with one join barrier: nothing below runs until every scan
        // has completed.
        let ((docs, specs), (examples, (postman, (mut canonical, ground_diag)))) = rayon::join(
            || rayon::join(|| docs_scanner.scan(), || spec_scanner.scan()),
            || {
                rayon::join(
                    || examples_scanner.scan(),
                    || rayon::join(|| postman_scanner.scan(), || ground_truth.load()),
                )
            },
        );

        let mut diagnostics = RunDiagnostics::new();
        diagnostics.merge(docs.scan.diagnostics.clone());
        diagnostics.merge(specs.diagnostics.clone());
        diagnostics.merge(examples.diagnostics.clone());
        diagnostics.merge(postman.diagnostics.clone());
        diagnostics.merge(ground_diag);

        let threshold = self.config.matching.fuzzy_threshold;
        let builds: Vec<VersionBuild> = version_names
            .par_iter()
            .map(|version| {
                build_version(version, threshold, &docs, &specs, &examples, &postman, &canonical)
            })
            .collect();

        let mut versions: BTreeMap<String, VersionMap> = BTreeMap::new();
        let mut match_stats = MatchStats::default();
        for build in builds {
            match_stats.absorb(&build.stats);
            if build.overview_filtered > 0 {
                log::info!(
                    "filtered {} overview page method(s) from {}",
                    build.overview_filtered,
                    build.version
                );
            }
            versions.insert(build.version, build.map);
        }

        let merged = merge_alias_versions(&mut versions, &mut canonical, &self.config.aliases);
        if merged > 0 {
            log::info!("merged {merged} alias-version method(s) into their primary versions");
        }

        UnifiedMapping {
            versions,
            canonical,
            match_stats,
            diagnostics,
        }
    }

    /// Configured version names, deduplicated, in config order.
    fn version_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for version in &self.config.versions {
            if !names.contains(&version.name) {
                names.push(version.name.clone());
            }
        }
        names
    }
}

fn build_version(
    version: &str,
    fuzzy_threshold: f64,
    docs: &DocsScan,
    specs: &SourceScan<std::path::PathBuf>,
    examples: &SourceScan<ExampleLocation>,
    postman: &SourceScan<crate::core::PostmanLink>,
    canonical: &CanonicalMethodSet,
) -> VersionBuild {
    let empty_paths: NativeIndex<std::path::PathBuf> = BTreeMap::new();
    let empty_examples: NativeIndex<ExampleLocation> = BTreeMap::new();
    let empty_postman: NativeIndex<crate::core::PostmanLink> = BTreeMap::new();

    let docs_index = docs.scan.version(version).unwrap_or(&empty_paths);
    let spec_index = specs.version(version).unwrap_or(&empty_paths);
    let examples_index = examples.version(version).unwrap_or(&empty_examples);
    let postman_index = postman.version(version).unwrap_or(&empty_postman);

    // Canonicalize every discovered key. The collaboration-tool source is
    // deliberately absent here: it only ever sets a presence flag and must
    // not introduce methods into coverage accounting.
    let mut all_methods: BTreeSet<MethodName> = BTreeSet::new();
    all_methods.extend(docs_index.keys().map(|key| MethodName::parse(key)));
    all_methods.extend(spec_index.keys().map(|key| MethodName::parse(key)));
    all_methods.extend(examples_index.keys().map(|key| MethodName::parse(key)));
    if let Some(canonical_set) = canonical.get(version) {
        all_methods.extend(canonical_set.iter().cloned());
    }

    let mut resolver = MatchResolver::new(fuzzy_threshold);
    let mut map = VersionMap::new();
    let mut overview_filtered = 0usize;

    for method in &all_methods {
        if method.segments().is_empty() {
            continue;
        }
        let canonical_str = method.as_canonical();
        let mut mapping = MethodMapping::new(method.clone(), version);

        mapping.docs_path = resolver.resolve(&canonical_str, docs_index).cloned();
        if let Some(path) = &mapping.docs_path {
            // Category pages are excluded from method-level accounting
            // entirely, not merely marked undocumented.
            if docs.overview_pages.contains(path) {
                overview_filtered += 1;
                continue;
            }
        }

        mapping.spec_path = resolver.resolve(&canonical_str, spec_index).cloned();
        if let Some(location) = resolver.resolve(&canonical_str, examples_index) {
            mapping.examples_path = Some(location.dir.clone());
            mapping.example_count = location.count;
        }
        mapping.postman = resolver.resolve(&canonical_str, postman_index).cloned();

        map.insert(method.clone(), mapping);
    }

    VersionBuild {
        version: version.to_string(),
        map,
        stats: *resolver.stats(),
        overview_filtered,
    }
}

/// Fold alias versions into their primaries, for both the unified maps and
/// the canonical sets. A method already present under the primary keeps the
/// primary entry; alias-only methods are re-tagged and moved. Running this
/// twice is a no-op: the first pass removes the alias keys.
pub fn merge_alias_versions(
    versions: &mut BTreeMap<String, VersionMap>,
    canonical: &mut CanonicalMethodSet,
    aliases: &BTreeMap<String, String>,
) -> usize {
    let mut merged = 0usize;

    for (alias, primary) in aliases {
        if let Some(alias_map) = versions.remove(alias) {
            let primary_map = versions.entry(primary.clone()).or_default();
            for (method, mut mapping) in alias_map {
                if !primary_map.contains_key(&method) {
                    mapping.version = primary.clone();
                    primary_map.insert(method, mapping);
                    merged += 1;
                }
            }
        }

        if let Some(alias_set) = canonical.remove(alias) {
            canonical.entry(primary.clone()).or_default().extend(alias_set);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping_for(version: &str, name: &str) -> (MethodName, MethodMapping) {
        let method = MethodName::parse(name);
        (method.clone(), MethodMapping::new(method, version))
    }

    fn version_map(version: &str, names: &[&str]) -> VersionMap {
        names.iter().map(|name| mapping_for(version, name)).collect()
    }

    #[test]
    fn alias_methods_move_into_the_primary_and_are_retagged() {
        let mut versions = BTreeMap::from([
            ("v2".to_string(), version_map("v2", &["orderbook"])),
            (
                "v2-dev".to_string(),
                version_map("v2-dev", &["orderbook", "task::enable_eth::init"]),
            ),
        ]);
        let mut canonical: CanonicalMethodSet = BTreeMap::new();
        let aliases = BTreeMap::from([("v2-dev".to_string(), "v2".to_string())]);

        let merged = merge_alias_versions(&mut versions, &mut canonical, &aliases);

        assert_eq!(merged, 1);
        assert!(!versions.contains_key("v2-dev"));
        let v2 = &versions["v2"];
        assert_eq!(v2.len(), 2);
        assert_eq!(v2[&MethodName::parse("task::enable_eth::init")].version, "v2");
        // The method present under both kept the primary entry.
        assert_eq!(v2[&MethodName::parse("orderbook")].version, "v2");
    }

    #[test]
    fn alias_merge_is_idempotent() {
        let mut versions = BTreeMap::from([
            ("v2".to_string(), version_map("v2", &["orderbook"])),
            ("v2-dev".to_string(), version_map("v2-dev", &["my_balance"])),
        ]);
        let mut canonical: CanonicalMethodSet = BTreeMap::from([
            ("v2-dev".to_string(), BTreeSet::from([MethodName::parse("my_balance")])),
        ]);
        let aliases = BTreeMap::from([("v2-dev".to_string(), "v2".to_string())]);

        merge_alias_versions(&mut versions, &mut canonical, &aliases);
        let snapshot = versions.clone();
        let canonical_snapshot = canonical.clone();

        let second = merge_alias_versions(&mut versions, &mut canonical, &aliases);
        assert_eq!(second, 0);
        assert_eq!(versions, snapshot);
        assert_eq!(canonical, canonical_snapshot);
        assert!(canonical["v2"].contains(&MethodName::parse("my_balance")));
    }

    #[test]
    fn canonical_only_methods_still_get_a_unified_entry() {
        let docs = DocsScan::default();
        let specs = SourceScan::new();
        let examples = SourceScan::new();
        let postman = SourceScan::new();
        let canonical: CanonicalMethodSet = BTreeMap::from([(
            "v2".to_string(),
            BTreeSet::from([MethodName::parse("task::enable_utxo::init")]),
        )]);

        let build = build_version("v2", 0.7, &docs, &specs, &examples, &postman, &canonical);

        assert_eq!(build.map.len(), 1);
        let entry = &build.map[&MethodName::parse("task::enable_utxo::init")];
        assert!(!entry.has_docs());
        assert!(!entry.has_spec());
    }

    #[test]
    fn discovered_folder_form_keys_resolve_back_to_their_native_index() {
        let mut docs = DocsScan::default();
        docs.scan
            .by_version
            .entry("v2".to_string())
            .or_default()
            .insert(
                "task-enable_utxo-init".to_string(),
                std::path::PathBuf::from("/a.mdx"),
            );
        let specs = SourceScan::new();
        let examples = SourceScan::new();
        let postman = SourceScan::new();
        let canonical = CanonicalMethodSet::new();

        let build = build_version("v2", 0.7, &docs, &specs, &examples, &postman, &canonical);

        let entry = &build.map[&MethodName::parse("task::enable_utxo::init")];
        assert_eq!(entry.docs_path.as_deref(), Some(Path::new("/a.mdx")));
        assert_eq!(build.stats.variation_matches, 1);
    }

    #[test]
    fn overview_flagged_docs_exclude_the_method_entirely() {
        let mut docs = DocsScan::default();
        let page = std::path::PathBuf::from("/docs/wallet/index.mdx");
        docs.scan
            .by_version
            .entry("v2".to_string())
            .or_default()
            .insert("wallet".to_string(), page.clone());
        docs.overview_pages.insert(page);

        let specs = SourceScan::new();
        let examples = SourceScan::new();
        let postman = SourceScan::new();
        let canonical: CanonicalMethodSet = BTreeMap::from([(
            "v2".to_string(),
            BTreeSet::from([MethodName::parse("wallet")]),
        )]);

        let build = build_version("v2", 0.7, &docs, &specs, &examples, &postman, &canonical);

        assert!(build.map.is_empty());
        assert_eq!(build.overview_filtered, 1);
    }
}
