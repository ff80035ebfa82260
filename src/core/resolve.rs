//! Best-match resolution of a canonical method name against one scanner's
//! native-keyed index.
//!
//! Resolution is strictly tiered (direct, variation, fuzzy, no-match) and
//! the first tier that produces a hit wins. There is no cross-tier scoring:
//! a weak direct match can never be displaced by a strong fuzzy one.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::name;

/// Run-scoped counters of how matches were resolved, keyed by tier.
///
/// Each build task owns its own instance; the per-task counters are summed
/// once all tasks have joined, so no locking is involved. Counters are reset
/// explicitly at the start of a run rather than relying on process lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    pub direct_matches: u64,
    pub variation_matches: u64,
    pub fuzzy_matches: u64,
    pub no_matches: u64,
}

impl MatchStats {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold another task's counters into this one.
    pub fn absorb(&mut self, other: &MatchStats) {
        self.direct_matches += other.direct_matches;
        self.variation_matches += other.variation_matches;
        self.fuzzy_matches += other.fuzzy_matches;
        self.no_matches += other.no_matches;
    }

    pub fn total_lookups(&self) -> u64 {
        self.direct_matches + self.variation_matches + self.fuzzy_matches + self.no_matches
    }
}

/// Tiered matcher from canonical names to one source's native keys.
pub struct MatchResolver {
    fuzzy_threshold: f64,
    stats: MatchStats,
}

impl MatchResolver {
    /// `fuzzy_threshold` is the normalized-similarity score a fuzzy candidate
    /// must strictly exceed to be accepted; it comes from configuration, not
    /// from a literal at the call site.
    pub fn new(fuzzy_threshold: f64) -> Self {
        Self {
            fuzzy_threshold,
            stats: MatchStats::default(),
        }
    }

    pub fn stats(&self) -> &MatchStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    pub fn into_stats(self) -> MatchStats {
        self.stats
    }

    /// Resolve `canonical` against a native-keyed index, returning the value
    /// for the best-matching key, or `None` when nothing matches.
    ///
    /// No-match is an ordinary outcome, not an error. The index is never
    /// mutated; an empty index short-circuits to no-match.
    pub fn resolve<'a, V>(&mut self, canonical: &str, index: &'a BTreeMap<String, V>) -> Option<&'a V> {
        if canonical.is_empty() || index.is_empty() {
            self.stats.no_matches += 1;
            return None;
        }

        if let Some(value) = index.get(canonical) {
            self.stats.direct_matches += 1;
            return Some(value);
        }

        for variation in variations(canonical) {
            if let Some(value) = index.get(&variation) {
                self.stats.variation_matches += 1;
                return Some(value);
            }
        }

        if let Some(key) = self.fuzzy_candidate(canonical, index) {
            self.stats.fuzzy_matches += 1;
            return index.get(&key);
        }

        self.stats.no_matches += 1;
        None
    }

    /// The single best fuzzy candidate, if its score strictly exceeds the
    /// threshold. Iteration over a `BTreeMap` is lexicographic and a later
    /// candidate must score strictly higher to displace the current best, so
    /// ties resolve to the lexicographically smallest key.
    fn fuzzy_candidate<V>(&self, canonical: &str, index: &BTreeMap<String, V>) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;
        for key in index.keys() {
            let score = strsim::normalized_levenshtein(canonical, key);
            if score <= self.fuzzy_threshold {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((key, score)),
            }
        }
        best.map(|(key, _)| key.to_string())
    }
}

/// The fixed set of alternate textual forms tried at the variation tier, in
/// order: the folder form, and, when the name is itself hyphenated, the
/// colon-substituted form.
fn variations(canonical: &str) -> Vec<String> {
    let mut forms = Vec::with_capacity(2);

    let folder = name::to_folder(canonical);
    if folder != canonical {
        forms.push(folder);
    }

    if canonical.contains('-') {
        forms.push(canonical.replace('-', "::"));
    }

    forms
}
