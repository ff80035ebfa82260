//! Property-based tests for method name normalization.
//!
//! These verify the invariants every token must satisfy:
//! - Canonicalization is idempotent
//! - Folder form round-trips for names the promotion rules apply to
//! - Slugs never contain `::` or `_`
//! - Resolution against an empty index never panics and never matches

use docmap::{canonicalize, from_slug, to_folder, to_slug, MatchResolver, NAMESPACE_PREFIXES};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// A segment as it appears inside canonical names: lowercase with optional
/// single underscores, never hyphens, never a leading/trailing underscore.
fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z](?:[a-z0-9]|_[a-z0-9]){0,6}")
        .expect("valid segment regex")
}

/// Canonical names whose folder form promotes back: either prefixed by a
/// known namespace, or deep enough that the two-hyphen rule applies.
fn promotable_canonical() -> impl Strategy<Value = String> {
    prop_oneof![
        // <prefix>::<segment>{1,3}
        (
            proptest::sample::select(NAMESPACE_PREFIXES.to_vec()),
            proptest::collection::vec(segment(), 1..=3)
        )
            .prop_map(|(prefix, rest)| {
                let mut segments = vec![prefix.to_string()];
                segments.extend(rest);
                segments.join("::")
            }),
        // any three or more segments
        proptest::collection::vec(segment(), 3..=5).prop_map(|segments| segments.join("::")),
    ]
}

/// Arbitrary tokens in any of the three representations.
fn any_token() -> impl Strategy<Value = String> {
    prop_oneof![
        promotable_canonical(),
        promotable_canonical().prop_map(|c| to_folder(&c)),
        promotable_canonical().prop_map(|c| to_slug(&c)),
        segment(),
        Just(String::new()),
    ]
}

proptest! {
    #[test]
    fn canonicalize_is_idempotent(token in any_token()) {
        let once = canonicalize(&token);
        let twice = canonicalize(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn folder_form_round_trips(canonical in promotable_canonical()) {
        let folder = to_folder(&canonical);
        prop_assert_eq!(canonicalize(&folder), canonical);
    }

    #[test]
    fn slugs_are_fully_hyphenated(token in any_token()) {
        let slug = to_slug(&token);
        prop_assert!(!slug.contains("::"));
        prop_assert!(!slug.contains('_'));
    }

    #[test]
    fn slug_recovery_never_leaves_hyphens_in_separator_position(
        canonical in promotable_canonical()
    ) {
        // Recovery of an arbitrary slug is heuristic, but its output is
        // always a well-formed token: hyphens are gone, segments non-empty.
        let recovered = from_slug(&to_slug(&canonical));
        prop_assert!(!recovered.contains('-'));
        prop_assert!(recovered.split("::").all(|segment| !segment.is_empty()));
    }

    #[test]
    fn resolving_against_an_empty_index_is_safe(token in any_token()) {
        let empty: BTreeMap<String, String> = BTreeMap::new();
        let mut resolver = MatchResolver::new(0.7);
        prop_assert!(resolver.resolve(&token, &empty).is_none());
    }

    #[test]
    fn direct_keys_always_resolve_at_the_direct_tier(canonical in promotable_canonical()) {
        let mut index = BTreeMap::new();
        index.insert(canonical.clone(), "value".to_string());
        // A near-identical competitor for the fuzzy tier.
        index.insert(format!("{canonical}x"), "decoy".to_string());

        let mut resolver = MatchResolver::new(0.5);
        let hit = resolver.resolve(&canonical, &index);
        prop_assert_eq!(hit, Some(&"value".to_string()));
        prop_assert_eq!(resolver.stats().direct_matches, 1);
        prop_assert_eq!(resolver.stats().fuzzy_matches, 0);
    }
}
