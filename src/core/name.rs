//! Method name normalization between the three lexical forms an API method
//! shows up in across documentation sources.
//!
//! - **canonical**: `::`-separated segments (`task::enable_utxo::init`), the
//!   form the dispatcher code and request bodies use.
//! - **folder**: `-`-separated top-level segments with underscores preserved
//!   inside a segment (`task-enable_utxo-init`); mirrors on-disk layout.
//! - **slug**: every `::` and `_` replaced by `-` (`task-enable-utxo-init`);
//!   URL-facing and lossy.

use once_cell::sync::Lazy;
use regex::Regex;

/// Namespace prefixes that mark a hyphenated token as folder form even when
/// it contains a single hyphen (`task-withdraw` is `task::withdraw`, but
/// `account-balance` stays a single-segment name).
pub const NAMESPACE_PREFIXES: &[&str] = &[
    "task",
    "stream",
    "lightning",
    "experimental",
    "wallet",
    "gui_storage",
    "non_fungible_tokens",
];

/// Known multi-word segments whose internal hyphens in slug form must be
/// recovered as underscores. Checked longest-first so `enable-z-coin` wins
/// over `z-coin`.
///
/// The table is deliberately a fixed, extendable list: slug recovery is
/// inherently lossy and inferring rules from data would only hide the cases
/// it gets wrong. New multi-word segments get a new row.
const SLUG_SEGMENT_EXCEPTIONS: &[&str] = &[
    "enable-z-coin",
    "enable-utxo",
    "enable-bch",
    "enable-eth",
    "enable-qtum",
    "enable-coin",
    "account-balance",
    "claimable-balances",
    "channel-details",
    "payment-details",
    "close-channel",
    "send-payment",
    "trusted-node",
    "new-address",
    "z-coin",
    "nft-[a-z]+",
];

static SLUG_EXCEPTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SLUG_SEGMENT_EXCEPTIONS
        .iter()
        .map(|pat| Regex::new(pat).expect("static slug exception pattern"))
        .collect()
});

/// Convert a token in any discovered form to canonical `::` form.
///
/// Tokens that already contain `::`, and tokens without any hyphen, pass
/// through unchanged. Hyphenated tokens are promoted to canonical form only
/// when they start with a known namespace prefix or contain at least two
/// hyphens; a lone hyphen in an unprefixed name (`account-balance`) is part
/// of the name, not a separator.
///
/// Idempotent: `canonicalize(canonicalize(x)) == canonicalize(x)`.
pub fn canonicalize(token: &str) -> String {
    if token.contains("::") || !token.contains('-') {
        return token.to_string();
    }

    let prefixed = NAMESPACE_PREFIXES
        .iter()
        .any(|prefix| token.starts_with(&format!("{prefix}-")));
    let hyphens = token.matches('-').count();

    if prefixed || hyphens >= 2 {
        token.replace('-', "::")
    } else {
        token.to_string()
    }
}

/// Convert a canonical name to folder form: `::` becomes `-`, underscores
/// inside a segment are untouched.
///
/// For names produced by [`canonicalize`] this is a lossless inverse:
/// `canonicalize(to_folder(x)) == x` whenever no segment of `x` contains a
/// hyphen.
pub fn to_folder(canonical: &str) -> String {
    canonical.replace("::", "-")
}

/// Convert any form to the URL slug: every `::` and `_` becomes `-`.
/// One-directional; use [`from_slug`] for the best-effort inverse.
pub fn to_slug(token: &str) -> String {
    token.replace("::", "-").replace('_', "-")
}

/// Best-effort recovery of a canonical name from a slug.
///
/// Consults [`SLUG_SEGMENT_EXCEPTIONS`] to reinsert underscores inside known
/// multi-word segments, then promotes the remaining hyphens to `::`. This is
/// a heuristic: a slug outside the exception table whose original name
/// contained underscores will come back wrong, and that is accepted.
pub fn from_slug(slug: &str) -> String {
    if slug.is_empty() {
        return String::new();
    }

    let mut recovered = slug.to_string();
    for pattern in SLUG_EXCEPTION_PATTERNS.iter() {
        recovered = pattern
            .replace_all(&recovered, |caps: &regex::Captures<'_>| {
                caps[0].replace('-', "_")
            })
            .into_owned();
    }

    recovered.replace('-', "::")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn canonical_tokens_pass_through() {
        assert_eq!(canonicalize("task::enable_utxo::init"), "task::enable_utxo::init");
        assert_eq!(canonicalize("orderbook"), "orderbook");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn prefixed_folder_names_are_promoted() {
        assert_eq!(canonicalize("task-enable_utxo"), "task::enable_utxo");
        assert_eq!(canonicalize("stream-balance"), "stream::balance");
        assert_eq!(canonicalize("gui_storage-get_wallets"), "gui_storage::get_wallets");
    }

    #[test]
    fn two_hyphen_names_are_promoted_without_a_prefix() {
        assert_eq!(
            canonicalize("peers-get_peers_info-default"),
            "peers::get_peers_info::default"
        );
    }

    #[test]
    fn single_hyphen_unprefixed_names_are_left_alone() {
        assert_eq!(canonicalize("account-balance"), "account-balance");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        for token in [
            "task-enable_utxo-init",
            "task::enable_utxo::init",
            "account-balance",
            "my_balance",
            "",
        ] {
            let once = canonicalize(token);
            assert_eq!(canonicalize(&once), once, "token {token:?}");
        }
    }

    #[test]
    fn folder_round_trip() {
        let canonical = "task::enable_utxo::init";
        let folder = to_folder(canonical);
        assert_eq!(folder, "task-enable_utxo-init");
        assert_eq!(canonicalize(&folder), canonical);
    }

    #[test]
    fn slug_flattens_every_separator() {
        assert_eq!(to_slug("task::enable_utxo::init"), "task-enable-utxo-init");
        assert_eq!(to_slug("my_balance"), "my-balance");
        assert_eq!(to_slug("orderbook"), "orderbook");
    }

    #[test]
    fn slug_recovery_uses_the_exception_table() {
        assert_eq!(from_slug("task-enable-utxo-init"), "task::enable_utxo::init");
        assert_eq!(from_slug("task-enable-z-coin-status"), "task::enable_z_coin::status");
        assert_eq!(from_slug("lightning-channels-close-channel"), "lightning::channels::close_channel");
        assert_eq!(from_slug("nft-list"), "nft_list");
    }

    #[test]
    fn slug_recovery_falls_back_to_naive_promotion() {
        assert_eq!(from_slug("stream-orderbook-start"), "stream::orderbook::start");
        assert_eq!(from_slug("orderbook"), "orderbook");
        assert_eq!(from_slug(""), "");
    }
}
