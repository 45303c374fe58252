//! Property-based tests for the list codec and settings derivation

use std::sync::Arc;

use cb_core::taxonomy::{
    AD_LIST, ANALYTIC_LIST, CONTENT_LIST, CRYPTOMINING_LIST, EMAIL_LIST, FINGERPRINTING_LIST,
    SOCIAL_LIST, TEST_LIST,
};
use cb_core::{AntiTracking, CookieBehavior, Settings, StatusFlags, Taxonomy, TokenTable};
use proptest::prelude::*;

const CORE: [(AntiTracking, &str); 5] = [
    (AntiTracking::TEST, TEST_LIST),
    (AntiTracking::AD, AD_LIST),
    (AntiTracking::ANALYTIC, ANALYTIC_LIST),
    (AntiTracking::SOCIAL, SOCIAL_LIST),
    (AntiTracking::CONTENT, CONTENT_LIST),
];

const FEATURES: [(AntiTracking, &str); 3] = [
    (AntiTracking::CRYPTOMINING, CRYPTOMINING_LIST),
    (AntiTracking::FINGERPRINTING, FINGERPRINTING_LIST),
    (AntiTracking::EMAIL, EMAIL_LIST),
];

fn core_flags() -> impl Strategy<Value = AntiTracking> {
    proptest::sample::subsequence(CORE.to_vec(), 0..=CORE.len())
        .prop_map(|entries| entries.into_iter().fold(AntiTracking::empty(), |acc, (c, _)| acc | c))
}

fn union(entries: &[(AntiTracking, &str)]) -> AntiTracking {
    entries.iter().fold(AntiTracking::empty(), |acc, (c, _)| acc | *c)
}

proptest! {
    #[test]
    fn decode_inverts_encode(flags in core_flags()) {
        let table = TokenTable::single(CORE).expect("valid table");
        prop_assert_eq!(table.decode(Some(table.encode(flags).as_str())), flags);
    }

    #[test]
    fn encode_ignores_insertion_order(mut entries in proptest::sample::subsequence(CORE.to_vec(), 0..=CORE.len())) {
        let table = TokenTable::single(CORE).expect("valid table");
        let forward = union(&entries);
        entries.reverse();
        prop_assert_eq!(table.encode(forward), table.encode(union(&entries)));
    }

    #[test]
    fn classification_is_union_of_tables(
        core in proptest::sample::subsequence(CORE.to_vec(), 0..=CORE.len()),
        features in proptest::sample::subsequence(FEATURES.to_vec(), 0..=FEATURES.len()),
        noise in proptest::collection::vec("[a-z]{3,8}-list", 0..3),
        seed in any::<u64>(),
    ) {
        let taxonomy = Taxonomy::standard().expect("standard taxonomy");
        let mut tokens: Vec<String> = core
            .iter()
            .chain(features.iter())
            .map(|(_, t)| t.to_string())
            .chain(noise)
            .collect();
        // Deterministic rotation stands in for an arbitrary order.
        if !tokens.is_empty() {
            let len = tokens.len();
            tokens.rotate_left((seed % len as u64) as usize);
        }
        let list = tokens.join(",");

        prop_assert_eq!(
            taxonomy.classify_anti_tracking(Some(list.as_str())),
            union(&core) | union(&features)
        );
    }

    #[test]
    fn derived_settings_are_snapshots(purging in any::<bool>(), at in core_flags()) {
        let taxonomy = Arc::new(Taxonomy::standard().expect("standard taxonomy"));
        let mut source = Settings::new(taxonomy);
        source.set_cookie_purging(purging).set_anti_tracking(at);

        let derived = Settings::derive_from(&source);
        prop_assert_eq!(&derived, &source);

        source
            .set_cookie_purging(!purging)
            .set_anti_tracking(AntiTracking::all())
            .set_cookie_behavior(CookieBehavior::AcceptAll);
        prop_assert_eq!(derived.cookie_purging(), purging);
        prop_assert_eq!(derived.anti_tracking_categories(), at);
    }

    #[test]
    fn cookies_loaded_always_wins(bits in any::<u64>()) {
        let status = StatusFlags::from_raw(bits) | StatusFlags::COOKIES_LOADED;
        prop_assert_eq!(
            cb_core::classify::classify_cookie_status(status),
            CookieBehavior::AcceptNone
        );
    }
}
