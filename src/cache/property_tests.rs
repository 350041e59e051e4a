//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store invariants over generated operation sequences.

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::CacheStore;

// == Strategies ==
/// Generates valid cache keys (non-empty)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,32}".prop_map(|s| s)
}

/// Generates arbitrary JSON payloads of a few shapes
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,64}".prop_map(Value::String),
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(Value::Bool),
        ("[a-z]{1,8}", "[a-z0-9]{0,16}").prop_map(|(k, v)| {
            let mut fields = serde_json::Map::new();
            fields.insert(k, Value::String(v));
            Value::Object(fields)
        }),
        Just(Value::Null),
    ]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: Value },
    Get { key: String },
    Exists { key: String },
    Remove { key: String },
    All,
    Search { pattern: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Exists { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Remove { key }),
        Just(CacheOp::All),
        "[a-z]{1,3}".prop_map(|pattern| CacheOp::Search { pattern }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of operations, hits and misses SHALL count exactly the
    // direct lookups (get/exists) that succeeded or failed; enumeration, search
    // and removal never move them.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let store = CacheStore::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(&key, value, None);
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Exists { key } => {
                    if store.exists(&key) {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Remove { key } => {
                    store.remove(&key);
                }
                CacheOp::All => {
                    store.get_all();
                }
                CacheOp::Search { pattern } => {
                    store.search(&pattern);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_keys, store.len(), "Total keys mismatch");
    }

    // *For any* key and value, storing then retrieving SHALL return the same value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in value_strategy()) {
        let store = CacheStore::new();

        prop_assert!(store.set(&key, value.clone(), None));

        let item = store.get(&key);
        prop_assert!(item.is_some());
        let item = item.unwrap();
        prop_assert_eq!(item.value, value, "Round-trip value mismatch");
        prop_assert_eq!(item.ttl, None);
    }

    // *For any* stored key, removal SHALL make it invisible, and a second
    // removal SHALL report false.
    #[test]
    fn prop_remove_is_idempotent(key in valid_key_strategy(), value in value_strategy()) {
        let store = CacheStore::new();
        store.set(&key, value, None);

        prop_assert!(store.remove(&key));
        prop_assert!(!store.remove(&key));
        prop_assert!(store.get(&key).is_none());
    }

    // *For any* key, a second set SHALL fully replace the first.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let store = CacheStore::new();

        store.set(&key, value1, Some(3600));
        store.set(&key, value2.clone(), None);

        let item = store.get(&key).unwrap();
        prop_assert_eq!(item.value, value2, "Overwrite should return new value");
        prop_assert_eq!(item.ttl, None, "Overwrite should drop the old TTL");
        prop_assert_eq!(store.len(), 1);
    }

    // *For any* set of keys and literal prefix, search SHALL return exactly the
    // live keys the regex matches, and get_all SHALL return all of them.
    #[test]
    fn prop_search_matches_exact_subset(
        keys in prop::collection::btree_set(valid_key_strategy(), 0..30),
        prefix in "[a-z]{1,2}"
    ) {
        let store = CacheStore::new();
        for key in &keys {
            store.set(key, json!(key), None);
        }

        let expected: BTreeSet<String> = keys
            .iter()
            .filter(|k| k.to_lowercase().starts_with(&prefix))
            .cloned()
            .collect();
        let found: BTreeSet<String> = store.search(&format!("^{prefix}")).into_keys().collect();
        prop_assert_eq!(found, expected);

        let all: BTreeSet<String> = store.get_all().into_keys().collect();
        prop_assert_eq!(all, keys);
    }

    // *For any* batch of writers on disjoint keys, every write SHALL land intact.
    #[test]
    fn prop_concurrent_writers_keep_every_entry(
        entries in prop::collection::hash_map(valid_key_strategy(), value_strategy(), 1..64)
    ) {
        let store = Arc::new(CacheStore::new());
        let entries: Vec<(String, Value)> = entries.into_iter().collect();

        std::thread::scope(|scope| {
            for chunk in entries.chunks(8) {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for (key, value) in chunk {
                        store.set(key, value.clone(), None);
                    }
                });
            }
        });

        prop_assert_eq!(store.stats().total_keys, entries.len());
        let expected: HashMap<_, _> = entries.into_iter().collect();
        for (key, item) in store.get_all() {
            prop_assert_eq!(Some(&item.value), expected.get(&key));
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(3))]

    // *For any* entry stored with a TTL, once the TTL elapses it SHALL be
    // invisible to get, exists, get_all and search alike.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in valid_key_strategy(),
        value in value_strategy()
    ) {
        let store = CacheStore::new();
        store.set(&key, value.clone(), Some(1));

        prop_assert_eq!(store.get(&key).map(|item| item.value), Some(value));

        sleep(Duration::from_millis(1100));

        prop_assert!(store.get_all().is_empty());
        prop_assert!(store.search(".*").is_empty());
        prop_assert!(store.get(&key).is_none());
        prop_assert!(!store.exists(&key));
    }
}
