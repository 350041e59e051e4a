//! Cache Store Module
//!
//! Main cache engine: a sharded concurrent map with lazy and eager TTL expiry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use regex::RegexBuilder;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheEntry, CacheItem, CacheStats, StatsRecorder};

// == Cache Store ==
/// Concurrent key-value storage with TTL support.
///
/// Every mutation is a per-key atomic operation on the underlying map, so
/// lookups, writes and the background sweep interleave freely. Removing an
/// already-gone key is a no-op, which keeps lazy and eager eviction from
/// double-counting.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: DashMap<String, CacheEntry>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. There is no capacity limit.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsRecorder::new(),
        }
    }

    // == Set ==
    /// Stores a value under `key`, fully replacing any existing entry.
    ///
    /// Returns false only for an empty key.
    pub fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> bool {
        if key.is_empty() {
            return false;
        }

        let entry = CacheEntry::new(key, value, ttl);
        self.entries.insert(key.to_string(), entry);
        true
    }

    // == Get ==
    /// Looks up a live entry.
    ///
    /// An expired entry is evicted and the access counts as a miss. Every call
    /// records exactly one hit or one miss.
    pub fn get(&self, key: &str) -> Option<CacheItem> {
        if key.is_empty() {
            self.stats.record_miss();
            return None;
        }

        let now = Utc::now();
        // The shard guard must be released before removing.
        let lookup = self.entries.get(key).map(|entry| {
            if entry.is_expired_at(now) {
                None
            } else {
                Some(entry.to_item(key, now))
            }
        });

        match lookup {
            Some(Some(item)) => {
                self.stats.record_hit();
                Some(item)
            }
            Some(None) => {
                if self.evict_if_expired(key, now) {
                    self.stats.record_expired(1);
                }
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes an entry by key. Returns true iff something was deleted.
    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Exists ==
    /// Same as `get(key).is_some()`, including its effect on hit/miss counters.
    pub fn exists(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Flush ==
    /// Drops every entry. Counters and start time are kept.
    ///
    /// Not atomic across the whole map: shards are cleared one after another,
    /// so a `set` racing the flush may land in an already-cleared shard and
    /// survive it.
    pub fn flush(&self) {
        self.entries.clear();
    }

    // == Get All ==
    /// Returns every live entry.
    ///
    /// Expired entries met during the scan are evicted silently: no hit, miss
    /// or cleanup counter changes.
    pub fn get_all(&self) -> BTreeMap<String, CacheItem> {
        self.collect_live(|_| true)
    }

    // == Search ==
    /// Returns live entries whose key matches `pattern`, case-insensitively.
    ///
    /// An invalid pattern yields an empty map.
    pub fn search(&self, pattern: &str) -> BTreeMap<String, CacheItem> {
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(e) => {
                debug!("Ignoring invalid search pattern {:?}: {}", pattern, e);
                return BTreeMap::new();
            }
        };

        self.collect_live(|key| regex.is_match(key))
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many this call removed.
    ///
    /// Updates `expired_keys_cleaned` and `last_cleanup` only when the count is
    /// non-zero.
    pub fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|entry| entry.value().is_expired_at(now))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = expired_keys
            .iter()
            .filter(|key| self.evict_if_expired(key.as_str(), now))
            .count();

        if removed > 0 {
            self.stats.record_sweep(removed as u64, now);
        }
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let memory: usize = self.entries.iter().map(|entry| entry.approx_size).sum();
        self.stats.snapshot(self.entries.len(), memory)
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes `key` only if it is still expired at `now`.
    ///
    /// A concurrent `set` that replaced the entry in the meantime wins.
    fn evict_if_expired(&self, key: &str, now: DateTime<Utc>) -> bool {
        self.entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
    }

    fn collect_live<F>(&self, mut matches: F) -> BTreeMap<String, CacheItem>
    where
        F: FnMut(&str) -> bool,
    {
        let now = Utc::now();
        let mut live = BTreeMap::new();
        let mut expired = Vec::new();

        for entry in self.entries.iter() {
            if entry.value().is_expired_at(now) {
                expired.push(entry.key().clone());
            } else if matches(entry.key().as_str()) {
                live.insert(entry.key().clone(), entry.value().to_item(entry.key(), now));
            }
        }

        for key in expired {
            self.evict_if_expired(&key, now);
        }
        live
    }
}
