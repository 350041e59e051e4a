//! Cache Statistics Module
//!
//! Tracks cache performance metrics: hits, misses and expired-key cleanups.
//! Counters are independent atomics so they never contend with the map locks.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Sentinel stored in `last_cleanup_ms` until the first sweep removes something.
const NO_CLEANUP: i64 = i64::MIN;

// == Stats Recorder ==
/// Increment-only counters owned by the store.
#[derive(Debug)]
pub struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expired_cleaned: AtomicU64,
    last_cleanup_ms: AtomicI64,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl Default for StatsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsRecorder {
    // == Constructor ==
    /// Creates a recorder with all counters at zero, stamped with the current time.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired_cleaned: AtomicU64::new(0),
            last_cleanup_ms: AtomicI64::new(NO_CLEANUP),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Cleanup ==
    /// Adds `count` expired removals. Only sweeps stamp `last_cleanup`.
    pub fn record_expired(&self, count: u64) {
        self.expired_cleaned.fetch_add(count, Ordering::Relaxed);
    }

    /// Records a sweep that removed at least one entry.
    pub fn record_sweep(&self, count: u64, at: DateTime<Utc>) {
        self.record_expired(count);
        self.last_cleanup_ms
            .fetch_max(at.timestamp_millis(), Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads every counter into a serializable snapshot.
    pub fn snapshot(&self, total_keys: usize, memory_usage_bytes: usize) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let last_cleanup = match self.last_cleanup_ms.load(Ordering::Relaxed) {
            NO_CLEANUP => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        };

        CacheStats {
            total_keys,
            hits,
            misses,
            hit_rate: hit_rate(hits, misses),
            uptime_seconds: self.started.elapsed().as_secs(),
            memory_usage_bytes,
            expired_keys_cleaned: self.expired_cleaned.load(Ordering::Relaxed),
            last_cleanup,
            server_start_time: self.started_at,
        }
    }
}

// == Cache Stats ==
/// Point-in-time view of the cache, serialized as the stats payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current map size, may include expired entries not yet swept
    pub total_keys: usize,
    pub hits: u64,
    pub misses: u64,
    /// hits / (hits + misses), or 0.0 if no lookups happened
    pub hit_rate: f64,
    pub uptime_seconds: u64,
    /// Approximate bytes held by keys and values; a gauge, not an accounting
    pub memory_usage_bytes: usize,
    pub expired_keys_cleaned: u64,
    pub last_cleanup: Option<DateTime<Utc>>,
    pub server_start_time: DateTime<Utc>,
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
