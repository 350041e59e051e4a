//! Cache Module
//!
//! Provides concurrent in-memory caching with TTL expiration.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::{CacheEntry, CacheItem};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;
