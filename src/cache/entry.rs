//! Cache Entry Module
//!
//! Defines the stored entry with TTL support and the item payload handed to callers.

use std::mem;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// `expires_at` is fixed at construction; replacing a key builds a new entry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value, never inspected by the store
    pub value: Value,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Expiration timestamp, None = no expiration
    pub expires_at: Option<DateTime<Utc>>,
    /// Rough footprint of key and value in bytes
    pub approx_size: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// A TTL of `None` or `Some(0)` means the entry never expires.
    pub fn new(key: &str, value: Value, ttl_seconds: Option<u64>) -> Self {
        Self::new_at(key, value, ttl_seconds, Utc::now())
    }

    /// Creates an entry with an explicit creation time.
    pub fn new_at(
        key: &str,
        value: Value,
        ttl_seconds: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = ttl_seconds
            .filter(|ttl| *ttl > 0)
            .and_then(|ttl| i64::try_from(ttl).ok())
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl));
        let approx_size = mem::size_of::<Self>() + key.len() + estimate_value_size(&value);

        Self {
            value,
            created_at: now,
            expires_at,
            approx_size,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired relative to `now`.
    ///
    /// An entry is expired once `now >= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in whole seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining_seconds)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at.map(|expires| {
            let remaining = (expires - now).num_seconds();
            u64::try_from(remaining).unwrap_or(0)
        })
    }

    /// Builds the caller-facing item for this entry.
    pub fn to_item(&self, key: &str, now: DateTime<Utc>) -> CacheItem {
        CacheItem {
            key: key.to_string(),
            value: self.value.clone(),
            ttl: self.ttl_remaining_at(now),
            created_at: self.created_at,
        }
    }
}

// == Cache Item ==
/// A live entry as returned by lookups, enumeration and search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheItem {
    pub key: String,
    pub value: Value,
    /// Remaining TTL in seconds
    pub ttl: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// Walks a JSON value and sums the bytes its scalars and strings would occupy.
///
/// Informational only; used for the memory gauge in stats.
fn estimate_value_size(value: &Value) -> usize {
    match value {
        Value::Null | Value::Bool(_) => 1,
        Value::Number(_) => mem::size_of::<f64>(),
        Value::String(s) => s.len(),
        Value::Array(items) => items.iter().map(estimate_value_size).sum(),
        Value::Object(fields) => fields
            .iter()
            .map(|(k, v)| k.len() + estimate_value_size(v))
            .sum(),
    }
}
