// ABOUTME: Multi-tier cache for recipe payloads with lazy TTL expiry
// ABOUTME: Pluggable tiers (in-process LRU, durable REST store) composed by TieredCache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cache Store
//!
//! Payloads are stored as serialized text inside a [`CacheEntry`] stamped with
//! its write time. Validity is decided at read time (`now - stored_at <= ttl`);
//! nothing is swept in the background and nothing is explicitly deleted.
//!
//! ```rust,no_run
//! use recipe_relay::cache::{memory::InMemoryTier, store::{ReadOrder, TieredCache}};
//! use std::time::Duration;
//! # async fn example() {
//! let cache = TieredCache::new(
//!     InMemoryTier::new(1_000),
//!     None,
//!     Duration::from_secs(6 * 60 * 60),
//!     ReadOrder::FastFirst,
//! );
//! let _ = cache.set("info:42", &serde_json::json!({"id": 42})).await;
//! let lookup = cache.get("info:42").await;
//! assert!(lookup.hit.is_some());
//! # }
//! ```

/// Durable REST key-value tier
pub mod durable;
/// In-process LRU tier
pub mod memory;
/// Tier composition and read ordering
pub mod store;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Cache tier failure; always recovered locally as a miss
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// Stored text is not a valid payload or record
    #[error("malformed cache entry for {key}: {reason}")]
    Malformed {
        /// Affected key
        key: String,
        /// Parse failure
        reason: String,
    },

    /// Durable store unreachable or answered with an error
    #[error("{tier} tier unavailable: {reason}")]
    Unavailable {
        /// Tier name
        tier: &'static str,
        /// Failure description, credential-free
        reason: String,
    },

    /// Tier call exceeded its bound
    #[error("{tier} tier timed out after {millis}ms")]
    Timeout {
        /// Tier name
        tier: &'static str,
        /// Bound that was exceeded
        millis: u64,
    },

    /// Payload could not be serialized
    #[error("cache serialization failed: {0}")]
    Serialization(String),

    /// Local file store I/O failure
    #[error("local store I/O failed: {0}")]
    Io(String),
}

/// One cached payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Namespaced key (`info:<id>`, `search:<query>`)
    pub key: String,
    /// Write time in milliseconds since the Unix epoch
    pub stored_at_millis: u64,
    /// Serialized payload text
    pub payload: String,
}

impl CacheEntry {
    /// Serialize `payload` into an entry stamped with the current time
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Serialization` if the payload cannot be encoded.
    pub fn new(key: impl Into<String>, payload: &Value) -> Result<Self, CacheError> {
        let payload =
            serde_json::to_string(payload).map_err(|e| CacheError::Serialization(e.to_string()))?;
        Ok(Self {
            key: key.into(),
            stored_at_millis: now_millis(),
            payload,
        })
    }

    /// Entry with an explicit write time, used when re-hydrating from another tier
    #[must_use]
    pub fn with_timestamp(key: impl Into<String>, payload: impl Into<String>, stored_at_millis: u64) -> Self {
        Self {
            key: key.into(),
            stored_at_millis,
            payload: payload.into(),
        }
    }

    /// Whether the entry is still within `ttl` at `now_millis`
    #[must_use]
    pub fn is_valid_at(&self, now_millis: u64, ttl: Duration) -> bool {
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        now_millis.saturating_sub(self.stored_at_millis) <= ttl_millis
    }

    /// Parse the stored payload text
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Malformed` if the text is not valid JSON.
    pub fn parse_payload(&self) -> Result<Value, CacheError> {
        serde_json::from_str(&self.payload).map_err(|e| CacheError::Malformed {
            key: self.key.clone(),
            reason: e.to_string(),
        })
    }
}

/// A cache tier that stores entries by key
#[async_trait]
pub trait CacheTier: Send + Sync {
    /// Tier name for logs and errors
    fn name(&self) -> &'static str;

    /// Read the entry for `key`, valid or not
    ///
    /// # Errors
    ///
    /// Returns an error if the tier is unreachable or the stored value is malformed
    async fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store `entry`, letting the tier expire it after `ttl` if it supports expiry
    ///
    /// # Errors
    ///
    /// Returns an error if the tier rejects or cannot receive the write
    async fn write(&self, entry: &CacheEntry, ttl: Duration) -> Result<(), CacheError>;

    /// Verify the tier is reachable
    ///
    /// # Errors
    ///
    /// Returns an error if the tier does not answer
    async fn health_check(&self) -> Result<(), CacheError>;
}

/// Current time in milliseconds since the Unix epoch
#[must_use]
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_validity_boundary() {
        let entry = CacheEntry::with_timestamp("info:1", "{}", 1_000);
        let ttl = Duration::from_millis(500);
        assert!(entry.is_valid_at(1_500, ttl));
        assert!(!entry.is_valid_at(1_501, ttl));
    }

    #[test]
    fn test_malformed_payload_is_reported() {
        let entry = CacheEntry::with_timestamp("info:1", "{not json", 0);
        assert!(matches!(entry.parse_payload(), Err(CacheError::Malformed { .. })));
    }

    #[test]
    fn test_payload_text_is_preserved() {
        let payload = json!({"id": 1, "title": "Shakshuka", "nutrition": {"calories": 320.5}});
        let entry = CacheEntry::new("info:1", &payload).unwrap();
        assert_eq!(entry.parse_payload().unwrap(), payload);
    }
}
