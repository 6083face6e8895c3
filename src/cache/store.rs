// ABOUTME: TieredCache composing the in-process tier with the optional durable tier
// ABOUTME: Read order is fixed per entry point; durable failures degrade to misses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::memory::InMemoryTier;
use super::{now_millis, CacheEntry, CacheError, CacheTier};
use recipe_relay_core::constants::cache::DEFAULT_DURABLE_TIMEOUT_MS;
use recipe_relay_core::models::HitSource;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Order in which tiers are consulted on read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOrder {
    /// Durable tier first; it is the source of truth shared across instances
    DurableFirst,
    /// In-process tier first
    FastFirst,
}

/// Tier that produced a cached payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTierKind {
    /// In-process tier
    Memory,
    /// Durable tier
    Durable,
}

impl From<CacheTierKind> for HitSource {
    fn from(tier: CacheTierKind) -> Self {
        match tier {
            CacheTierKind::Memory => Self::Memory,
            CacheTierKind::Durable => Self::Durable,
        }
    }
}

/// A valid cached payload
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPayload {
    /// Parsed payload
    pub payload: Value,
    /// Tier it came from
    pub tier: CacheTierKind,
}

/// Result of a cache read
#[derive(Debug, Default)]
pub struct CacheLookup {
    /// Valid payload, if any tier had one
    pub hit: Option<CachedPayload>,
    /// Tier errors that were downgraded to misses
    pub degraded: Vec<CacheError>,
}

/// Outcome of mirroring a write to the durable tier
#[derive(Debug, PartialEq, Eq)]
pub enum DurableWrite {
    /// No durable tier configured
    NotConfigured,
    /// Durable tier accepted the write
    Stored,
    /// Durable tier failed; the in-process write still happened
    Failed(CacheError),
}

/// Cache Store: in-process tier plus optional durable tier
pub struct TieredCache {
    memory: InMemoryTier,
    durable: Option<Arc<dyn CacheTier>>,
    ttl: Duration,
    read_order: ReadOrder,
    durable_timeout: Duration,
}

impl TieredCache {
    /// Compose the tiers
    #[must_use]
    pub fn new(
        memory: InMemoryTier,
        durable: Option<Arc<dyn CacheTier>>,
        ttl: Duration,
        read_order: ReadOrder,
    ) -> Self {
        Self {
            memory,
            durable,
            ttl,
            read_order,
            durable_timeout: Duration::from_millis(DEFAULT_DURABLE_TIMEOUT_MS),
        }
    }

    /// Bound every durable tier call by `bound`
    #[must_use]
    pub const fn with_durable_timeout(mut self, bound: Duration) -> Self {
        self.durable_timeout = bound;
        self
    }

    /// Whether a durable tier was configured at construction
    #[must_use]
    pub fn durable_available(&self) -> bool {
        self.durable.is_some()
    }

    /// Configured TTL
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read order used by `get`
    #[must_use]
    pub const fn read_order(&self) -> ReadOrder {
        self.read_order
    }

    /// The in-process tier
    #[must_use]
    pub const fn memory(&self) -> &InMemoryTier {
        &self.memory
    }

    /// Look up a valid payload for `key`
    ///
    /// A durable hit is re-hydrated into the in-process tier with its
    /// original write time.
    pub async fn get(&self, key: &str) -> CacheLookup {
        let mut lookup = CacheLookup::default();
        let order = match self.read_order {
            ReadOrder::DurableFirst => [CacheTierKind::Durable, CacheTierKind::Memory],
            ReadOrder::FastFirst => [CacheTierKind::Memory, CacheTierKind::Durable],
        };

        for tier in order {
            let read = match tier {
                CacheTierKind::Memory => self.memory.read(key).await,
                CacheTierKind::Durable => match self.read_durable(key).await {
                    Some(read) => read,
                    None => continue,
                },
            };

            match self.accept(read) {
                Ok(Some((payload, entry))) => {
                    if tier == CacheTierKind::Durable {
                        self.memory.insert_entry(entry).await;
                    }
                    lookup.hit = Some(CachedPayload { payload, tier });
                    return lookup;
                }
                Ok(None) => {}
                Err(error) => lookup.degraded.push(error),
            }
        }
        lookup
    }

    /// Read the in-process copy of `key` regardless of TTL
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Malformed` if the stored text does not parse.
    pub async fn get_stale(&self, key: &str) -> Result<Option<Value>, CacheError> {
        match self.memory.read(key).await? {
            Some(entry) => entry.parse_payload().map(Some),
            None => Ok(None),
        }
    }

    /// Store `payload` under `key`
    ///
    /// The in-process write always happens. The durable mirror is bounded by
    /// the durable timeout and its failure is reported, never raised.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Serialization` if the payload cannot be encoded.
    pub async fn set(&self, key: &str, payload: &Value) -> Result<DurableWrite, CacheError> {
        let entry = CacheEntry::new(key, payload)?;
        self.memory.insert_entry(entry.clone()).await;

        let Some(durable) = &self.durable else {
            return Ok(DurableWrite::NotConfigured);
        };
        let written = match timeout(self.durable_timeout, durable.write(&entry, self.ttl)).await {
            Ok(Ok(())) => DurableWrite::Stored,
            Ok(Err(error)) => DurableWrite::Failed(error),
            Err(_) => DurableWrite::Failed(self.durable_timed_out()),
        };
        Ok(written)
    }

    /// Check the durable tier; `None` when it is not configured
    pub async fn durable_health(&self) -> Option<Result<(), CacheError>> {
        let durable = self.durable.as_ref()?;
        Some(
            timeout(self.durable_timeout, durable.health_check())
                .await
                .unwrap_or_else(|_| Err(self.durable_timed_out())),
        )
    }

    async fn read_durable(&self, key: &str) -> Option<Result<Option<CacheEntry>, CacheError>> {
        let durable = self.durable.as_ref()?;
        Some(
            timeout(self.durable_timeout, durable.read(key))
                .await
                .unwrap_or_else(|_| Err(self.durable_timed_out())),
        )
    }

    fn accept(
        &self,
        read: Result<Option<CacheEntry>, CacheError>,
    ) -> Result<Option<(Value, CacheEntry)>, CacheError> {
        match read? {
            Some(entry) if entry.is_valid_at(now_millis(), self.ttl) => {
                let payload = entry.parse_payload()?;
                Ok(Some((payload, entry)))
            }
            _ => Ok(None),
        }
    }

    fn durable_timed_out(&self) -> CacheError {
        CacheError::Timeout {
            tier: "durable",
            millis: u64::try_from(self.durable_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
