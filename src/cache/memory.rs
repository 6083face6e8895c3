// ABOUTME: In-process cache tier backed by a bounded LRU map
// ABOUTME: Returns entries regardless of age so stale copies remain available for fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheEntry, CacheError, CacheTier};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-process tier
///
/// Constructed explicitly at startup and injected where needed; its memory is
/// reclaimed on process exit. Entries are only displaced by LRU pressure or by
/// a newer write to the same key.
#[derive(Clone)]
pub struct InMemoryTier {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl InMemoryTier {
    const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Tier holding at most `max_entries` entries (zero falls back to 1000)
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::FALLBACK_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Insert a prepared entry, keeping its timestamp
    pub async fn insert_entry(&self, entry: CacheEntry) {
        self.store.write().await.push(entry.key.clone(), entry);
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the tier holds no entries
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl CacheTier for InMemoryTier {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        // LruCache::get updates recency, so it needs the write lock
        Ok(self.store.write().await.get(key).cloned())
    }

    async fn write(&self, entry: &CacheEntry, _ttl: Duration) -> Result<(), CacheError> {
        self.insert_entry(entry.clone()).await;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
