// ABOUTME: Integration tests for the in-process tier and the tiered cache store
// ABOUTME: Covers TTL validity, read order, re-hydration, and durable tier degradation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{millis_ago, tiered_cache, DownTier, MapTier, StuckTier, SIX_HOURS};
use recipe_relay::cache::memory::InMemoryTier;
use recipe_relay::cache::store::{CacheTierKind, DurableWrite, ReadOrder, TieredCache};
use recipe_relay::cache::{CacheEntry, CacheError, CacheTier};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_memory_tier_set_and_get() -> Result<()> {
    let cache = TieredCache::new(InMemoryTier::new(10), None, SIX_HOURS, ReadOrder::FastFirst);
    let payload = json!({"id": 42, "title": "Green Shakshuka"});

    let written = cache.set("info:42", &payload).await?;
    assert_eq!(written, DurableWrite::NotConfigured);

    let lookup = cache.get("info:42").await;
    let hit = lookup.hit.expect("hit");
    assert_eq!(hit.payload, payload);
    assert_eq!(hit.tier, CacheTierKind::Memory);
    assert!(lookup.degraded.is_empty());
    assert!(!cache.durable_available());
    Ok(())
}

#[tokio::test]
async fn test_round_trip_preserves_payload_bytes() -> Result<()> {
    let cache = TieredCache::new(InMemoryTier::new(10), None, SIX_HOURS, ReadOrder::FastFirst);
    let payload = json!({
        "id": 7,
        "title": "Crème brûlée",
        "extendedIngredients": [{"name": "cream", "amount": 0.5}],
        "nutrition": {"calories": 1e3, "tags": []}
    });

    cache.set("info:7", &payload).await?;
    let read_back = cache.get("info:7").await.hit.expect("hit").payload;
    assert_eq!(
        serde_json::to_string(&read_back)?,
        serde_json::to_string(&payload)?
    );
    Ok(())
}

#[tokio::test]
async fn test_expired_entry_is_a_miss_but_stale_readable() -> Result<()> {
    let memory = InMemoryTier::new(10);
    memory
        .insert_entry(CacheEntry::with_timestamp(
            "info:3",
            r#"{"id":3}"#,
            millis_ago(SIX_HOURS + Duration::from_secs(2 * 60 * 60)),
        ))
        .await;
    let cache = TieredCache::new(memory, None, SIX_HOURS, ReadOrder::FastFirst);

    assert!(cache.get("info:3").await.hit.is_none());
    assert_eq!(cache.get_stale("info:3").await?, Some(json!({"id": 3})));
    Ok(())
}

#[tokio::test]
async fn test_malformed_entry_is_a_degraded_miss() -> Result<()> {
    let memory = InMemoryTier::new(10);
    memory
        .insert_entry(CacheEntry::with_timestamp("info:9", "{not json", millis_ago(Duration::ZERO)))
        .await;
    let cache = TieredCache::new(memory, None, SIX_HOURS, ReadOrder::FastFirst);

    let lookup = cache.get("info:9").await;
    assert!(lookup.hit.is_none());
    assert!(matches!(
        lookup.degraded.as_slice(),
        [CacheError::Malformed { .. }]
    ));
    Ok(())
}

#[tokio::test]
async fn test_lru_bound_evicts_oldest() -> Result<()> {
    let memory = InMemoryTier::new(2);
    let cache = TieredCache::new(memory.clone(), None, SIX_HOURS, ReadOrder::FastFirst);
    cache.set("info:1", &json!(1)).await?;
    cache.set("info:2", &json!(2)).await?;
    cache.set("info:3", &json!(3)).await?;

    assert_eq!(memory.len().await, 2);
    assert!(cache.get("info:1").await.hit.is_none());
    assert!(cache.get("info:3").await.hit.is_some());
    Ok(())
}

#[tokio::test]
async fn test_durable_first_reads_durable_and_rehydrates_memory() -> Result<()> {
    let durable = Arc::new(MapTier::default());
    let stored_at = millis_ago(Duration::from_secs(60));
    durable.raw("info:5", r#"{"id":5,"title":"From durable"}"#, stored_at);
    let cache = tiered_cache(durable.clone());

    let hit = cache.get("info:5").await.hit.expect("hit");
    assert_eq!(hit.tier, CacheTierKind::Durable);
    assert_eq!(hit.payload["title"], "From durable");

    // Re-hydrated copy keeps the durable write time
    let rehydrated = cache.memory().read("info:5").await?.expect("memory copy");
    assert_eq!(rehydrated.stored_at_millis, stored_at);
    Ok(())
}

#[tokio::test]
async fn test_durable_first_prefers_durable_over_memory() -> Result<()> {
    let durable = Arc::new(MapTier::default());
    let cache = tiered_cache(durable.clone());
    cache.set("info:6", &json!({"v": "old"})).await?;
    durable.raw("info:6", r#"{"v":"shared"}"#, millis_ago(Duration::ZERO));

    let hit = cache.get("info:6").await.hit.expect("hit");
    assert_eq!(hit.tier, CacheTierKind::Durable);
    assert_eq!(hit.payload["v"], "shared");
    Ok(())
}

#[tokio::test]
async fn test_fast_first_prefers_memory() -> Result<()> {
    let durable = Arc::new(MapTier::default());
    let durable_tier: Arc<dyn CacheTier> = durable.clone();
    let cache = TieredCache::new(
        InMemoryTier::new(10),
        Some(durable_tier),
        SIX_HOURS,
        ReadOrder::FastFirst,
    );
    cache.set("info:6", &json!({"v": "local"})).await?;
    durable.raw("info:6", r#"{"v":"shared"}"#, millis_ago(Duration::ZERO));

    let hit = cache.get("info:6").await.hit.expect("hit");
    assert_eq!(hit.tier, CacheTierKind::Memory);
    assert_eq!(hit.payload["v"], "local");
    Ok(())
}

#[tokio::test]
async fn test_set_mirrors_to_durable() -> Result<()> {
    let durable = Arc::new(MapTier::default());
    let cache = tiered_cache(durable.clone());

    let written = cache.set("info:8", &json!({"id": 8})).await?;
    assert_eq!(written, DurableWrite::Stored);
    assert_eq!(durable.writes.load(Ordering::SeqCst), 1);
    assert_eq!(durable.get("info:8").expect("mirrored").payload, r#"{"id":8}"#);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_durable_degrades_to_memory() -> Result<()> {
    let cache = tiered_cache(Arc::new(DownTier));
    assert!(cache.durable_available());

    let written = cache.set("info:10", &json!({"id": 10})).await?;
    assert!(matches!(written, DurableWrite::Failed(CacheError::Unavailable { .. })));

    let lookup = cache.get("info:10").await;
    assert_eq!(lookup.hit.expect("memory hit").tier, CacheTierKind::Memory);
    assert_eq!(lookup.degraded.len(), 1);
    assert!(cache.durable_health().await.expect("configured").is_err());
    Ok(())
}

#[tokio::test]
async fn test_hung_durable_is_bounded_by_timeout() -> Result<()> {
    let cache = tiered_cache(Arc::new(StuckTier));

    let written = tokio::time::timeout(Duration::from_secs(2), cache.set("info:11", &json!(11)))
        .await
        .expect("set must not hang")?;
    assert!(matches!(written, DurableWrite::Failed(CacheError::Timeout { .. })));

    let lookup = tokio::time::timeout(Duration::from_secs(2), cache.get("info:11"))
        .await
        .expect("get must not hang");
    assert!(lookup.hit.is_some());
    assert!(matches!(lookup.degraded.as_slice(), [CacheError::Timeout { .. }]));
    Ok(())
}
