// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a scripted recipe source, fake cache tiers, and cache/retriever builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `recipe_relay`

use async_trait::async_trait;
use recipe_relay::cache::memory::InMemoryTier;
use recipe_relay::cache::store::{ReadOrder, TieredCache};
use recipe_relay::cache::{CacheEntry, CacheError, CacheTier};
use recipe_relay::models::{RecipeId, SearchQuery};
use recipe_relay::retrieval::RecipeRetriever;
use recipe_relay_upstream::{RawResponse, RecipeSource, UpstreamError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Six hours, the default TTL
pub const SIX_HOURS: Duration = Duration::from_secs(6 * 60 * 60);

/// Recipe document as upstream would return it
pub fn recipe_payload(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "readyInMinutes": 30,
        "servings": 2,
        "nutrition": {"nutrients": [{"name": "Calories", "amount": 412.5, "unit": "kcal"}]}
    })
}

/// Scripted answer of the fake source
#[derive(Clone)]
pub enum Reply {
    /// HTTP response with status and body
    Respond(u16, String),
    /// Transport failure
    Fail(UpstreamError),
    /// Never answers
    Hang,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::Respond(status, body.to_string())
    }

    pub fn status(status: u16) -> Self {
        Self::Respond(status, json!({"message": "upstream says no"}).to_string())
    }

    async fn play(&self) -> Result<RawResponse, UpstreamError> {
        match self {
            Self::Respond(status, body) => Ok(RawResponse::new(*status, body.clone())),
            Self::Fail(error) => Err(error.clone()),
            Self::Hang => std::future::pending().await,
        }
    }
}

/// `RecipeSource` answering from a script and counting calls
pub struct FakeSource {
    full: Reply,
    reduced: Reply,
    search: Reply,
    full_calls: AtomicU32,
    reduced_calls: AtomicU32,
    search_calls: AtomicU32,
}

impl FakeSource {
    /// Source that answers 500 to everything
    pub fn new() -> Self {
        Self {
            full: Reply::status(500),
            reduced: Reply::status(500),
            search: Reply::status(500),
            full_calls: AtomicU32::new(0),
            reduced_calls: AtomicU32::new(0),
            search_calls: AtomicU32::new(0),
        }
    }

    pub fn full(mut self, reply: Reply) -> Self {
        self.full = reply;
        self
    }

    pub fn reduced(mut self, reply: Reply) -> Self {
        self.reduced = reply;
        self
    }

    pub fn search(mut self, reply: Reply) -> Self {
        self.search = reply;
        self
    }

    pub fn full_calls(&self) -> u32 {
        self.full_calls.load(Ordering::SeqCst)
    }

    pub fn reduced_calls(&self) -> u32 {
        self.reduced_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> u32 {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> u32 {
        self.full_calls() + self.reduced_calls() + self.search_calls()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl RecipeSource for FakeSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_full(&self, _id: &RecipeId) -> Result<RawResponse, UpstreamError> {
        self.full_calls.fetch_add(1, Ordering::SeqCst);
        self.full.play().await
    }

    async fn fetch_reduced(&self, _id: &RecipeId) -> Result<RawResponse, UpstreamError> {
        self.reduced_calls.fetch_add(1, Ordering::SeqCst);
        self.reduced.play().await
    }

    async fn search(&self, _query: &SearchQuery) -> Result<RawResponse, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.search.play().await
    }
}

/// Durable tier stand-in backed by a map
#[derive(Default)]
pub struct MapTier {
    entries: Mutex<HashMap<String, CacheEntry>>,
    pub writes: AtomicU32,
}

impl MapTier {
    pub fn insert(&self, entry: CacheEntry) {
        self.entries.lock().unwrap().insert(entry.key.clone(), entry);
    }

    pub fn raw(&self, key: &str, payload: &str, stored_at_millis: u64) {
        self.insert(CacheEntry::with_timestamp(key, payload, stored_at_millis));
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl CacheTier for MapTier {
    fn name(&self) -> &'static str {
        "map"
    }

    async fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.get(key))
    }

    async fn write(&self, entry: &CacheEntry, _ttl: Duration) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(entry.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Durable tier that is always unreachable
pub struct DownTier;

#[async_trait]
impl CacheTier for DownTier {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn read(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        Err(down())
    }

    async fn write(&self, _entry: &CacheEntry, _ttl: Duration) -> Result<(), CacheError> {
        Err(down())
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        Err(down())
    }
}

/// Durable tier that never answers
pub struct StuckTier;

#[async_trait]
impl CacheTier for StuckTier {
    fn name(&self) -> &'static str {
        "stuck"
    }

    async fn read(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
        std::future::pending().await
    }

    async fn write(&self, _entry: &CacheEntry, _ttl: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        std::future::pending().await
    }
}

fn down() -> CacheError {
    CacheError::Unavailable {
        tier: "durable",
        reason: "connection refused".to_owned(),
    }
}

/// In-process-only cache with the default TTL
pub fn memory_cache(read_order: ReadOrder) -> Arc<TieredCache> {
    Arc::new(TieredCache::new(
        InMemoryTier::new(100),
        None,
        SIX_HOURS,
        read_order,
    ))
}

/// Cache with `durable` as its second tier, durable first
pub fn tiered_cache(durable: Arc<dyn CacheTier>) -> Arc<TieredCache> {
    Arc::new(
        TieredCache::new(
            InMemoryTier::new(100),
            Some(durable),
            SIX_HOURS,
            ReadOrder::DurableFirst,
        )
        .with_durable_timeout(Duration::from_millis(200)),
    )
}

/// Orchestrator over `cache` and `source`
pub fn retriever(cache: Arc<TieredCache>, source: &Arc<FakeSource>) -> RecipeRetriever {
    init_test_logging();
    let source: Arc<dyn RecipeSource> = source.clone();
    RecipeRetriever::new(cache, source)
}

/// Milliseconds since the epoch, `age` ago
pub fn millis_ago(age: Duration) -> u64 {
    recipe_relay::cache::now_millis().saturating_sub(u64::try_from(age.as_millis()).unwrap())
}
