// ABOUTME: Shared server resources built once at startup and injected into routes
// ABOUTME: Owns the cache store, the upstream client, and the retrieval orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server resources
//!
//! The durable tier is resolved here, once, from configuration. Routes never
//! re-read the environment.

use crate::cache::durable::UpstashRestTier;
use crate::cache::memory::InMemoryTier;
use crate::cache::store::{ReadOrder, TieredCache};
use crate::cache::CacheTier;
use crate::config::{CacheConfig, ServerConfig, UpstreamConfig};
use crate::logging::AppLogger;
use crate::retrieval::RecipeRetriever;
use recipe_relay_upstream::{RecipeSource, SpoonacularClient, SpoonacularConfig};
use std::sync::Arc;
use tracing::warn;

/// Resources shared by all request handlers
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Cache store, durable tier first
    pub cache: Arc<TieredCache>,
    /// Orchestrator; `None` when no upstream credential is configured
    pub retriever: Option<Arc<RecipeRetriever>>,
}

impl ServerResources {
    /// Build every resource from `config`
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let cache = Arc::new(build_tiered_cache(&config.cache, ReadOrder::DurableFirst));
        let source = build_upstream_source(&config.upstream);
        if source.is_none() {
            warn!("SPOONACULAR_KEY is not set; recipe lookups will answer 500");
        }
        Self::with_parts(config, cache, source)
    }

    /// Assemble resources from prepared parts
    #[must_use]
    pub fn with_parts(
        config: ServerConfig,
        cache: Arc<TieredCache>,
        source: Option<Arc<dyn RecipeSource>>,
    ) -> Self {
        let deadline = config.retrieval.request_deadline;
        let retriever = source.map(|source| {
            Arc::new(RecipeRetriever::new(Arc::clone(&cache), source).with_deadline(deadline))
        });
        AppLogger::log_cache_tiers(
            cache.durable_available(),
            cache.read_order(),
            u64::try_from(cache.ttl().as_millis()).unwrap_or(u64::MAX),
        );
        Self {
            config: Arc::new(config),
            cache,
            retriever,
        }
    }

    /// Whether the upstream credential is configured
    #[must_use]
    pub const fn credential_configured(&self) -> bool {
        self.retriever.is_some()
    }
}

/// Cache store for `config`, with the durable tier only when it is configured
#[must_use]
pub fn build_tiered_cache(config: &CacheConfig, read_order: ReadOrder) -> TieredCache {
    let memory = InMemoryTier::new(config.max_entries);
    let durable = config.durable.as_ref().map(|durable| {
        let tier: Arc<dyn CacheTier> = Arc::new(UpstashRestTier::new(durable));
        (tier, durable.timeout)
    });

    match durable {
        Some((tier, timeout)) => TieredCache::new(memory, Some(tier), config.ttl, read_order)
            .with_durable_timeout(timeout),
        None => TieredCache::new(memory, None, config.ttl, read_order),
    }
}

/// Upstream client for `config`; `None` without a credential
#[must_use]
pub fn build_upstream_source(config: &UpstreamConfig) -> Option<Arc<dyn RecipeSource>> {
    let api_key = config.api_key.as_ref()?;
    let client = SpoonacularClient::new(
        SpoonacularConfig::new(api_key.clone()).with_base_url(config.base_url.clone()),
    );
    Some(Arc::new(client))
}
