// ABOUTME: Read-through retrieval pipeline tying the cache store to the upstream recipe client
// ABOUTME: Applies the single reduced retry, the request deadline, and the fallback chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Retrieval Orchestrator
//!
//! One linear pass per inbound request:
//!
//! 1. cache read (tier order fixed by the [`TieredCache`])
//! 2. enriched upstream request, then at most one reduced request
//! 3. cache write of any upstream success before it is returned
//! 4. on exhausted or transient failure: offline copy, stale in-process
//!    copy, bundled samples, then `NoFallbackAvailable`
//!
//! `NotFound` is terminal and skips the fallback chain.

/// Bundled sample data for the synthetic fallback
pub mod fallback;

pub use fallback::SyntheticSamples;

use crate::cache::store::{DurableWrite, TieredCache};
use crate::cache::CacheError;
use crate::logging::AppLogger;
use async_trait::async_trait;
use recipe_relay_core::constants::upstream::DEFAULT_REQUEST_DEADLINE_MS;
use recipe_relay_core::errors::{FailureKind, RetrievalFailure};
use recipe_relay_core::models::{
    HitSource, RecipeId, RetrievalOutcome, RetrievalRequest, SearchQuery,
};
use recipe_relay_upstream::{classify, Attempt, Classification, RecipeSource};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

/// Per-id persisted copies that outlive the cache TTL
///
/// Consulted first by the offline fallback and written on every upstream
/// success.
#[async_trait]
pub trait OfflineStore: Send + Sync {
    /// Load the last saved payload for `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the stored copy cannot be read or parsed
    async fn load(&self, id: &RecipeId) -> Result<Option<Value>, CacheError>;

    /// Save `payload` as the latest copy for `id`
    ///
    /// # Errors
    ///
    /// Returns an error if the copy cannot be written
    async fn save(&self, id: &RecipeId, payload: &Value) -> Result<(), CacheError>;
}

/// Retrieval Orchestrator
pub struct RecipeRetriever {
    cache: Arc<TieredCache>,
    source: Arc<dyn RecipeSource>,
    deadline: Duration,
    offline: Option<Arc<dyn OfflineStore>>,
    synthetic: Option<Arc<SyntheticSamples>>,
}

impl RecipeRetriever {
    /// Orchestrator over `cache` and `source` with the default request deadline
    #[must_use]
    pub fn new(cache: Arc<TieredCache>, source: Arc<dyn RecipeSource>) -> Self {
        Self {
            cache,
            source,
            deadline: Duration::from_millis(DEFAULT_REQUEST_DEADLINE_MS),
            offline: None,
            synthetic: None,
        }
    }

    /// Bound the upstream phase of each request by `deadline`
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Persist successes to, and fall back on, a per-id offline store
    #[must_use]
    pub fn with_offline_store(mut self, store: Arc<dyn OfflineStore>) -> Self {
        self.offline = Some(store);
        self
    }

    /// Serve bundled samples when nothing real is obtainable
    #[must_use]
    pub fn with_synthetic(mut self, samples: Arc<SyntheticSamples>) -> Self {
        self.synthetic = Some(samples);
        self
    }

    /// Cache store used by this orchestrator
    #[must_use]
    pub const fn cache(&self) -> &Arc<TieredCache> {
        &self.cache
    }

    /// Retrieve full recipe information for one id
    pub async fn retrieve(&self, request: &RetrievalRequest) -> RetrievalOutcome {
        let started = Instant::now();
        let key = request.cache_key();

        if let Some(hit) = self.cached(&key).await {
            log_outcome(&key, &hit, elapsed_ms(started), 0);
            return hit;
        }

        let mut upstream_calls = 0;
        let classification = timeout(
            self.deadline,
            self.fetch_information(request, &key, &mut upstream_calls),
        )
        .await
        .unwrap_or_else(|_| Classification::Fallback(self.deadline_exceeded()));

        let outcome = match classification {
            Classification::Success(payload) => {
                self.store(&key, &payload).await;
                self.save_offline(&request.id, &payload).await;
                RetrievalOutcome::hit(payload, HitSource::Upstream)
            }
            Classification::NotFound(failure) => RetrievalOutcome::Failure(failure),
            Classification::RetryReduced(failure) | Classification::Fallback(failure) => {
                self.info_fallback(&request.id, &key, &failure).await
            }
        };

        log_outcome(&key, &outcome, elapsed_ms(started), upstream_calls);
        outcome
    }

    /// Run a recipe search through the same cache tiers
    ///
    /// Search issues exactly one upstream call and never retries reduced.
    pub async fn search(&self, query: &SearchQuery) -> RetrievalOutcome {
        let started = Instant::now();
        let query = query.normalized();
        let key = query.canonical_key();

        if let Some(hit) = self.cached(&key).await {
            log_outcome(&key, &hit, elapsed_ms(started), 0);
            return hit;
        }

        let classification = timeout(self.deadline, async {
            classify(Attempt::Search, self.source.search(&query).await)
        })
        .await
        .unwrap_or_else(|_| Classification::Fallback(self.deadline_exceeded()));

        let outcome = match classification {
            Classification::Success(payload) => {
                self.store(&key, &payload).await;
                RetrievalOutcome::hit(payload, HitSource::Upstream)
            }
            Classification::NotFound(failure) => RetrievalOutcome::Failure(failure),
            Classification::RetryReduced(failure) | Classification::Fallback(failure) => {
                self.search_fallback(&query, &key, &failure).await
            }
        };

        log_outcome(&key, &outcome, elapsed_ms(started), 1);
        outcome
    }

    async fn cached(&self, key: &str) -> Option<RetrievalOutcome> {
        let lookup = self.cache.get(key).await;
        for error in &lookup.degraded {
            AppLogger::log_cache_degraded(key, error);
        }
        lookup
            .hit
            .map(|cached| RetrievalOutcome::hit(cached.payload, cached.tier.into()))
    }

    async fn fetch_information(
        &self,
        request: &RetrievalRequest,
        key: &str,
        upstream_calls: &mut u32,
    ) -> Classification {
        *upstream_calls += 1;
        let (attempt, result) = if request.wants_enriched_data {
            (Attempt::Full, self.source.fetch_full(&request.id).await)
        } else {
            (Attempt::Reduced, self.source.fetch_reduced(&request.id).await)
        };

        match classify(attempt, result) {
            Classification::RetryReduced(failure) => {
                AppLogger::log_upstream_retry(key, &failure);
                *upstream_calls += 1;
                let reduced = self.source.fetch_reduced(&request.id).await;
                match classify(Attempt::Reduced, reduced) {
                    // Reduced requests are never retried again
                    Classification::RetryReduced(failure) => Classification::Fallback(failure),
                    other => other,
                }
            }
            other => other,
        }
    }

    async fn store(&self, key: &str, payload: &Value) {
        match self.cache.set(key, payload).await {
            Ok(DurableWrite::Failed(error)) | Err(error) => {
                AppLogger::log_cache_degraded(key, &error);
            }
            Ok(DurableWrite::Stored | DurableWrite::NotConfigured) => {}
        }
    }

    async fn save_offline(&self, id: &RecipeId, payload: &Value) {
        if let Some(offline) = &self.offline {
            if let Err(error) = offline.save(id, payload).await {
                AppLogger::log_cache_degraded(&id.info_cache_key(), &error);
            }
        }
    }

    async fn info_fallback(
        &self,
        id: &RecipeId,
        key: &str,
        cause: &RetrievalFailure,
    ) -> RetrievalOutcome {
        if let Some(offline) = &self.offline {
            match offline.load(id).await {
                Ok(Some(payload)) => {
                    return RetrievalOutcome::hit(payload, HitSource::OfflineFallback)
                }
                Ok(None) => {}
                Err(error) => AppLogger::log_cache_degraded(key, &error),
            }
        }

        if let Some(payload) = self.stale_copy(key).await {
            return RetrievalOutcome::hit(payload, HitSource::OfflineFallback);
        }

        match self.synthetic.as_ref().and_then(|samples| samples.recipe(id)) {
            Some(payload) => RetrievalOutcome::hit(payload, HitSource::SyntheticFallback),
            None => RetrievalOutcome::Failure(RetrievalFailure::no_fallback(cause)),
        }
    }

    async fn search_fallback(
        &self,
        query: &SearchQuery,
        key: &str,
        cause: &RetrievalFailure,
    ) -> RetrievalOutcome {
        if let Some(payload) = self.stale_copy(key).await {
            return RetrievalOutcome::hit(payload, HitSource::OfflineFallback);
        }
        match &self.synthetic {
            Some(samples) => {
                RetrievalOutcome::hit(samples.search_results(query), HitSource::SyntheticFallback)
            }
            None => RetrievalOutcome::Failure(RetrievalFailure::no_fallback(cause)),
        }
    }

    async fn stale_copy(&self, key: &str) -> Option<Value> {
        match self.cache.get_stale(key).await {
            Ok(payload) => payload,
            Err(error) => {
                AppLogger::log_cache_degraded(key, &error);
                None
            }
        }
    }

    fn deadline_exceeded(&self) -> RetrievalFailure {
        RetrievalFailure::new(
            FailureKind::TransientUpstreamFailure,
            format!(
                "upstream did not answer within the {}ms request deadline",
                self.deadline.as_millis()
            ),
        )
    }
}

fn log_outcome(key: &str, outcome: &RetrievalOutcome, duration_ms: u64, upstream_calls: u32) {
    match outcome {
        RetrievalOutcome::Hit { source, .. } => {
            AppLogger::log_retrieval(key, *source, duration_ms, upstream_calls);
        }
        RetrievalOutcome::Failure(failure) => {
            AppLogger::log_retrieval_failure(key, failure, duration_ms, upstream_calls);
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
