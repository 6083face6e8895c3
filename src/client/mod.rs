// ABOUTME: Client entry point offering the retrieval contract with proxy or direct routing
// ABOUTME: Adds the local persistence tier, feature flags, and sample-data search fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Client entry point
//!
//! Routing for an info lookup:
//!
//! 1. upstream disabled: local copy or `MisconfiguredDependency`
//! 2. proxy mode: the relay server; on failure the local copy, then direct
//!    mode when a credential is configured
//! 3. direct mode: an in-process [`RecipeRetriever`] (memory tier first,
//!    local copies as offline fallback, bundled samples last)
//!
//! Search always ends in bundled samples rather than a failure.

/// Per-id local persistence tier
pub mod local_store;

pub use local_store::LocalRecipeStore;

use crate::cache::store::ReadOrder;
use crate::config::ClientConfig;
use crate::resources::{build_tiered_cache, build_upstream_source};
use crate::retrieval::{OfflineStore, RecipeRetriever, SyntheticSamples};
use recipe_relay_core::constants::http::{CACHE_HIT, X_CACHE, X_RECIPE_SOURCE};
use recipe_relay_core::errors::{AppResult, FailureKind, RetrievalFailure};
use recipe_relay_core::models::{
    HitSource, RecipeId, RetrievalOutcome, RetrievalRequest, SearchQuery,
};
use recipe_relay_upstream::{build_client, shared_client, ClientTimeouts, RecipeSource};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Client-side retrieval entry point
pub struct RecipeClient {
    config: ClientConfig,
    http_client: Client,
    local: Arc<LocalRecipeStore>,
    samples: Arc<SyntheticSamples>,
    direct: Option<RecipeRetriever>,
}

impl RecipeClient {
    /// Client for `config`, using the shared HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled sample data cannot be parsed
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let source = build_upstream_source(&config.upstream);
        Ok(Self::with_parts(
            config,
            shared_client().clone(),
            source,
            SyntheticSamples::bundled()?,
        ))
    }

    /// Client with explicit parts
    #[must_use]
    pub fn with_parts(
        config: ClientConfig,
        http_client: Client,
        source: Option<Arc<dyn RecipeSource>>,
        samples: SyntheticSamples,
    ) -> Self {
        let local = Arc::new(LocalRecipeStore::new(config.local_dir.clone()));
        let samples = Arc::new(samples);
        let direct = source.map(|source| {
            let cache = Arc::new(build_tiered_cache(&config.cache, ReadOrder::FastFirst));
            let offline: Arc<dyn OfflineStore> = local.clone();
            RecipeRetriever::new(cache, source)
                .with_deadline(config.retrieval.request_deadline)
                .with_offline_store(offline)
                .with_synthetic(Arc::clone(&samples))
        });
        Self {
            config,
            http_client,
            local,
            samples,
            direct,
        }
    }

    /// Client whose proxy calls use their own HTTP client bounded by `timeouts`
    #[must_use]
    pub fn with_proxy_timeouts(mut self, timeouts: ClientTimeouts) -> Self {
        self.http_client = build_client(timeouts);
        self
    }

    /// Local persistence tier
    #[must_use]
    pub fn local_store(&self) -> &LocalRecipeStore {
        &self.local
    }

    /// Retrieve full recipe information for `id`
    pub async fn info(&self, id: &RecipeId) -> RetrievalOutcome {
        if self.config.upstream_disabled {
            return match self.local_copy(id).await {
                Some(payload) => RetrievalOutcome::hit(payload, HitSource::OfflineFallback),
                None => RetrievalOutcome::Failure(RetrievalFailure::misconfigured(
                    "recipe lookups are disabled and no local copy exists",
                )),
            };
        }

        if self.config.use_proxy {
            match self.proxy_info(id).await {
                Ok((payload, source)) => {
                    if let Err(error) = self.local.save(id, &payload).await {
                        warn!(recipe.id = %id, error = %error, "Failed to save local recipe copy");
                    }
                    return RetrievalOutcome::hit(payload, source);
                }
                Err(failure) if failure.kind == FailureKind::NotFound => {
                    return RetrievalOutcome::Failure(failure);
                }
                Err(failure) => {
                    warn!(recipe.id = %id, failure = %failure, "Proxy lookup failed");
                    if let Some(payload) = self.local_copy(id).await {
                        return RetrievalOutcome::hit(payload, HitSource::OfflineFallback);
                    }
                }
            }
        }

        match &self.direct {
            Some(retriever) => retriever.retrieve(&RetrievalRequest::new(id.clone())).await,
            None => RetrievalOutcome::Failure(RetrievalFailure::misconfigured(
                "SPOONACULAR_KEY is not configured",
            )),
        }
    }

    /// Search recipes; failures answer with bundled samples
    pub async fn search(&self, query: &SearchQuery) -> RetrievalOutcome {
        if self.config.force_samples || self.config.upstream_disabled {
            info!("Answering search from bundled samples");
            return self.sample_search(query);
        }

        if self.config.use_proxy {
            match self.proxy_get("spoonacular/search", &query.proxy_params()).await {
                Ok((payload, source)) => return RetrievalOutcome::hit(payload, source),
                Err(failure) => warn!(failure = %failure, "Proxy search failed"),
            }
        }

        let Some(retriever) = &self.direct else {
            return self.sample_search(query);
        };
        match retriever.search(query).await {
            RetrievalOutcome::Failure(failure) => {
                warn!(failure = %failure, "Search failed, answering from bundled samples");
                self.sample_search(query)
            }
            hit => hit,
        }
    }

    fn sample_search(&self, query: &SearchQuery) -> RetrievalOutcome {
        RetrievalOutcome::hit(
            self.samples.search_results(&query.normalized()),
            HitSource::SyntheticFallback,
        )
    }

    async fn local_copy(&self, id: &RecipeId) -> Option<Value> {
        match self.local.load(id).await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(recipe.id = %id, error = %error, "Ignoring unreadable local recipe copy");
                None
            }
        }
    }

    async fn proxy_info(&self, id: &RecipeId) -> Result<(Value, HitSource), RetrievalFailure> {
        self.proxy_get("spoonacular/info", &[("id", id.to_string())])
            .await
    }

    async fn proxy_get(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(Value, HitSource), RetrievalFailure> {
        let url = format!("{}/{path}", self.config.proxy_base.trim_end_matches('/'));
        let response = self
            .http_client
            .get(&url)
            .query(params)
            .timeout(self.proxy_timeout())
            .send()
            .await
            .map_err(|e| transient(format!("proxy unreachable: {}", e.without_url()), None))?;

        let status = response.status().as_u16();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));
        let source = proxy_source(&response);

        if !response.status().is_success() {
            // A JSON 404 is the relay confirming the recipe does not exist
            if status == 404 && is_json {
                return Err(RetrievalFailure::new(
                    FailureKind::NotFound,
                    "recipe not found",
                )
                .with_upstream_status(Some(status)));
            }
            return Err(transient(format!("proxy answered HTTP {status}"), Some(status)));
        }
        if !is_json {
            return Err(transient("proxy answered without JSON".to_owned(), Some(status)));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| transient(format!("proxy body unreadable: {}", e.without_url()), Some(status)))?;
        Ok((payload, source))
    }

    fn proxy_timeout(&self) -> Duration {
        self.config.retrieval.request_deadline
    }
}

fn proxy_source(response: &reqwest::Response) -> HitSource {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };
    header(X_RECIPE_SOURCE)
        .and_then(HitSource::parse)
        .unwrap_or_else(|| {
            if header(X_CACHE) == Some(CACHE_HIT) {
                HitSource::Memory
            } else {
                HitSource::Upstream
            }
        })
}

fn transient(detail: String, status: Option<u16>) -> RetrievalFailure {
    RetrievalFailure::new(FailureKind::TransientUpstreamFailure, detail).with_upstream_status(status)
}
