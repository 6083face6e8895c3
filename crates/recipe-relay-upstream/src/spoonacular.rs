// ABOUTME: Spoonacular recipe API client implementing RecipeSource
// ABOUTME: Injects the credential as a query parameter and logs request paths only
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Spoonacular API client
//!
//! Information lookups hit `/recipes/{id}/information` with
//! `includeNutrition=true` (enriched) or `includeNutrition=false` (reduced).
//! Searches hit `/recipes/complexSearch`. The API key travels as the `apiKey`
//! query parameter and is added only when the request is built.

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::errors::UpstreamError;
use crate::http_client::shared_client;
use crate::source::{RawResponse, RecipeSource};
use async_trait::async_trait;
use recipe_relay_core::constants::service_names::SPOONACULAR;
use recipe_relay_core::constants::upstream::{
    API_KEY_PARAM, COMPLEX_SEARCH_PATH, DEFAULT_BASE_URL, INCLUDE_NUTRITION_PARAM,
};
use recipe_relay_core::models::{RecipeId, SearchQuery};
use std::fmt;
use std::time::Instant;
use tracing::debug;

/// Spoonacular client configuration
#[derive(Clone)]
pub struct SpoonacularConfig {
    /// API credential
    pub api_key: String,
    /// Base URL, without trailing slash
    pub base_url: String,
}

impl SpoonacularConfig {
    /// Configuration against the public API
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }
}

impl fmt::Debug for SpoonacularConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpoonacularConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Spoonacular `RecipeSource`
pub struct SpoonacularClient {
    config: SpoonacularConfig,
    http_client: reqwest::Client,
    breaker: CircuitBreaker,
}

impl SpoonacularClient {
    /// Client using the shared pooled HTTP client and default breaker thresholds
    #[must_use]
    pub fn new(config: SpoonacularConfig) -> Self {
        Self::with_parts(config, shared_client().clone(), CircuitBreakerConfig::default())
    }

    /// Client with an explicit HTTP client and breaker configuration
    #[must_use]
    pub fn with_parts(
        config: SpoonacularConfig,
        http_client: reqwest::Client,
        breaker: CircuitBreakerConfig,
    ) -> Self {
        Self {
            config,
            http_client,
            breaker: CircuitBreaker::with_config(SPOONACULAR, breaker),
        }
    }

    /// Circuit breaker guarding this client
    #[must_use]
    pub const fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn information(&self, id: &RecipeId, enriched: bool) -> Result<RawResponse, UpstreamError> {
        let path = format!("/recipes/{id}/information");
        let flag = if enriched { "true" } else { "false" };
        self.get(&path, &[(INCLUDE_NUTRITION_PARAM, flag.to_owned())])
            .await
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<RawResponse, UpstreamError> {
        let url = format!("{}{path}", self.config.base_url);
        self.breaker
            .call(async {
                let started = Instant::now();
                let response = self
                    .http_client
                    .get(&url)
                    .query(params)
                    .query(&[(API_KEY_PARAM, self.config.api_key.as_str())])
                    .send()
                    .await
                    .map_err(|e| UpstreamError::from_reqwest(SPOONACULAR, e))?;

                let status = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .map_err(|e| UpstreamError::from_reqwest(SPOONACULAR, e))?;

                debug!(
                    upstream.path = path,
                    upstream.status = status,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Spoonacular call completed"
                );
                Ok::<_, UpstreamError>(RawResponse { status, body })
            })
            .await
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    fn name(&self) -> &'static str {
        SPOONACULAR
    }

    async fn fetch_full(&self, id: &RecipeId) -> Result<RawResponse, UpstreamError> {
        self.information(id, true).await
    }

    async fn fetch_reduced(&self, id: &RecipeId) -> Result<RawResponse, UpstreamError> {
        self.information(id, false).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, UpstreamError> {
        self.get(COMPLEX_SEARCH_PATH, &query.upstream_params()).await
    }
}
