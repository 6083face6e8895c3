// ABOUTME: Durable cache tier speaking the Upstash Redis REST protocol over HTTPS
// ABOUTME: Optional; feature-detected from an endpoint URL and a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Durable tier
//!
//! Protocol:
//! - `GET  {url}/get/{key}` answers `{"result": "<text>" | null}`
//! - `POST {url}/set/{key}?EX={seconds}` with the value as request body
//! - `GET  {url}/ping` answers `{"result": "PONG"}`
//!
//! Values are a JSON record `{"storedAtMillis": .., "payload": ".."}` so that
//! re-hydrated entries keep their original write time.

use super::{CacheEntry, CacheError, CacheTier};
use crate::config::environment::DurableCacheConfig;
use async_trait::async_trait;
use recipe_relay_core::constants::service_names::UPSTASH;
use recipe_relay_upstream::shared_client;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const TIER: &str = "durable";

/// Wire shape of a stored value
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DurableRecord {
    stored_at_millis: u64,
    payload: String,
}

/// REST response envelope
#[derive(Debug, Deserialize)]
struct RestResult {
    result: Option<String>,
}

/// Upstash-compatible REST tier
pub struct UpstashRestTier {
    http_client: Client,
    base_url: String,
    token: String,
}

impl UpstashRestTier {
    /// Tier using the shared HTTP client
    #[must_use]
    pub fn new(config: &DurableCacheConfig) -> Self {
        Self::with_client(config, shared_client().clone())
    }

    /// Tier using an explicit HTTP client
    #[must_use]
    pub fn with_client(config: &DurableCacheConfig, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        }
    }

    fn endpoint(&self, command: &str, key: &str) -> String {
        format!("{}/{command}/{}", self.base_url, urlencoding::encode(key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CacheError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| unavailable(&e.without_url().to_string()))?;
        if !response.status().is_success() {
            return Err(unavailable(&format!("{UPSTASH} returned HTTP {}", response.status())));
        }
        Ok(response)
    }
}

fn unavailable(reason: &str) -> CacheError {
    CacheError::Unavailable {
        tier: TIER,
        reason: reason.to_owned(),
    }
}

#[async_trait]
impl CacheTier for UpstashRestTier {
    fn name(&self) -> &'static str {
        TIER
    }

    async fn read(&self, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let response = self.send(self.http_client.get(self.endpoint("get", key))).await?;
        let envelope: RestResult = response
            .json()
            .await
            .map_err(|e| unavailable(&e.without_url().to_string()))?;

        let Some(text) = envelope.result else {
            return Ok(None);
        };
        let record: DurableRecord =
            serde_json::from_str(&text).map_err(|e| CacheError::Malformed {
                key: key.to_owned(),
                reason: e.to_string(),
            })?;
        Ok(Some(CacheEntry::with_timestamp(
            key,
            record.payload,
            record.stored_at_millis,
        )))
    }

    async fn write(&self, entry: &CacheEntry, ttl: Duration) -> Result<(), CacheError> {
        let record = serde_json::to_string(&DurableRecord {
            stored_at_millis: entry.stored_at_millis,
            payload: entry.payload.clone(),
        })
        .map_err(|e| CacheError::Serialization(e.to_string()))?;
        let expiry_secs = ttl.as_secs().max(1);

        self.send(
            self.http_client
                .post(self.endpoint("set", &entry.key))
                .query(&[("EX", expiry_secs)])
                .body(record),
        )
        .await?;
        debug!(cache.key = %entry.key, expiry_secs, "Durable cache write stored");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), CacheError> {
        let response = self
            .send(self.http_client.get(format!("{}/ping", self.base_url)))
            .await?;
        let envelope: RestResult = response
            .json()
            .await
            .map_err(|e| unavailable(&e.without_url().to_string()))?;
        match envelope.result.as_deref() {
            Some("PONG") => Ok(()),
            other => Err(unavailable(&format!("unexpected ping reply {other:?}"))),
        }
    }
}
