// ABOUTME: Abstraction over the upstream recipe API used by the retrieval orchestrator
// ABOUTME: Implementations return raw status and body; classification happens separately
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::UpstreamError;
use async_trait::async_trait;
use recipe_relay_core::models::{RecipeId, SearchQuery};

/// Status and body of one upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Build a response
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// 5xx status
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }
}

/// Upstream recipe API
///
/// `fetch_full` requests the enriched variant (nutrition included);
/// `fetch_reduced` requests the same resource without it.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Name used in logs and failure details
    fn name(&self) -> &'static str;

    /// Enriched information request
    async fn fetch_full(&self, id: &RecipeId) -> Result<RawResponse, UpstreamError>;

    /// Reduced information request
    async fn fetch_reduced(&self, id: &RecipeId) -> Result<RawResponse, UpstreamError>;

    /// Recipe search request
    async fn search(&self, query: &SearchQuery) -> Result<RawResponse, UpstreamError>;
}
