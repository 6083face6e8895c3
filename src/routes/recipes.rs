// ABOUTME: Server entry point for recipe information and recipe search lookups
// ABOUTME: Validates input, runs the retrieval pipeline, and annotates cache headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recipe routes
//!
//! `GET /api/spoonacular/info?id=<id>` and `GET /api/spoonacular/search?q=...`.
//! Successful responses carry `x-cache`, `x-recipe-source` and a short public
//! `Cache-Control` lifetime. Terminal failures mirror the upstream status.

use crate::resources::ServerResources;
use crate::retrieval::RecipeRetriever;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use recipe_relay_core::constants::http::{
    CACHE_HIT, CACHE_MISS, INFO_PATH, PUBLIC_CACHE_CONTROL, SEARCH_PATH, X_CACHE, X_RECIPE_SOURCE,
};
use recipe_relay_core::errors::AppError;
use recipe_relay_core::models::{
    HitSource, RecipeId, RetrievalOutcome, RetrievalRequest, SearchQuery,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Query parameters of the info endpoint
#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    /// Recipe id
    pub id: Option<String>,
}

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create the info and search routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                INFO_PATH,
                get(Self::handle_info)
                    .head(Self::handle_method_not_allowed)
                    .fallback(Self::handle_method_not_allowed),
            )
            .route(
                SEARCH_PATH,
                get(Self::handle_search)
                    .head(Self::handle_method_not_allowed)
                    .fallback(Self::handle_method_not_allowed),
            )
            .with_state(resources)
    }

    /// Handle GET /api/spoonacular/info
    async fn handle_info(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<InfoQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let retriever = Self::retriever(&resources)?;
        let Query(query) = query.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let raw_id = query.id.unwrap_or_default();
        if raw_id.trim().is_empty() {
            return Err(AppError::missing_field("id"));
        }
        let id = RecipeId::parse(&raw_id)?;

        let outcome = retriever.retrieve(&RetrievalRequest::new(id)).await;
        Self::respond(outcome)
    }

    /// Handle GET /api/spoonacular/search
    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        query: Result<Query<SearchQuery>, QueryRejection>,
    ) -> Result<Response, AppError> {
        let retriever = Self::retriever(&resources)?;
        let Query(query) = query.map_err(|e| AppError::invalid_input(e.body_text()))?;

        let outcome = retriever.search(&query).await;
        Self::respond(outcome)
    }

    /// Rejects every method but GET, HEAD included
    async fn handle_method_not_allowed() -> AppError {
        AppError::method_not_allowed()
    }

    fn retriever(resources: &ServerResources) -> Result<&Arc<RecipeRetriever>, AppError> {
        resources
            .retriever
            .as_ref()
            .ok_or_else(|| AppError::config_missing("Missing SPOONACULAR_KEY"))
    }

    fn respond(outcome: RetrievalOutcome) -> Result<Response, AppError> {
        let (payload, source) = outcome.into_result()?;
        Ok(success_response(payload, source))
    }
}

fn success_response(payload: Value, source: HitSource) -> Response {
    let cache_status = if source.is_cache_hit() {
        CACHE_HIT
    } else {
        CACHE_MISS
    };
    let mut response = (StatusCode::OK, Json(payload)).into_response();
    let headers = response.headers_mut();
    headers.insert(X_CACHE, HeaderValue::from_static(cache_status));
    headers.insert(X_RECIPE_SOURCE, HeaderValue::from_static(source.as_str()));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(PUBLIC_CACHE_CONTROL),
    );
    response
}
