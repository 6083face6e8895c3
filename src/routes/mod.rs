// ABOUTME: Route module organization for the recipe relay HTTP endpoints
// ABOUTME: Assembles recipe and health routes with request tracing and request ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes

/// Health check and readiness routes
pub mod health;
/// Recipe information and search routes
pub mod recipes;

pub use health::HealthRoutes;
pub use recipes::RecipeRoutes;

use crate::resources::ServerResources;
use axum::{
    extract::{MatchedPath, Request},
    http::Response,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    classify::ServerErrorsFailureClass,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(RecipeRoutes::routes(resources))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map_or_else(|| request.uri().path(), MatchedPath::as_str);
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or_default();
                    tracing::info_span!(
                        "http_request",
                        http.method = %request.method(),
                        http.path = %path,
                        request.id = %request_id,
                    )
                })
                .on_request(|_request: &Request, _span: &Span| {})
                .on_response(|response: &Response<_>, latency: Duration, _span: &Span| {
                    tracing::info!(
                        http.status = %response.status().as_u16(),
                        http.duration_ms = %latency.as_millis(),
                        "HTTP request"
                    );
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!(
                            error = %error,
                            http.duration_ms = %latency.as_millis(),
                            "HTTP request failed"
                        );
                    },
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
