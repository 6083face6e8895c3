// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Readiness reports credential configuration and durable cache tier availability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes
//!
//! `/health` is liveness only. `/ready` answers 503 when the upstream
//! credential is missing; a durable tier that fails its ping is reported but
//! does not make the service unready, since it only degrades to memory.

use crate::resources::ServerResources;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use recipe_relay_core::constants::http::{HEALTH_PATH, READY_PATH};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(Self::handle_health))
            .route(READY_PATH, get(Self::handle_ready))
            .with_state(resources)
    }

    async fn handle_health() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(
        State(resources): State<Arc<ServerResources>>,
    ) -> (StatusCode, Json<Value>) {
        let credential_configured = resources.credential_configured();
        let durable = match resources.cache.durable_health().await {
            None => json!({"configured": false}),
            Some(Ok(())) => json!({"configured": true, "reachable": true}),
            Some(Err(error)) => json!({
                "configured": true,
                "reachable": false,
                "error": error.to_string()
            }),
        };

        let status = if credential_configured {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (
            status,
            Json(json!({
                "status": if credential_configured { "ready" } else { "not_ready" },
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "checks": {
                    "upstream_credential": credential_configured,
                    "durable_cache": durable,
                    "durable_available": resources.cache.durable_available()
                }
            })),
        )
    }
}
