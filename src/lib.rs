// ABOUTME: Main library entry point for the recipe relay retrieval service
// ABOUTME: Multi-tier recipe cache, retrieval orchestrator, HTTP server and client entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Relay
//!
//! A read-through relay in front of the Spoonacular recipe API.
//!
//! ## Architecture
//!
//! - **Cache**: in-process LRU tier plus an optional durable REST tier
//! - **Retrieval**: cache read, enriched request, one reduced retry, fallback chain
//! - **Routes**: the server entry point (`/api/spoonacular/info`, `/api/spoonacular/search`)
//! - **Client**: the same contract with proxy/direct routing and a local persistence tier
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use recipe_relay::config::ServerConfig;
//! use recipe_relay::resources::ServerResources;
//! use recipe_relay::routes::build_router;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let port = config.http_port;
//!     let router = build_router(Arc::new(ServerResources::new(config)));
//!     let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub use recipe_relay_core::{constants, errors, models};

/// Cache store tiers and composition
pub mod cache;

/// Client entry point
pub mod client;

/// Environment configuration
pub mod config;

/// Logging setup and structured event helpers
pub mod logging;

/// Shared server resources
pub mod resources;

/// Retrieval orchestrator
pub mod retrieval;

/// HTTP routes
pub mod routes;
