// ABOUTME: Upstream recipe client crate for the recipe-relay service
// ABOUTME: Issues enriched and reduced information requests and classifies the responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Relay Upstream
//!
//! The upstream recipe API is treated as an opaque service with a documented
//! fault contract. This crate owns everything that touches it:
//!
//! - **source**: the `RecipeSource` trait the orchestrator depends on
//! - **spoonacular**: the reqwest-backed implementation
//! - **classify**: turns raw responses into retry/fallback/terminal signals
//! - **circuit_breaker**: fails fast while upstream is unhealthy
//! - **http_client**: shared pooled HTTP client with configured timeouts

/// Circuit breaker guarding upstream calls
pub mod circuit_breaker;
/// Response classification
pub mod classify;
/// Upstream transport errors
pub mod errors;
/// Shared HTTP client
pub mod http_client;
/// Recipe source abstraction
pub mod source;
/// Spoonacular implementation of `RecipeSource`
pub mod spoonacular;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use classify::{classify, Attempt, Classification};
pub use errors::UpstreamError;
pub use http_client::{build_client, initialize_shared_client, shared_client, ClientTimeouts};
pub use source::{RawResponse, RecipeSource};
pub use spoonacular::{SpoonacularClient, SpoonacularConfig};
