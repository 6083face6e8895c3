// ABOUTME: Constants for the upstream recipe information API
// ABOUTME: Base URL, query parameter names, search defaults, and timeouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default upstream base URL
pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com";

/// Query parameter carrying the upstream credential
pub const API_KEY_PARAM: &str = "apiKey";

/// Query parameter toggling the enriched (nutrition) variant
pub const INCLUDE_NUTRITION_PARAM: &str = "includeNutrition";

/// Path of the complex search endpoint
pub const COMPLEX_SEARCH_PATH: &str = "/recipes/complexSearch";

/// Default number of search results
pub const DEFAULT_SEARCH_RESULTS: u32 = 24;

/// Upper bound on search results accepted from callers
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Default per-call upstream timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default upstream connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

/// Default deadline for the upstream phase of one inbound request
pub const DEFAULT_REQUEST_DEADLINE_MS: u64 = 10_000;

/// Consecutive failures before the circuit breaker opens
pub const CIRCUIT_FAILURE_THRESHOLD: u32 = 5;

/// Time the circuit stays open before probing again
pub const CIRCUIT_RECOVERY_TIMEOUT_SECS: u64 = 30;

/// Successful probes needed to close the circuit from half-open
pub const CIRCUIT_SUCCESS_THRESHOLD: u32 = 1;

/// Maximum accepted length for a recipe identifier
pub const MAX_RECIPE_ID_LEN: usize = 64;
