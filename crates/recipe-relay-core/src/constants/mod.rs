// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for caching, the upstream recipe API, and the HTTP edge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, key namespaces)
pub mod cache;
/// HTTP edge constants (paths, headers, ports)
pub mod http;
/// Upstream recipe API constants (URLs, parameters, timeouts)
pub mod upstream;

/// Service identity
pub mod service_names {
    /// Service name reported in logs and health responses
    pub const RECIPE_RELAY: &str = "recipe-relay";
    /// Upstream provider name used in error messages
    pub const SPOONACULAR: &str = "Spoonacular";
    /// Durable cache provider name used in error messages
    pub const UPSTASH: &str = "Upstash Redis REST";
}
