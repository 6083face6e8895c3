// ABOUTME: HTTP edge constants for routes, response headers, and ports
// ABOUTME: Used by the server entry point and by the proxy-mode client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Recipe information route
pub const INFO_PATH: &str = "/api/spoonacular/info";

/// Recipe search route
pub const SEARCH_PATH: &str = "/api/spoonacular/search";

/// Liveness route
pub const HEALTH_PATH: &str = "/health";

/// Readiness route
pub const READY_PATH: &str = "/ready";

/// Cache status response header
pub const X_CACHE: &str = "x-cache";

/// Exact hit source response header
pub const X_RECIPE_SOURCE: &str = "x-recipe-source";

/// `x-cache` value for memory and durable hits
pub const CACHE_HIT: &str = "HIT";

/// `x-cache` value for everything else
pub const CACHE_MISS: &str = "MISS";

/// Cache lifetime hint for intermediaries on success
pub const PUBLIC_CACHE_CONTROL: &str = "public, max-age=60";

/// Default HTTP listen port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default proxy base used by the client
pub const DEFAULT_PROXY_BASE: &str = "http://localhost:8081/api";
