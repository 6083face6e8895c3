// ABOUTME: Cache-related constants for TTL, capacity, and key namespaces
// ABOUTME: Shared by the in-process tier, the durable REST tier, and the client store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default cache TTL in milliseconds (6 hours)
pub const DEFAULT_CACHE_TTL_MS: u64 = 21_600_000;

/// Default maximum cache entries for the in-process tier
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default bound on each durable tier call in milliseconds
pub const DEFAULT_DURABLE_TIMEOUT_MS: u64 = 1_500;

/// Key namespace for recipe information lookups
pub const INFO_KEY_PREFIX: &str = "info:";

/// Key namespace for recipe search lookups
pub const SEARCH_KEY_PREFIX: &str = "search:";

/// Directory name used for the client-local persistence tier
pub const LOCAL_STORE_DIR_NAME: &str = "recipe-relay";

/// File name prefix for client-local recipe copies
pub const LOCAL_STORE_FILE_PREFIX: &str = "recipe_cache_";
