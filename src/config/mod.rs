// ABOUTME: Configuration management module for the recipe relay server and client
// ABOUTME: Environment-only configuration loaded once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: server and client configuration from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{
    CacheConfig, ClientConfig, DurableCacheConfig, RetrievalConfig, ServerConfig, UpstreamConfig,
};
