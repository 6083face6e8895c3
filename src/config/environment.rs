// ABOUTME: Environment configuration for the relay server and the client entry point
// ABOUTME: Parses ports, upstream credentials, cache tiers, deadlines, and client flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! Absent variables fall back to defaults; present but malformed values are
//! configuration errors. Secrets never appear in `Debug` output or summaries.

use anyhow::{Context, Result};
use recipe_relay_core::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_MS, DEFAULT_DURABLE_TIMEOUT_MS,
    LOCAL_STORE_DIR_NAME,
};
use recipe_relay_core::constants::http::{DEFAULT_HTTP_PORT, DEFAULT_PROXY_BASE};
use recipe_relay_core::constants::upstream::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_DEADLINE_MS,
    DEFAULT_TIMEOUT_SECS,
};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Upstream recipe API settings
#[derive(Clone)]
pub struct UpstreamConfig {
    /// API credential; `None` means retrieval is misconfigured
    pub api_key: Option<String>,
    /// Base URL
    pub base_url: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    /// Load from `SPOONACULAR_*` and `UPSTREAM_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout value is not a valid integer
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: non_empty_var("SPOONACULAR_KEY"),
            base_url: env_var_or("SPOONACULAR_BASE_URL", DEFAULT_BASE_URL),
            timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            connect_timeout_secs: parse_var(
                "UPSTREAM_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?,
        })
    }

    /// Whether a credential is configured
    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Durable cache tier endpoint
#[derive(Clone)]
pub struct DurableCacheConfig {
    /// REST endpoint
    pub url: String,
    /// Bearer token
    pub token: String,
    /// Bound on each durable call
    pub timeout: Duration,
}

impl fmt::Debug for DurableCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurableCacheConfig")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Cache store settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entry TTL
    pub ttl: Duration,
    /// In-process tier capacity
    pub max_entries: usize,
    /// Durable tier, present only when both endpoint and token are set
    pub durable: Option<DurableCacheConfig>,
}

impl CacheConfig {
    /// Load from `CACHE_*`, `UPSTASH_*` and `DURABLE_CACHE_*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric value is malformed
    pub fn from_env() -> Result<Self> {
        let durable_timeout =
            Duration::from_millis(parse_var("DURABLE_CACHE_TIMEOUT_MS", DEFAULT_DURABLE_TIMEOUT_MS)?);
        let durable = match (
            non_empty_var("UPSTASH_REDIS_REST_URL"),
            non_empty_var("UPSTASH_REDIS_REST_TOKEN"),
        ) {
            (Some(url), Some(token)) => Some(DurableCacheConfig {
                url,
                token,
                timeout: durable_timeout,
            }),
            (None, None) => None,
            _ => {
                debug!("Durable cache needs both UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN; tier disabled");
                None
            }
        };

        Ok(Self {
            ttl: Duration::from_millis(parse_var("CACHE_TTL_MS", DEFAULT_CACHE_TTL_MS)?),
            max_entries: parse_var("CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?,
            durable,
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            durable: None,
        }
    }
}

/// Retrieval pipeline settings
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Deadline for the upstream phase of one request
    pub request_deadline: Duration,
}

impl RetrievalConfig {
    /// Load from `REQUEST_DEADLINE_MS`
    ///
    /// # Errors
    ///
    /// Returns an error if the value is malformed
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            request_deadline: Duration::from_millis(parse_var(
                "REQUEST_DEADLINE_MS",
                DEFAULT_REQUEST_DEADLINE_MS,
            )?),
        })
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            request_deadline: Duration::from_millis(DEFAULT_REQUEST_DEADLINE_MS),
        }
    }
}

/// Server entry point configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Upstream settings
    pub upstream: UpstreamConfig,
    /// Cache settings
    pub cache: CacheConfig,
    /// Pipeline settings
    pub retrieval: RetrievalConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any present value is malformed
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let config = Self {
            http_port: parse_var("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            upstream: UpstreamConfig::from_env()?,
            cache: CacheConfig::from_env()?,
            retrieval: RetrievalConfig::from_env()?,
        };
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// One-line summary for logs, without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} upstream={} credential={} cache_ttl_ms={} cache_max_entries={} durable_tier={} request_deadline_ms={}",
            self.http_port,
            self.upstream.base_url,
            if self.upstream.has_credential() { "configured" } else { "missing" },
            self.cache.ttl.as_millis(),
            self.cache.max_entries,
            if self.cache.durable.is_some() { "enabled" } else { "disabled" },
            self.retrieval.request_deadline.as_millis(),
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

/// Client entry point configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Route calls through a relay server instead of upstream
    pub use_proxy: bool,
    /// Relay server API base (`.../api`)
    pub proxy_base: String,
    /// Directory of the local persistence tier
    pub local_dir: PathBuf,
    /// Upstream disabled: info lookups answer from local copies only
    pub upstream_disabled: bool,
    /// Search always answers from bundled samples
    pub force_samples: bool,
    /// Direct-mode upstream settings
    pub upstream: UpstreamConfig,
    /// Direct-mode in-process cache settings
    pub cache: CacheConfig,
    /// Pipeline settings
    pub retrieval: RetrievalConfig,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// The client never uses the durable tier.
    ///
    /// # Errors
    ///
    /// Returns an error if any present value is malformed
    pub fn from_env() -> Result<Self> {
        let mut cache = CacheConfig::from_env()?;
        cache.durable = None;
        Ok(Self {
            use_proxy: parse_flag("RECIPE_RELAY_USE_PROXY")?,
            proxy_base: env_var_or("RECIPE_RELAY_PROXY_BASE", DEFAULT_PROXY_BASE),
            local_dir: non_empty_var("RECIPE_RELAY_LOCAL_DIR")
                .map_or_else(default_local_dir, PathBuf::from),
            upstream_disabled: parse_flag("RECIPE_RELAY_DISABLE_UPSTREAM")?,
            force_samples: parse_flag("RECIPE_RELAY_FORCE_SAMPLES")?,
            upstream: UpstreamConfig::from_env()?,
            cache,
            retrieval: RetrievalConfig::from_env()?,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            use_proxy: false,
            proxy_base: DEFAULT_PROXY_BASE.to_owned(),
            local_dir: default_local_dir(),
            upstream_disabled: false,
            force_samples: false,
            upstream: UpstreamConfig::default(),
            cache: CacheConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

fn default_local_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join(LOCAL_STORE_DIR_NAME)
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key).map_or(Ok(default), |raw| {
        raw.parse()
            .with_context(|| format!("Invalid {key} value: {raw}"))
    })
}

fn parse_flag(key: &str) -> Result<bool> {
    match non_empty_var(key).map(|raw| raw.to_ascii_lowercase()).as_deref() {
        None | Some("false" | "0" | "no" | "off") => Ok(false),
        Some("true" | "1" | "yes" | "on") => Ok(true),
        Some(other) => Err(anyhow::anyhow!("Invalid {key} value: {other}")),
    }
}
