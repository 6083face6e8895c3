// ABOUTME: Logging configuration and structured retrieval events for the recipe relay
// ABOUTME: Sets up the tracing subscriber with env filter, output format, and noise reduction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup

use crate::cache::store::ReadOrder;
use anyhow::Result;
use recipe_relay_core::constants::service_names;
use recipe_relay_core::errors::RetrievalFailure;
use recipe_relay_core::models::HitSource;
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span enter/exit events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for the command-line client
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty output
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::RECIPE_RELAY.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = LogFormat::from_str_or_default(env::var("LOG_FORMAT").as_deref().unwrap_or(""));
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::RECIPE_RELAY.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    /// Filter with noise reduction applied on top of `RUST_LOG` or the configured level
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").unwrap_or_else(|_| self.level.clone());
        let own_level = format!("recipe_relay={}", self.level);
        [
            "hyper=warn",
            "hyper::proto=warn",
            "reqwest=warn",
            "tower_http=info",
            own_level.as_str(),
        ]
        .into_iter()
        .fold(EnvFilter::new(base), |filter, directive| {
            filter.add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::INFO.into()),
            )
        })
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_thread_ids(self.include_thread)
                    .with_thread_names(self.include_thread)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                // stderr keeps stdout clean for CLI output
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Recipe relay starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });
        info!("Logging configured: {}", config_summary);
    }
}

/// Initialize logging with default configuration
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_default() -> Result<()> {
    LoggingConfig::default().init()
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Application-specific logging utilities
pub struct AppLogger;

impl AppLogger {
    /// Log a completed retrieval that produced a payload
    pub fn log_retrieval(key: &str, source: HitSource, duration_ms: u64, upstream_calls: u32) {
        info!(
            recipe.key = %key,
            retrieval.source = %source,
            retrieval.duration_ms = %duration_ms,
            upstream.calls = %upstream_calls,
            "Retrieval completed"
        );
    }

    /// Log a retrieval that ended in a typed failure
    pub fn log_retrieval_failure(
        key: &str,
        failure: &RetrievalFailure,
        duration_ms: u64,
        upstream_calls: u32,
    ) {
        warn!(
            recipe.key = %key,
            failure.kind = %failure.kind,
            failure.detail = %failure.detail,
            failure.upstream_status = ?failure.upstream_status,
            retrieval.duration_ms = %duration_ms,
            upstream.calls = %upstream_calls,
            "Retrieval failed"
        );
    }

    /// Log a cache tier error that was downgraded to a miss
    pub fn log_cache_degraded(key: &str, error: &dyn std::error::Error) {
        warn!(
            cache.key = %key,
            cache.error = %error,
            "Cache tier error treated as miss"
        );
    }

    /// Log the cache tiers resolved at startup
    pub fn log_cache_tiers(durable_available: bool, read_order: ReadOrder, ttl_ms: u64) {
        info!(
            cache.durable_available = %durable_available,
            cache.read_order = ?read_order,
            cache.ttl_ms = %ttl_ms,
            "Cache tiers resolved"
        );
    }

    /// Log the single reduced-request retry after an enriched request was rejected
    pub fn log_upstream_retry(key: &str, failure: &RetrievalFailure) {
        info!(
            recipe.key = %key,
            failure.kind = %failure.kind,
            failure.upstream_status = ?failure.upstream_status,
            "Enriched request rejected, retrying reduced"
        );
    }
}
