// ABOUTME: Shared HTTP client with connection pooling for upstream and durable cache calls
// ABOUTME: Timeouts are fixed once at startup; later initialization attempts are ignored
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use recipe_relay_core::constants::service_names::RECIPE_RELAY;
use recipe_relay_core::constants::upstream::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use reqwest::{Client, ClientBuilder};
use std::sync::OnceLock;
use std::time::Duration;

/// Per-call timeouts applied to every outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    /// Whole-request deadline
    pub request: Duration,
    /// TCP/TLS connect deadline
    pub connect: Duration,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

static CLIENT_TIMEOUTS: OnceLock<ClientTimeouts> = OnceLock::new();

static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Fix the shared client's timeouts
///
/// Call once at startup before the first request. Without it the upstream
/// defaults apply (5s request, 3s connect).
pub fn initialize_shared_client(timeout_secs: u64, connect_timeout_secs: u64) {
    let _ = CLIENT_TIMEOUTS.set(ClientTimeouts {
        request: Duration::from_secs(timeout_secs),
        connect: Duration::from_secs(connect_timeout_secs),
    });
}

/// Build a standalone client, used when a caller needs different timeouts
#[must_use]
pub fn build_client(timeouts: ClientTimeouts) -> Client {
    ClientBuilder::new()
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connect)
        .user_agent(concat!("recipe-relay/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(service = RECIPE_RELAY, "HTTP client builder failed, using defaults: {error}");
            Client::new()
        })
}

/// Get the shared pooled client
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| build_client(CLIENT_TIMEOUTS.get().copied().unwrap_or_default()))
}
