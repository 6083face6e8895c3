// ABOUTME: Transport-level errors raised while talking to the upstream recipe API
// ABOUTME: Rendered without request URLs so the credential never reaches logs or callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Upstream transport failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// The call exceeded its deadline
    #[error("{service} request timed out")]
    Timeout {
        /// Upstream service name
        service: &'static str,
    },

    /// Connection, TLS, or protocol failure
    #[error("{service} network error: {detail}")]
    Network {
        /// Upstream service name
        service: &'static str,
        /// Error text, URL stripped
        detail: String,
    },

    /// Circuit breaker is open; no request was sent
    #[error("{service} temporarily unavailable, retry after {retry_after_secs}s")]
    CircuitOpen {
        /// Upstream service name
        service: &'static str,
        /// Seconds until a probe request is allowed
        retry_after_secs: u64,
    },
}

impl UpstreamError {
    /// Convert a reqwest error, dropping the URL (it carries the credential)
    #[must_use]
    pub fn from_reqwest(service: &'static str, error: reqwest::Error) -> Self {
        let error = error.without_url();
        if error.is_timeout() {
            Self::Timeout { service }
        } else {
            Self::Network {
                service,
                detail: error.to_string(),
            }
        }
    }

    /// Whether this failure should count against the circuit breaker
    #[must_use]
    pub const fn trips_circuit(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network { .. })
    }
}
