// ABOUTME: Circuit breaker for upstream recipe API calls
// ABOUTME: Transport failures and 5xx responses trip it; 4xx responses never do
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::UpstreamError;
use crate::source::RawResponse;
use recipe_relay_core::constants::upstream::{
    CIRCUIT_FAILURE_THRESHOLD, CIRCUIT_RECOVERY_TIMEOUT_SECS, CIRCUIT_SUCCESS_THRESHOLD,
};
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Circuit breaker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests pass through; failures are counted
    Closed,
    /// Requests fail immediately
    Open,
    /// One probe request is in flight
    HalfOpen,
}

impl CircuitState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Closed,
            1 => Self::Open,
            _ => Self::HalfOpen,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Open => 1,
            Self::HalfOpen => 2,
        }
    }
}

/// Thresholds for opening and closing the circuit
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening
    pub failure_threshold: u32,
    /// Time spent open before a probe is allowed
    pub recovery_timeout: Duration,
    /// Successful probes needed to close again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: CIRCUIT_FAILURE_THRESHOLD,
            recovery_timeout: Duration::from_secs(CIRCUIT_RECOVERY_TIMEOUT_SECS),
            success_threshold: CIRCUIT_SUCCESS_THRESHOLD,
        }
    }
}

/// Lock-free circuit breaker shared by concurrent requests
pub struct CircuitBreaker {
    service: &'static str,
    state: AtomicU8,
    failure_count: AtomicU32,
    success_count: AtomicU32,
    /// Millis since `started` at which the circuit last opened
    opened_at_ms: AtomicU64,
    config: CircuitBreakerConfig,
    started: Instant,
}

impl CircuitBreaker {
    /// Breaker with the default thresholds
    #[must_use]
    pub fn new(service: &'static str) -> Self {
        Self::with_config(service, CircuitBreakerConfig::default())
    }

    /// Breaker with custom thresholds
    #[must_use]
    pub fn with_config(service: &'static str, config: CircuitBreakerConfig) -> Self {
        Self {
            service,
            state: AtomicU8::new(CircuitState::Closed.to_u8()),
            failure_count: AtomicU32::new(0),
            success_count: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            config,
            started: Instant::now(),
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Whether a request may be sent now
    ///
    /// An open circuit whose recovery timeout elapsed moves to half-open and
    /// admits exactly one caller.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => false,
            CircuitState::Open => {
                if self.millis_since_open() < self.recovery_ms() {
                    return false;
                }
                let admitted = self
                    .state
                    .compare_exchange(
                        CircuitState::Open.to_u8(),
                        CircuitState::HalfOpen.to_u8(),
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok();
                if admitted {
                    info!(service = self.service, "Circuit half-open, sending probe request");
                }
                admitted
            }
        }
    }

    /// Record a healthy response
    pub fn record_success(&self) {
        match self.state() {
            CircuitState::Closed => self.failure_count.store(0, Ordering::SeqCst),
            CircuitState::HalfOpen => {
                let successes = self.success_count.fetch_add(1, Ordering::SeqCst) + 1;
                if successes >= self.config.success_threshold {
                    self.close();
                    info!(service = self.service, "Circuit closed, upstream recovered");
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Record a transport failure or server error
    pub fn record_failure(&self) {
        match self.state() {
            CircuitState::Closed => {
                let failures = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
                if failures >= self.config.failure_threshold {
                    self.open();
                    warn!(
                        service = self.service,
                        failures,
                        recovery_timeout_secs = self.config.recovery_timeout.as_secs(),
                        "Circuit opened, upstream failing"
                    );
                }
            }
            CircuitState::HalfOpen => {
                self.open();
                warn!(service = self.service, "Circuit re-opened, probe failed");
            }
            CircuitState::Open => self.opened_at_ms.store(self.elapsed_ms(), Ordering::SeqCst),
        }
    }

    /// Run one upstream call under the breaker
    ///
    /// # Errors
    ///
    /// Returns `UpstreamError::CircuitOpen` without running `operation` while
    /// the circuit is open; otherwise whatever `operation` returns.
    pub async fn call<F>(&self, operation: F) -> Result<RawResponse, UpstreamError>
    where
        F: Future<Output = Result<RawResponse, UpstreamError>>,
    {
        if !self.is_allowed() {
            return Err(UpstreamError::CircuitOpen {
                service: self.service,
                retry_after_secs: self.secs_until_probe(),
            });
        }

        let result = operation.await;
        match &result {
            Ok(response) if response.is_server_error() => self.record_failure(),
            Ok(_) => self.record_success(),
            Err(error) if error.trips_circuit() => self.record_failure(),
            Err(_) => {}
        }
        result
    }

    /// Force the circuit closed
    pub fn reset(&self) {
        self.close();
    }

    fn open(&self) {
        self.state.store(CircuitState::Open.to_u8(), Ordering::SeqCst);
        self.opened_at_ms.store(self.elapsed_ms(), Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
    }

    fn close(&self) {
        self.state.store(CircuitState::Closed.to_u8(), Ordering::SeqCst);
        self.failure_count.store(0, Ordering::SeqCst);
        self.success_count.store(0, Ordering::SeqCst);
    }

    fn secs_until_probe(&self) -> u64 {
        self.recovery_ms()
            .saturating_sub(self.millis_since_open())
            .div_ceil(1000)
    }

    fn millis_since_open(&self) -> u64 {
        self.elapsed_ms()
            .saturating_sub(self.opened_at_ms.load(Ordering::SeqCst))
    }

    fn recovery_ms(&self) -> u64 {
        u64::try_from(self.config.recovery_timeout.as_millis()).unwrap_or(u64::MAX)
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> RawResponse {
        RawResponse {
            status,
            body: "{}".to_owned(),
        }
    }

    fn strict() -> CircuitBreaker {
        CircuitBreaker::with_config(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 2,
                recovery_timeout: Duration::from_millis(20),
                success_threshold: 1,
            },
        )
    }

    #[tokio::test]
    async fn test_server_errors_open_the_circuit() {
        let breaker = strict();
        breaker.call(async { Ok(response(503)) }).await.unwrap();
        breaker.call(async { Ok(response(500)) }).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Open);

        let rejected = breaker.call(async { Ok(response(200)) }).await;
        assert!(matches!(rejected, Err(UpstreamError::CircuitOpen { .. })));
    }

    #[tokio::test]
    async fn test_client_errors_never_trip() {
        let breaker = strict();
        for status in [401, 402, 404, 429, 401] {
            breaker.call(async move { Ok(response(status)) }).await.unwrap();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_probe_success_closes_circuit() {
        let breaker = strict();
        breaker.record_failure();
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(30)).await;
        breaker.call(async { Ok(response(200)) }).await.unwrap();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_transport_failures_count() {
        let breaker = strict();
        for _ in 0..2 {
            let _ = breaker
                .call(async {
                    Err(UpstreamError::Timeout {
                        service: "test",
                    })
                })
                .await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
