// ABOUTME: Retrieval failure taxonomy returned by the orchestrator and entry points
// ABOUTME: Maps failure kinds onto error codes and default HTTP statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Kinds of terminal retrieval failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Caller-side malformed input, never retried
    InvalidRequest,
    /// Required credential or dependency absent
    MisconfiguredDependency,
    /// Upstream confirmed the resource does not exist
    NotFound,
    /// Upstream quota or rate limit exhausted
    QuotaExhausted,
    /// Upstream rejected the credential
    Unauthorized,
    /// Network error, unexpected status, or unparseable body
    TransientUpstreamFailure,
    /// Upstream failed and neither stale nor synthetic data exists
    NoFallbackAvailable,
}

impl FailureKind {
    /// Error code used at the HTTP boundary
    #[must_use]
    pub const fn error_code(self) -> ErrorCode {
        match self {
            Self::InvalidRequest => ErrorCode::InvalidInput,
            Self::MisconfiguredDependency => ErrorCode::ConfigMissing,
            Self::NotFound => ErrorCode::ResourceNotFound,
            Self::QuotaExhausted => ErrorCode::QuotaExceeded,
            Self::Unauthorized => ErrorCode::ExternalAuthFailed,
            Self::TransientUpstreamFailure => ErrorCode::ExternalServiceUnavailable,
            Self::NoFallbackAvailable => ErrorCode::ExternalServiceError,
        }
    }

    /// Status used when no upstream status is available to mirror
    #[must_use]
    pub const fn default_http_status(self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::NotFound => 404,
            Self::MisconfiguredDependency => 500,
            Self::QuotaExhausted => 429,
            Self::Unauthorized | Self::TransientUpstreamFailure | Self::NoFallbackAvailable => 502,
        }
    }

    /// Stable lowercase name for logs and headers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::MisconfiguredDependency => "misconfigured_dependency",
            Self::NotFound => "not_found",
            Self::QuotaExhausted => "quota_exhausted",
            Self::Unauthorized => "unauthorized",
            Self::TransientUpstreamFailure => "transient_upstream_failure",
            Self::NoFallbackAvailable => "no_fallback_available",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, credential-free retrieval failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {detail}")]
#[serde(rename_all = "camelCase")]
pub struct RetrievalFailure {
    /// Failure kind
    pub kind: FailureKind,
    /// Human-readable reason
    pub detail: String,
    /// Status returned by upstream, when the failure originated there
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl RetrievalFailure {
    /// Create a failure without an upstream status
    #[must_use]
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            upstream_status: None,
        }
    }

    /// Attach the upstream status that caused this failure
    #[must_use]
    pub const fn with_upstream_status(mut self, status: Option<u16>) -> Self {
        self.upstream_status = status;
        self
    }

    /// Invalid caller input
    #[must_use]
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidRequest, detail)
    }

    /// Required credential or dependency absent
    #[must_use]
    pub fn misconfigured(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::MisconfiguredDependency, detail)
    }

    /// Terminal failure after the fallback path found nothing; keeps the cause's status
    #[must_use]
    pub fn no_fallback(cause: &Self) -> Self {
        Self {
            kind: FailureKind::NoFallbackAvailable,
            detail: format!("no fallback available after {}: {}", cause.kind, cause.detail),
            upstream_status: cause.upstream_status,
        }
    }

    /// HTTP status for this failure, mirroring upstream when possible
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.upstream_status
            .filter(|status| (400..600).contains(status))
            .unwrap_or_else(|| self.kind.default_http_status())
    }
}

impl From<RetrievalFailure> for AppError {
    fn from(failure: RetrievalFailure) -> Self {
        let status = failure.http_status();
        Self::new(failure.kind.error_code(), failure.detail).with_status(status)
    }
}
