// ABOUTME: Classification of upstream responses into success, retry, fallback, or terminal signals
// ABOUTME: Encodes the fault contract of the upstream recipe API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::UpstreamError;
use crate::source::RawResponse;
use recipe_relay_core::errors::{FailureKind, RetrievalFailure};
use serde_json::Value;

/// Which request produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Enriched information request, always the first attempt
    Full,
    /// Reduced information request, issued at most once after `Full`
    Reduced,
    /// Search request, never retried
    Search,
}

impl Attempt {
    /// Name used in logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Reduced => "reduced",
            Self::Search => "search",
        }
    }
}

/// What the orchestrator should do with a response
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// 2xx with a parseable body
    Success(Value),
    /// Auth or quota rejection of the enriched request; retry reduced once
    RetryReduced(RetrievalFailure),
    /// Exhausted, unauthorized, or transient; go to the fallback path
    Fallback(RetrievalFailure),
    /// Upstream confirmed the resource does not exist
    NotFound(RetrievalFailure),
}

impl Classification {
    /// The failure carried by non-success classifications
    #[must_use]
    pub fn into_failure(self) -> Option<RetrievalFailure> {
        match self {
            Self::Success(_) => None,
            Self::RetryReduced(failure) | Self::Fallback(failure) | Self::NotFound(failure) => {
                Some(failure)
            }
        }
    }
}

/// Classify the result of one upstream call
///
/// | status | `Full` | `Reduced` / `Search` |
/// |--------|--------|----------------------|
/// | 2xx, JSON body | success | success |
/// | 2xx, empty or non-JSON | fallback (transient) | fallback (transient) |
/// | 401 | retry reduced | fallback (unauthorized) |
/// | 402 | retry reduced | fallback (quota) |
/// | 429 | fallback (quota) | fallback (quota) |
/// | 404 | not found | not found |
/// | other / transport | fallback (transient) | fallback (transient) |
#[must_use]
pub fn classify(attempt: Attempt, result: Result<RawResponse, UpstreamError>) -> Classification {
    let response = match result {
        Ok(response) => response,
        Err(error) => {
            return Classification::Fallback(RetrievalFailure::new(
                FailureKind::TransientUpstreamFailure,
                error.to_string(),
            ));
        }
    };

    let status = response.status;
    if response.is_success() {
        return parse_body(&response.body).map_or_else(
            || {
                Classification::Fallback(RetrievalFailure::new(
                    FailureKind::TransientUpstreamFailure,
                    format!("upstream returned HTTP {status} with an unreadable body"),
                ))
            },
            Classification::Success,
        );
    }

    let failure = |kind: FailureKind| {
        RetrievalFailure::new(kind, status_reason(status)).with_upstream_status(Some(status))
    };
    match (status, attempt) {
        (404, _) => Classification::NotFound(failure(FailureKind::NotFound)),
        (401, Attempt::Full) => Classification::RetryReduced(failure(FailureKind::Unauthorized)),
        (402, Attempt::Full) => Classification::RetryReduced(failure(FailureKind::QuotaExhausted)),
        (401, _) => Classification::Fallback(failure(FailureKind::Unauthorized)),
        (402 | 429, _) => Classification::Fallback(failure(FailureKind::QuotaExhausted)),
        _ => Classification::Fallback(failure(FailureKind::TransientUpstreamFailure)),
    }
}

fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

// Upstream error bodies are not echoed; they are not guaranteed credential-free.
fn status_reason(status: u16) -> String {
    match status {
        401 => "upstream rejected the API key".to_owned(),
        402 => "upstream API quota reached".to_owned(),
        404 => "recipe not found".to_owned(),
        429 => "upstream rate limit reached".to_owned(),
        other => format!("upstream returned HTTP {other}"),
    }
}
