// ABOUTME: Retrieval outcome returned by the orchestrator
// ABOUTME: A payload tagged with the tier that produced it, or a typed failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::RetrievalFailure;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Where a successful payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitSource {
    /// In-process tier, within TTL
    Memory,
    /// Durable shared tier, within TTL
    Durable,
    /// Fresh upstream response
    Upstream,
    /// Stale copy served because upstream failed
    OfflineFallback,
    /// Bundled sample data served because nothing real was obtainable
    SyntheticFallback,
}

impl HitSource {
    /// Stable name used in logs and the `x-recipe-source` header
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Durable => "durable",
            Self::Upstream => "upstream",
            Self::OfflineFallback => "offlineFallback",
            Self::SyntheticFallback => "syntheticFallback",
        }
    }

    /// Parse a header value produced by [`HitSource::as_str`]
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        [
            Self::Memory,
            Self::Durable,
            Self::Upstream,
            Self::OfflineFallback,
            Self::SyntheticFallback,
        ]
        .into_iter()
        .find(|source| source.as_str() == value)
    }

    /// Whether a valid cache entry served this payload
    #[must_use]
    pub const fn is_cache_hit(self) -> bool {
        matches!(self, Self::Memory | Self::Durable)
    }

    /// Whether this payload substitutes for a failed upstream call
    #[must_use]
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::OfflineFallback | Self::SyntheticFallback)
    }
}

impl fmt::Display for HitSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one retrieval
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    /// A usable payload
    Hit {
        /// Recipe document
        payload: Value,
        /// Tier that produced it
        source: HitSource,
    },
    /// A typed, credential-free failure
    Failure(RetrievalFailure),
}

impl RetrievalOutcome {
    /// Successful outcome
    #[must_use]
    pub const fn hit(payload: Value, source: HitSource) -> Self {
        Self::Hit { payload, source }
    }

    /// Source of a hit, `None` for failures
    #[must_use]
    pub const fn source(&self) -> Option<HitSource> {
        match self {
            Self::Hit { source, .. } => Some(*source),
            Self::Failure(_) => None,
        }
    }

    /// Payload of a hit
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::Hit { payload, .. } => Some(payload),
            Self::Failure(_) => None,
        }
    }

    /// Failure details
    #[must_use]
    pub const fn failure(&self) -> Option<&RetrievalFailure> {
        match self {
            Self::Hit { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Convert into a `Result` of payload and source
    ///
    /// # Errors
    ///
    /// Returns the contained failure for `Failure` outcomes.
    pub fn into_result(self) -> Result<(Value, HitSource), RetrievalFailure> {
        match self {
            Self::Hit { payload, source } => Ok((payload, source)),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<RetrievalFailure> for RetrievalOutcome {
    fn from(failure: RetrievalFailure) -> Self {
        Self::Failure(failure)
    }
}
