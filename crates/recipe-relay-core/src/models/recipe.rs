// ABOUTME: Recipe identifier newtype and the per-request retrieval descriptor
// ABOUTME: Identifiers are validated before they reach cache keys or upstream URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::cache::INFO_KEY_PREFIX;
use crate::constants::upstream::MAX_RECIPE_ID_LEN;
use crate::errors::RetrievalFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque recipe identifier accepted from callers
///
/// Only ASCII alphanumerics, `-` and `_` are accepted so the value can be
/// embedded in an upstream path segment and a cache key without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipeId(String);

impl RecipeId {
    /// Validate and wrap a caller-supplied identifier
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRequest` failure for empty, overlong, or
    /// non-alphanumeric identifiers.
    pub fn parse(raw: &str) -> Result<Self, RetrievalFailure> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RetrievalFailure::invalid_request("Missing id"));
        }
        if trimmed.len() > MAX_RECIPE_ID_LEN {
            return Err(RetrievalFailure::invalid_request(format!(
                "id exceeds {MAX_RECIPE_ID_LEN} characters"
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(RetrievalFailure::invalid_request(
                "id may only contain letters, digits, '-' and '_'",
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key for the information lookup of this id
    #[must_use]
    pub fn info_cache_key(&self) -> String {
        format!("{INFO_KEY_PREFIX}{}", self.0)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecipeId {
    type Err = RetrievalFailure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RecipeId {
    type Error = RetrievalFailure;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecipeId> for String {
    fn from(id: RecipeId) -> Self {
        id.0
    }
}

impl From<u64> for RecipeId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single "fetch recipe information for id X" request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalRequest {
    /// Recipe to retrieve
    pub id: RecipeId,
    /// Whether the enriched (nutrition) variant is requested first
    pub wants_enriched_data: bool,
}

impl RetrievalRequest {
    /// Request the enriched variant, degrading to the reduced one when gated
    #[must_use]
    pub const fn new(id: RecipeId) -> Self {
        Self {
            id,
            wants_enriched_data: true,
        }
    }

    /// Request only the reduced variant
    #[must_use]
    pub const fn reduced_only(id: RecipeId) -> Self {
        Self {
            id,
            wants_enriched_data: false,
        }
    }

    /// Cache key shared by both variants
    #[must_use]
    pub fn cache_key(&self) -> String {
        self.id.info_cache_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;

    #[test]
    fn test_parse_accepts_numeric_and_slug_ids() {
        assert_eq!(RecipeId::parse("42").unwrap().as_str(), "42");
        assert_eq!(RecipeId::parse(" 716429 ").unwrap().as_str(), "716429");
        assert!(RecipeId::parse("sample-pasta_1").is_ok());
    }

    #[test]
    fn test_parse_rejects_unsafe_ids() {
        for raw in ["", "   ", "../etc/passwd", "42?apiKey=x", "a b"] {
            let failure = RecipeId::parse(raw).unwrap_err();
            assert_eq!(failure.kind, FailureKind::InvalidRequest, "{raw:?}");
        }
        assert!(RecipeId::parse(&"9".repeat(MAX_RECIPE_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_cache_key_uses_info_namespace() {
        let request = RetrievalRequest::new(RecipeId::from(7));
        assert!(request.wants_enriched_data);
        assert_eq!(request.cache_key(), "info:7");
    }
}
