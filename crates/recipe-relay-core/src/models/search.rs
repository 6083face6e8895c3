// ABOUTME: Recipe search parameters with normalization and canonical cache keys
// ABOUTME: Produces the upstream complexSearch query without the credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::cache::SEARCH_KEY_PREFIX;
use crate::constants::upstream::{DEFAULT_SEARCH_RESULTS, MAX_SEARCH_RESULTS};
use serde::{Deserialize, Serialize};

/// Recipe search parameters as accepted by the search entry point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchQuery {
    /// Free-text query
    pub q: String,
    /// Comma-separated ingredient list
    pub include_ingredients: String,
    /// Diet filter
    pub diet: String,
    /// Comma-separated intolerances
    pub intolerances: String,
    /// Meal type (breakfast, main course, ...)
    #[serde(rename = "type")]
    pub meal_type: String,
    /// Number of results requested
    pub number: Option<u32>,
    /// Maximum preparation time in minutes
    pub max_ready_time: Option<u32>,
}

impl SearchQuery {
    /// Free-text search with default filters
    #[must_use]
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    /// Trimmed copy with the result count defaulted and clamped
    #[must_use]
    pub fn normalized(&self) -> Self {
        let number = self
            .number
            .unwrap_or(DEFAULT_SEARCH_RESULTS)
            .clamp(1, MAX_SEARCH_RESULTS);
        Self {
            q: self.q.trim().to_owned(),
            include_ingredients: normalize_list(&self.include_ingredients),
            diet: self.diet.trim().to_owned(),
            intolerances: normalize_list(&self.intolerances),
            meal_type: self.meal_type.trim().to_owned(),
            number: Some(number),
            max_ready_time: self.max_ready_time.filter(|minutes| *minutes > 0),
        }
    }

    /// Cache key of the normalized query
    ///
    /// Equivalent queries (whitespace, defaulted count) share one key.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let normalized = self.normalized();
        let encoded = serde_json::to_string(&normalized).unwrap_or_else(|_| normalized.q.clone());
        format!("{SEARCH_KEY_PREFIX}{encoded}")
    }

    /// Upstream complexSearch parameters, empty values omitted
    #[must_use]
    pub fn upstream_params(&self) -> Vec<(&'static str, String)> {
        let normalized = self.normalized();
        let mut params = Vec::with_capacity(9);
        for (name, value) in [
            ("query", normalized.q),
            ("includeIngredients", normalized.include_ingredients),
            ("diet", normalized.diet),
            ("intolerances", normalized.intolerances),
            ("type", normalized.meal_type),
        ] {
            if !value.is_empty() {
                params.push((name, value));
            }
        }
        params.push(("addRecipeInformation", "true".to_owned()));
        params.push(("instructionsRequired", "true".to_owned()));
        params.push((
            "number",
            normalized.number.unwrap_or(DEFAULT_SEARCH_RESULTS).to_string(),
        ));
        if let Some(minutes) = normalized.max_ready_time {
            params.push(("maxReadyTime", minutes.to_string()));
        }
        params
    }

    /// Parameters for calling the search entry point of a relay server
    #[must_use]
    pub fn proxy_params(&self) -> Vec<(&'static str, String)> {
        self.upstream_params()
            .into_iter()
            .filter_map(|(name, value)| match name {
                "query" => Some(("q", value)),
                "addRecipeInformation" | "instructionsRequired" => None,
                other => Some((other, value)),
            })
            .collect()
    }
}

fn normalize_list(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
