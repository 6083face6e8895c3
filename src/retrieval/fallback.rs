// ABOUTME: Bundled sample recipes served as the synthetic fallback
// ABOUTME: Embedded at compile time so the fallback never depends on I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use recipe_relay_core::models::{RecipeId, SearchQuery};
use serde_json::{json, Value};

const BUNDLED_SAMPLES: &str = include_str!("../../assets/sample_recipes.json");

/// Static sample dataset
#[derive(Debug, Clone)]
pub struct SyntheticSamples {
    recipes: Vec<Value>,
}

impl SyntheticSamples {
    /// Samples shipped with the crate
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset is not a JSON array
    pub fn bundled() -> serde_json::Result<Self> {
        Self::from_json(BUNDLED_SAMPLES)
    }

    /// Samples parsed from a JSON array of recipe documents
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a JSON array
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        Ok(Self {
            recipes: serde_json::from_str(text)?,
        })
    }

    /// Whether the dataset is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Sample recipe with the requested id, else the first sample
    #[must_use]
    pub fn recipe(&self, id: &RecipeId) -> Option<Value> {
        self.recipes
            .iter()
            .find(|recipe| id_matches(recipe, id))
            .or_else(|| self.recipes.first())
            .cloned()
    }

    /// Search response shaped like the upstream `complexSearch` envelope
    #[must_use]
    pub fn search_results(&self, query: &SearchQuery) -> Value {
        let limit = query
            .number
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(self.recipes.len());
        let results: Vec<&Value> = self.recipes.iter().take(limit).collect();
        json!({
            "results": results,
            "offset": 0,
            "number": results.len(),
            "totalResults": self.recipes.len(),
        })
    }
}

fn id_matches(recipe: &Value, id: &RecipeId) -> bool {
    match recipe.get("id") {
        Some(Value::Number(n)) => n.to_string() == id.as_str(),
        Some(Value::String(s)) => s == id.as_str(),
        _ => false,
    }
}
