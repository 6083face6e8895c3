// ABOUTME: Retrieval domain models shared by the orchestrator, upstream client, and entry points
// ABOUTME: Re-exports RecipeId, RetrievalRequest, SearchQuery, HitSource, and RetrievalOutcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `RecipeId`: validated upstream recipe identifier
//! - `RetrievalRequest`: one "fetch recipe information for id X" request
//! - `SearchQuery`: normalized recipe search parameters
//! - `RetrievalOutcome`: either a payload with its `HitSource` or a typed failure

mod outcome;
mod recipe;
mod search;

pub use outcome::{HitSource, RetrievalOutcome};
pub use recipe::{RecipeId, RetrievalRequest};
pub use search::SearchQuery;
