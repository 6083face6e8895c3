// ABOUTME: Core types and constants for the recipe-relay retrieval service
// ABOUTME: Foundation crate with the error taxonomy, constants, and retrieval models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Relay Core
//!
//! Foundation crate shared by the upstream client and the relay service. It is
//! designed to change infrequently so the workspace benefits from incremental
//! compilation.
//!
//! ## Modules
//!
//! - **errors**: `AppError`/`ErrorCode` for HTTP boundaries, `FailureKind` and
//!   `RetrievalFailure` for the retrieval pipeline
//! - **constants**: cache, upstream, and HTTP constants
//! - **models**: recipe identifiers, retrieval requests, search queries, outcomes

/// Unified error handling with standard error codes and retrieval failure kinds
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Retrieval domain models (`RecipeId`, `RetrievalRequest`, `RetrievalOutcome`)
pub mod models;
