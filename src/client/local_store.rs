// ABOUTME: Client-local persistence tier keeping one JSON file per recipe id
// ABOUTME: Consulted as the offline fallback and written on every successful lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Local recipe store
//!
//! Files are named `recipe_cache_<id>.json` and hold `{timestamp, payload}`.
//! There is no eviction: the directory grows with every distinct id looked up.

use crate::cache::{now_millis, CacheError};
use crate::retrieval::OfflineStore;
use async_trait::async_trait;
use recipe_relay_core::constants::cache::LOCAL_STORE_FILE_PREFIX;
use recipe_relay_core::models::RecipeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// On-disk record
#[derive(Debug, Serialize, Deserialize)]
struct LocalRecord {
    timestamp: u64,
    payload: Value,
}

/// Per-id file store under one directory
#[derive(Debug, Clone)]
pub struct LocalRecipeStore {
    dir: PathBuf,
}

impl LocalRecipeStore {
    /// Store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the copy for `id`
    #[must_use]
    pub fn path_for(&self, id: &RecipeId) -> PathBuf {
        self.dir
            .join(format!("{LOCAL_STORE_FILE_PREFIX}{}.json", id.as_str()))
    }
}

fn io_error(error: &std::io::Error) -> CacheError {
    CacheError::Io(error.to_string())
}

#[async_trait]
impl OfflineStore for LocalRecipeStore {
    async fn load(&self, id: &RecipeId) -> Result<Option<Value>, CacheError> {
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(io_error(&error)),
        };
        let record: LocalRecord =
            serde_json::from_str(&text).map_err(|e| CacheError::Malformed {
                key: id.info_cache_key(),
                reason: e.to_string(),
            })?;
        Ok(Some(record.payload))
    }

    async fn save(&self, id: &RecipeId, payload: &Value) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&e))?;
        let record = LocalRecord {
            timestamp: now_millis(),
            payload: payload.clone(),
        };
        let text =
            serde_json::to_vec(&record).map_err(|e| CacheError::Serialization(e.to_string()))?;

        // Write then rename so readers never observe a partial file
        let path = self.path_for(id);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, text).await.map_err(|e| io_error(&e))?;
        fs::rename(&staging, &path)
            .await
            .map_err(|e| io_error(&e))?;
        debug!(recipe.id = %id, path = %path.display(), "Saved local recipe copy");
        Ok(())
    }
}
