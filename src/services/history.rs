// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user prediction history, one JSON file per user.
//!
//! Each file is rewritten whole on every mutation, so all read-modify-write
//! cycles for a given user run under that user's lock. Different users never
//! contend.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::{read_json, write_json, StoreError};
use crate::models::HistoryRecord;
use crate::time_utils::format_local_iso8601;

/// Per-user lock table, keyed by history file key.
pub type HistoryLocks = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// Errors from history operations that callers must see.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// File-per-user history log.
#[derive(Clone)]
pub struct HistoryStore {
    dir: PathBuf,
    locks: HistoryLocks,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Arc::new(DashMap::new()),
        }
    }

    /// File key for a username: hex SHA-256, so keys are a fixed 64 chars
    /// whatever the name's length, filesystem-safe, and case-preserving
    /// ("alice" and "Alice" never share a log).
    fn file_key(username: &str) -> String {
        hex::encode(Sha256::digest(username.as_bytes()))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Read a log, treating absent or corrupt data as empty.
    async fn load(path: &Path, username: &str) -> Vec<HistoryRecord> {
        match read_json(path).await {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(username, error = %e, "Unreadable history, treating as empty");
                Vec::new()
            }
        }
    }

    /// Append a new record to the user's log and return it.
    pub async fn append(
        &self,
        username: &str,
        food_name: &str,
        confidence: f64,
        image_base64: Option<String>,
    ) -> Result<HistoryRecord, HistoryError> {
        let record = HistoryRecord {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: format_local_iso8601(chrono::Local::now()),
            food_name: food_name.to_string(),
            confidence,
            image_base64,
        };

        let key = Self::file_key(username);
        let path = self.path_for(&key);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let mut records = Self::load(&path, username).await;
        records.push(record.clone());
        write_json(&path, &records).await?;

        tracing::info!(username, food_name, "History saved");
        Ok(record)
    }

    /// Up to `limit` most recent records, newest first.
    pub async fn list(&self, username: &str, limit: usize) -> Vec<HistoryRecord> {
        let key = Self::file_key(username);
        let path = self.path_for(&key);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        Self::load(&path, username)
            .await
            .into_iter()
            .rev()
            .take(limit)
            .collect()
    }

    /// Remove the record with `id`. Returns false if no such record exists.
    pub async fn delete_one(&self, username: &str, id: &str) -> Result<bool, HistoryError> {
        let key = Self::file_key(username);
        let path = self.path_for(&key);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let mut records = Self::load(&path, username).await;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            return Ok(false);
        }

        write_json(&path, &records).await?;
        tracing::info!(username, id, "Deleted history item");
        Ok(true)
    }

    /// Empty the user's log. Returns false when there was no log to clear or
    /// the rewrite failed (logged).
    pub async fn delete_all(&self, username: &str) -> bool {
        let key = Self::file_key(username);
        let path = self.path_for(&key);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                tracing::error!(username, error = %e, "Failed to check history log");
                return false;
            }
        }

        match write_json(&path, &Vec::<HistoryRecord>::new()).await {
            Ok(()) => {
                tracing::info!(username, "Cleared all history");
                true
            }
            Err(e) => {
                tracing::error!(username, error = %e, "Failed to clear history");
                false
            }
        }
    }
}
