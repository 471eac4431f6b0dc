// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Username/password records persisted in a single shared file.

use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::db::{read_json, write_json, StoreError};
use crate::models::User;
use crate::services::password::{self, PasswordError};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyExists,
}

/// Errors from credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Credential file (`users.json`) with serialized read-modify-write.
pub struct CredentialStore {
    path: PathBuf,
    bcrypt_cost: u32,
    /// Held across every mutation so concurrent registrations cannot drop
    /// each other's writes.
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>, bcrypt_cost: u32) -> Self {
        Self {
            path: path.into(),
            bcrypt_cost,
            write_lock: Mutex::new(()),
        }
    }

    /// Load all users. A missing file is an empty collection; a corrupt one
    /// is an error, since rewriting it would wipe every account.
    async fn load(&self) -> Result<Vec<User>, CredentialError> {
        Ok(read_json(&self.path).await?.unwrap_or_default())
    }

    /// Look up a user by exact username.
    pub async fn find(&self, username: &str) -> Result<Option<User>, CredentialError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|u| u.username == username))
    }

    pub async fn exists(&self, username: &str) -> Result<bool, CredentialError> {
        Ok(self.find(username).await?.is_some())
    }

    /// Create a user. Callers validate that both fields are non-empty.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Registration, CredentialError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load().await?;
        if users.iter().any(|u| u.username == username) {
            return Ok(Registration::AlreadyExists);
        }

        let password_hash = password::hash_password(password, self.bcrypt_cost).await?;
        users.push(User {
            username: username.to_string(),
            password_hash,
        });
        write_json(&self.path, &users).await?;

        tracing::info!(username, total_users = users.len(), "User registered");
        Ok(Registration::Created)
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, CredentialError> {
        let Some(user) = self.find(username).await? else {
            return Ok(false);
        };
        Ok(password::verify_password(password, &user.password_hash).await?)
    }
}
