// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! VNFood API: classify Vietnamese food photos and browse the dish catalog
//!
//! This crate provides the backend API: token-based login, per-user
//! prediction history, the image classification pipeline and catalog search.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{Catalog, CredentialStore, HistoryStore, ImagePipeline, TokenService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub tokens: TokenService,
    pub credentials: CredentialStore,
    pub history: HistoryStore,
    pub catalog: Catalog,
    /// `None` when no model is configured; predictions then fail with 500.
    pub pipeline: Option<ImagePipeline>,
}

impl AppState {
    /// Wire up the file-backed stores and token service from `config`.
    pub fn new(config: Config, catalog: Catalog, pipeline: Option<ImagePipeline>) -> Self {
        Self {
            tokens: TokenService::from_config(&config),
            credentials: CredentialStore::new(config.users_path(), config.bcrypt_cost),
            history: HistoryStore::new(config.history_dir()),
            catalog,
            pipeline,
            config,
        }
    }
}
