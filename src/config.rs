// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup. The JWT signing key in particular is
//! never reloaded while the process runs.

use crate::db::paths;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Directory holding `users.json` and the per-user `history/` files
    pub data_dir: PathBuf,
    /// Food metadata dataset (JSON object keyed by food name)
    pub food_database_path: PathBuf,
    /// Optional label file, one class name per line, in model output order.
    /// When unset the catalog key order is used.
    pub class_labels_path: Option<PathBuf>,
    /// Base URL of the TensorFlow-Serving REST endpoint
    pub model_server_url: Option<String>,
    /// Served model name
    pub model_name: String,
    /// Edge length of the square model input
    pub image_size: u32,
    /// JPEG quality for history snapshots
    pub snapshot_quality: u8,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Upload size limit for `/api/predict`
    pub max_upload_bytes: usize,

    // --- Secrets ---
    /// JWT signing key (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));

        Ok(Self {
            port: parse_or("PORT", 5000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            food_database_path: env::var("FOOD_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("foods.json")),
            data_dir,
            class_labels_path: non_empty("CLASS_LABELS_PATH").map(PathBuf::from),
            model_server_url: non_empty("MODEL_SERVER_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| "vnfood".to_string()),
            image_size: parse_or("IMAGE_SIZE", 299),
            snapshot_quality: parse_or("SNAPSHOT_QUALITY", 85),
            access_token_ttl_minutes: parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 15),
            refresh_token_ttl_days: parse_or("REFRESH_TOKEN_EXPIRE_DAYS", 7),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),

            jwt_signing_key: env::var("JWT_SECRET_KEY")
                .map(|v| v.trim().to_string())
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?
                .into_bytes(),
        })
    }

    /// Config for tests: everything lives under `data_dir`, bcrypt is cheap.
    pub fn test_default(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            port: 5000,
            frontend_url: "http://localhost:5173".to_string(),
            food_database_path: data_dir.join("foods.json"),
            data_dir,
            class_labels_path: None,
            model_server_url: None,
            model_name: "vnfood".to_string(),
            image_size: 299,
            snapshot_quality: 85,
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
            bcrypt_cost: 4,
            max_upload_bytes: 10 * 1024 * 1024,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Path of the shared credential file.
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(paths::USERS_FILE)
    }

    /// Directory of per-user history logs.
    pub fn history_dir(&self) -> PathBuf {
        self.data_dir.join(paths::HISTORY_DIR)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
