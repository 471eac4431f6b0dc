// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login and token refresh routes.

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::services::Registration;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
}

/// Username/password body for register and login.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields, or 400 if either is missing or empty.
    fn required(self) -> Result<(String, String)> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(AppError::BadRequest(
                "Username and password required".to_string(),
            )),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Create a new account.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let Json(payload) = payload?;
    let (username, password) = payload.required()?;

    match state.credentials.register(&username, &password).await? {
        Registration::Created => Ok(Json(MessageResponse {
            success: true,
            message: "User created successfully".to_string(),
        })),
        Registration::AlreadyExists => {
            tracing::info!(username = %username, "Registration rejected: username taken");
            Err(AppError::BadRequest("Username already exists".to_string()))
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub username: String,
}

/// Exchange username/password for an access + refresh token pair.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let (username, password) = payload.required()?;

    if !state.credentials.authenticate(&username, &password).await? {
        tracing::info!(username = %username, "Login failed");
        return Err(AppError::InvalidCredentials);
    }

    let access_token = state.tokens.issue_access(&username)?;
    let refresh_token = state.tokens.issue_refresh(&username)?;

    tracing::info!(username = %username, "Login successful");

    Ok(Json(LoginResponse {
        success: true,
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.access_ttl_secs(),
        username,
    }))
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RefreshResponse {
    pub success: bool,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Mint a new access token. The refresh token is not rotated.
async fn refresh(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>> {
    let Json(payload) = payload?;
    let refresh_token = payload
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh token required".to_string()))?;

    let (username, access_token) = state.tokens.refresh(&refresh_token)?;
    tracing::debug!(username = %username, "Access token refreshed");

    Ok(Json(RefreshResponse {
        success: true,
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.access_ttl_secs(),
    }))
}
