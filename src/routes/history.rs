// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prediction history routes (require authentication).

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::HistoryRecord;
use crate::AppState;

/// History routes. The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/history", get(get_history).delete(delete_history))
        .route("/api/history/{id}", delete(delete_history_item))
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<HistoryRecord>,
    pub username: String,
}

/// Caller's most recent predictions, newest first.
async fn get_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    params: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>> {
    let Query(params) = params?;

    let history = state.history.list(&user.username, params.limit).await;
    tracing::debug!(
        username = %user.username,
        limit = params.limit,
        returned = history.len(),
        "Fetched history"
    );

    Ok(Json(HistoryResponse {
        success: true,
        history,
        username: user.username,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    pub deleted_by: String,
}

/// Clear the caller's whole history. Clearing an absent log still succeeds.
async fn delete_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<DeleteResponse> {
    let cleared = state.history.delete_all(&user.username).await;
    tracing::info!(username = %user.username, cleared, "History delete requested");

    Json(DeleteResponse {
        success: true,
        message: "History deleted".to_string(),
        deleted_by: user.username,
    })
}

/// Remove one record by id.
async fn delete_history_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.history.delete_one(&user.username, &id).await? {
        return Err(AppError::NotFound("Item not found".to_string()));
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: "History item deleted".to_string(),
        deleted_by: user.username,
    }))
}
