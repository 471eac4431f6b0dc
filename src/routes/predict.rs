// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image upload + classification route. Login is optional; logged-in callers
//! get the prediction recorded in their history.

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    routing::post,
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::MaybeUser;
use crate::models::{FoodInfo, Lang};
use crate::AppState;

/// Predict routes. Identity and body-limit layers are applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/predict", post(predict))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PredictResponse {
    pub success: bool,
    pub food_name: String,
    /// Percentage, 0-100
    pub confidence: f64,
    pub food_info: FoodInfo,
    /// Next three most likely classes (catalog keys, not localized)
    pub related: Vec<String>,
}

/// Multipart fields: `image` (file) and optional `lang` (default `VN`).
async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>> {
    let pipeline = state.pipeline.as_ref().ok_or(AppError::ModelUnavailable)?;
    let mut multipart = multipart?;

    let mut image: Option<Vec<u8>> = None;
    let mut lang = Lang::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("image") => image = Some(field.bytes().await?.to_vec()),
            Some("lang") => lang = Lang::from_code(field.text().await?.trim()),
            _ => {}
        }
    }

    let image = image
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::BadRequest("No image provided".to_string()))?;

    let username = user.as_ref().map(|u| u.username.as_str());
    let outcome = pipeline
        .predict(&state.catalog, &state.history, image, lang, username)
        .await?;

    Ok(Json(PredictResponse {
        success: true,
        food_name: outcome.classification.food_name,
        confidence: outcome.classification.confidence,
        food_info: outcome.food_info,
        related: outcome.classification.related,
    }))
}
