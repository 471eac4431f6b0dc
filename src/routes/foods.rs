// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public catalog routes: search and detail.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::{FoodInfo, FoodSummary, Lang};
use crate::services::catalog::{Pagination, SearchQuery, ALL_REGIONS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/foods/search", get(search_foods))
        .route("/api/food/{name}", get(get_food))
}

/// Larger page sizes are served as this many per page.
const MAX_PER_PAGE: usize = 100;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    lang: Lang,
    #[serde(default)]
    search: String,
    #[serde(default = "default_region")]
    region: String,
    /// 1-indexed; out-of-range values are clamped, not rejected
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_per_page")]
    per_page: usize,
}

fn default_region() -> String {
    ALL_REGIONS.to_string()
}
fn default_page() -> i64 {
    1
}
fn default_per_page() -> usize {
    12
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SearchResponse {
    pub success: bool,
    pub foods: Vec<FoodSummary>,
    pub pagination: Pagination,
}

/// Filtered, paginated catalog listing.
async fn search_foods(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>> {
    let Query(params) = params?;

    if params.per_page == 0 {
        return Err(AppError::BadRequest(
            "per_page must be a positive integer".to_string(),
        ));
    }

    let result = state.catalog.search(&SearchQuery {
        text: params.search,
        region: params.region,
        lang: params.lang,
        page: params.page,
        per_page: params.per_page.min(MAX_PER_PAGE),
    });

    Ok(Json(SearchResponse {
        success: true,
        foods: result.foods,
        pagination: result.pagination,
    }))
}

#[derive(Deserialize)]
struct DetailParams {
    #[serde(default)]
    lang: Lang,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodResponse {
    pub success: bool,
    pub food: FoodInfo,
}

/// Single food by exact name.
async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    params: std::result::Result<Query<DetailParams>, QueryRejection>,
) -> Result<Json<FoodResponse>> {
    let Query(params) = params?;

    let food = state
        .catalog
        .info(&name, params.lang)
        .ok_or_else(|| AppError::NotFound("Food not found".to_string()))?;

    Ok(Json(FoodResponse {
        success: true,
        food,
    }))
}
