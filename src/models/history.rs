// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prediction history records.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One prediction in a user's history log.
///
/// Stored at: `history/{hex(username)}.json`, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HistoryRecord {
    /// UUIDv4
    #[serde(rename = "_id")]
    pub id: String,
    /// Local time of the prediction (ISO 8601)
    pub timestamp: String,
    pub food_name: String,
    /// Probability of the primary class, as a percentage
    pub confidence: f64,
    /// Re-encoded JPEG of the uploaded image (base64)
    #[serde(default)]
    pub image_base64: Option<String>,
}
