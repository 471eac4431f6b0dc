// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Image classification pipeline.
//!
//! decode -> RGB -> resize -> normalize -> inference -> top-k -> metadata
//! lookup -> best-effort history write.
//!
//! The class list is fixed when the pipeline is built and is never re-sorted:
//! index `i` of the model output is the probability of `class_names[i]`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, RgbImage};
use std::path::Path;
use std::sync::Arc;

use crate::models::{FoodInfo, Lang};
use crate::services::catalog::Catalog;
use crate::services::classifier::{Classifier, ClassifierError, ImageTensor};
use crate::services::history::HistoryStore;

/// Number of classes reported per prediction (primary + related).
pub const TOP_K: usize = 4;

/// Errors from the classification pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid image: {0}")]
    Decode(String),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Model returned {actual} scores for {expected} classes")]
    ClassCountMismatch { expected: usize, actual: usize },

    #[error("Food information not found")]
    UnknownFood(String),

    #[error("Image task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Decode arbitrary image bytes into 8-bit RGB.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| PipelineError::Decode(e.to_string()))
}

/// Resize to `size x size` and apply InceptionV3 scaling (`x / 127.5 - 1`).
pub fn preprocess(rgb: &RgbImage, size: u32) -> ImageTensor {
    let resized = image::imageops::resize(rgb, size, size, FilterType::CatmullRom);
    let data = resized
        .as_raw()
        .iter()
        .map(|&v| f32::from(v) / 127.5 - 1.0)
        .collect();
    ImageTensor { size, data }
}

/// Lossy JPEG copy of the upload for the history log, base64 encoded.
pub fn encode_snapshot(rgb: &RgbImage, quality: u8) -> Result<String, image::ImageError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(BASE64.encode(buf))
}

/// Indices of the `k` highest scores, descending. Ties keep class-list order;
/// NaN ranks last.
pub fn rank_top_k(scores: &[f32], k: usize) -> Vec<usize> {
    let key = |i: usize| {
        let score = scores[i];
        if score.is_nan() {
            f32::NEG_INFINITY
        } else {
            score
        }
    };

    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
    indices.truncate(k);
    indices
}

/// Model verdict for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub food_name: String,
    /// Probability of `food_name` x 100
    pub confidence: f64,
    /// Next best classes, descending
    pub related: Vec<String>,
    pub snapshot: Option<String>,
}

/// What happened to the history side effect of a prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryWrite {
    Saved { id: String },
    /// Anonymous caller
    Skipped,
    /// Logged; the prediction still succeeded
    Failed,
}

/// Full result of a prediction request.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub classification: Classification,
    pub food_info: FoodInfo,
    pub history: HistoryWrite,
}

/// Shared, read-only classification pipeline.
#[derive(Clone)]
pub struct ImagePipeline {
    classifier: Arc<dyn Classifier>,
    class_names: Arc<[String]>,
    image_size: u32,
    snapshot_quality: u8,
}

impl ImagePipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        class_names: Vec<String>,
        image_size: u32,
        snapshot_quality: u8,
    ) -> Self {
        Self {
            classifier,
            class_names: class_names.into(),
            image_size,
            snapshot_quality,
        }
    }

    /// Read a label file: one class name per line, blank lines ignored.
    pub fn load_labels<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<String>> {
        Ok(std::fs::read_to_string(path)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Decode, score and rank one image. The snapshot is only produced when
    /// `want_snapshot` is set.
    pub async fn classify(
        &self,
        bytes: Vec<u8>,
        want_snapshot: bool,
    ) -> Result<Classification, PipelineError> {
        let size = self.image_size;
        let quality = self.snapshot_quality;

        let (tensor, snapshot) = tokio::task::spawn_blocking(move || {
            let rgb = decode(&bytes)?;
            let tensor = preprocess(&rgb, size);
            let snapshot = if want_snapshot {
                encode_snapshot(&rgb, quality)
                    .map_err(|e| tracing::warn!(error = %e, "Snapshot encoding failed"))
                    .ok()
            } else {
                None
            };
            Ok::<_, PipelineError>((tensor, snapshot))
        })
        .await??;

        let scores = self.classifier.predict(&tensor).await?;
        if scores.len() != self.class_names.len() {
            return Err(PipelineError::ClassCountMismatch {
                expected: self.class_names.len(),
                actual: scores.len(),
            });
        }

        let top = rank_top_k(&scores, TOP_K);
        let Some((&best, rest)) = top.split_first() else {
            return Err(PipelineError::ClassCountMismatch {
                expected: self.class_names.len(),
                actual: 0,
            });
        };

        Ok(Classification {
            food_name: self.class_names[best].clone(),
            confidence: f64::from(scores[best]) * 100.0,
            related: rest.iter().map(|&i| self.class_names[i].clone()).collect(),
            snapshot,
        })
    }

    /// Classify, attach localized metadata, and record history for
    /// authenticated callers.
    pub async fn predict(
        &self,
        catalog: &Catalog,
        history: &HistoryStore,
        bytes: Vec<u8>,
        lang: Lang,
        username: Option<&str>,
    ) -> Result<PredictionOutcome, PipelineError> {
        let classification = self.classify(bytes, username.is_some()).await?;

        let food_info = catalog
            .info(&classification.food_name, lang)
            .ok_or_else(|| PipelineError::UnknownFood(classification.food_name.clone()))?;

        let history = match username {
            Some(username) => save_history(history, username, &classification).await,
            None => HistoryWrite::Skipped,
        };

        tracing::info!(
            food_name = %classification.food_name,
            confidence = classification.confidence,
            history = ?history,
            "Prediction complete"
        );

        Ok(PredictionOutcome {
            classification,
            food_info,
            history,
        })
    }
}

/// Append a history record; failures are logged and swallowed.
async fn save_history(
    history: &HistoryStore,
    username: &str,
    classification: &Classification,
) -> HistoryWrite {
    match history
        .append(
            username,
            &classification.food_name,
            classification.confidence,
            classification.snapshot.clone(),
        )
        .await
    {
        Ok(record) => HistoryWrite::Saved { id: record.id },
        Err(e) => {
            tracing::error!(username, error = %e, "Failed to save prediction history");
            HistoryWrite::Failed
        }
    }
}
