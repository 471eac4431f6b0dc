// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Model inference boundary.
//!
//! The trained network is opaque to this crate: it takes a normalized
//! `size x size x 3` tensor and returns one probability per class, in the
//! order of the class list it was trained with.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Normalized RGB input tensor, row-major HWC layout.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    pub size: u32,
    pub data: Vec<f32>,
}

impl ImageTensor {
    /// Nest the flat buffer as `[rows][cols][channels]`.
    pub fn to_nested(&self) -> Vec<Vec<[f32; 3]>> {
        self.data
            .chunks_exact(self.size as usize * 3)
            .map(|row| {
                row.chunks_exact(3)
                    .map(|px| [px[0], px[1], px[2]])
                    .collect()
            })
            .collect()
    }
}

/// Scores an image tensor. Implementations must be safe to call from many
/// requests at once.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ClassifierError>;
}

/// Errors from the inference backend.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Model server request failed: {0}")]
    Request(String),

    #[error("Model server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed model response: {0}")]
    Malformed(String),
}

/// TensorFlow-Serving REST client (`POST /v1/models/{name}:predict`).
#[derive(Clone)]
pub struct RemoteClassifier {
    http: reqwest::Client,
    predict_url: String,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Vec<Vec<[f32; 3]>>>,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

impl RemoteClassifier {
    pub fn new(base_url: &str, model_name: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            predict_url: format!(
                "{}/v1/models/{}:predict",
                base_url.trim_end_matches('/'),
                model_name
            ),
        }
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
        let body = PredictRequest {
            instances: vec![input.to_nested()],
        };

        let response = self
            .http
            .post(&self.predict_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status { status, body });
        }

        let parsed: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| ClassifierError::Malformed("empty predictions".to_string()))
    }
}
