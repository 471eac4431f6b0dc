// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use vnfood_api::config::Config;
use vnfood_api::routes::create_router;
use vnfood_api::services::{
    Catalog, Classifier, ClassifierError, ImagePipeline, ImageTensor,
};
use vnfood_api::AppState;

/// Five-dish catalog, in the order the fake model scores them.
#[allow(dead_code)]
pub const FOODS_JSON: &str = r#"{
    "Phở": {"region": "north", "name_en": "Pho", "description_vn": "Món nước với bánh phở",
             "description_en": "Rice noodle soup", "ingredients_vn": "Bánh phở, thịt bò",
             "ingredients_en": "Rice noodles, beef", "related": ["Bún chả"]},
    "Bún chả": {"region": "north", "description_vn": "Bún với chả nướng",
                 "ingredients_vn": "Bún, thịt", "related": ["Phở"]},
    "Bánh xèo": {"region": "south", "name_en": "Sizzling pancake", "description_vn": "Bánh chiên giòn",
                  "description_en": "Crispy pancake", "ingredients_vn": "Bột gạo", "related": []},
    "Cao lầu": {"region": "central", "description_vn": "Mì Hội An",
                 "ingredients_vn": "Mì, thịt xá xíu"},
    "Bánh mì": {"region": "nationwide", "name_en": "Banh mi", "description_vn": "Bánh mì kẹp",
                 "description_en": "Stuffed baguette", "ingredients_vn": "Bánh mì, pate"}
}"#;

#[allow(dead_code)]
/// Model stand-in that always returns the same probabilities.
pub struct FixedScores(pub Vec<f32>);

#[async_trait]
impl Classifier for FixedScores {
    async fn predict(&self, _input: &ImageTensor) -> Result<Vec<f32>, ClassifierError> {
        Ok(self.0.clone())
    }
}

/// Scores that make "Phở" the winner, then "Bánh mì", "Bún chả", "Cao lầu".
#[allow(dead_code)]
pub const DEFAULT_SCORES: [f32; 5] = [0.62, 0.12, 0.04, 0.07, 0.15];

/// Create a test app whose data lives under `dir`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(dir: &Path) -> (axum::Router, Arc<AppState>) {
    create_test_app_with_model(dir, Some(DEFAULT_SCORES.to_vec()))
}

/// Like [`create_test_app`], but with control over the model. `None`
/// builds an app with no model configured.
#[allow(dead_code)]
pub fn create_test_app_with_model(
    dir: &Path,
    scores: Option<Vec<f32>>,
) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default(dir);
    std::fs::write(&config.food_database_path, FOODS_JSON).unwrap();
    let catalog = Catalog::load_from_file(&config.food_database_path).unwrap();

    let pipeline = scores.map(|scores| {
        let class_names = catalog.names().map(str::to_string).collect();
        // Small input keeps debug-build resizing fast
        ImagePipeline::new(
            Arc::new(FixedScores(scores)),
            class_names,
            32,
            config.snapshot_quality,
        )
    });

    let state = Arc::new(AppState::new(config, catalog, pipeline));
    (create_router(state.clone()), state)
}

/// A small PNG with a horizontal gradient.
#[allow(dead_code)]
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

#[allow(dead_code)]
pub const BOUNDARY: &str = "vnfood-test-boundary";

/// Encode multipart form fields. File fields are `(name, Some(filename), bytes)`.
#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, data) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Build a `POST /api/predict` request, optionally authenticated.
#[allow(dead_code)]
pub fn predict_request(body: Vec<u8>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless request, optionally authenticated.
#[allow(dead_code)]
pub fn get_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Register `username` and log in, returning `(access, refresh)` tokens.
#[allow(dead_code)]
pub async fn register_and_login(
    app: &axum::Router,
    username: &str,
    password: &str,
) -> (String, String) {
    let creds = serde_json::json!({"username": username, "password": password});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/register", creds.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/login", creds))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    (
        json["access_token"].as_str().unwrap().to_string(),
        json["refresh_token"].as_str().unwrap().to_string(),
    )
}
