// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! VNFood API Server
//!
//! Classifies uploaded photos of Vietnamese dishes, keeps a per-user
//! prediction history and serves the bilingual dish catalog.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vnfood_api::{
    config::Config,
    services::{Catalog, Classifier, ImagePipeline, RemoteClassifier},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting VNFood API");

    let food_db = &config.food_database_path;
    tracing::info!(path = %food_db.display(), "Loading food catalog");
    let catalog = Catalog::load_from_file(food_db).expect("Failed to load food catalog");
    tracing::info!(count = catalog.len(), "Food catalog loaded");

    let pipeline = build_pipeline(&config, &catalog)?;

    let state = Arc::new(AppState::new(config.clone(), catalog, pipeline));
    let app = vnfood_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Set up the classification pipeline, or `None` when no model server is
/// configured. The API still serves catalog and history without it.
fn build_pipeline(
    config: &Config,
    catalog: &Catalog,
) -> Result<Option<ImagePipeline>, Box<dyn std::error::Error>> {
    let Some(url) = config.model_server_url.as_deref() else {
        tracing::warn!("MODEL_SERVER_URL not set; predictions disabled");
        return Ok(None);
    };

    // Model output order: explicit label file, else catalog order
    let class_names = match &config.class_labels_path {
        Some(path) => ImagePipeline::load_labels(path)?,
        None => catalog.names().map(str::to_string).collect(),
    };

    let unknown = class_names
        .iter()
        .filter(|name| !catalog.contains(name))
        .count();
    if unknown > 0 {
        tracing::warn!(unknown, "Class labels missing from food catalog");
    }

    let classifier: Arc<dyn Classifier> = Arc::new(RemoteClassifier::new(url, &config.model_name));
    tracing::info!(
        model = %config.model_name,
        classes = class_names.len(),
        "Model server configured"
    );

    Ok(Some(ImagePipeline::new(
        classifier,
        class_names,
        config.image_size,
        config.snapshot_quality,
    )))
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("vnfood_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
