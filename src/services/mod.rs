// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod catalog;
pub mod classifier;
pub mod credentials;
pub mod history;
pub mod password;
pub mod pipeline;
pub mod tokens;

pub use catalog::{Catalog, SearchQuery};
pub use classifier::{Classifier, ClassifierError, ImageTensor, RemoteClassifier};
pub use credentials::{CredentialStore, Registration};
pub use history::HistoryStore;
pub use pipeline::{ImagePipeline, PredictionOutcome};
pub use tokens::{TokenKind, TokenService};
