// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Registration and login issue a usable access/refresh token pair
//! 2. Protected routes reject requests without valid tokens
//! 3. Refresh tokens mint access tokens and cannot be used as one
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;

use common::{body_json, create_test_app, get_request, json_request, register_and_login};

#[tokio::test]
async fn test_register_then_duplicate_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());
    let creds = json!({"username": "alice", "password": "pw123"});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/register", creds.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let response = app
        .oneshot(json_request("POST", "/api/register", creds))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_requires_both_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    for payload in [
        json!({"username": "alice"}),
        json!({"password": "pw"}),
        json!({"username": "", "password": "pw"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/register", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());
    register_and_login(&app, "alice", "pw123").await;

    for creds in [
        json!({"username": "alice", "password": "wrong"}),
        json!({"username": "bob", "password": "pw123"}),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/login", creds))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_login_response_shape() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());
    register_and_login(&app, "alice", "pw123").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/login",
            json!({"username": "alice", "password": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 15 * 60);
    assert_eq!(body["username"], "alice");
    assert_ne!(body["access_token"], body["refresh_token"]);
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let response = app
        .oneshot(get_request("GET", "/api/history", None))
        .await
        .unwrap();

    // Should return 401 Unauthorized without token
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let response = app
        .oneshot(get_request(
            "GET",
            "/api/history",
            Some("invalid.token.here"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_protected_route_with_foreign_signature() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let other = vnfood_api::services::TokenService::new(
        b"some_other_signing_key_entirely!",
        chrono::Duration::minutes(15),
        chrono::Duration::days(7),
    );
    let token = other.issue_access("alice").unwrap();

    let response = app
        .oneshot(get_request("GET", "/api/history", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access_token() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());
    let (_, refresh) = register_and_login(&app, "alice", "pw123").await;

    let response = app
        .oneshot(get_request("GET", "/api/history", Some(&refresh)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_flow() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());
    let (access, refresh) = register_and_login(&app, "alice", "pw123").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/refresh",
            json!({"refresh_token": refresh}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let new_access = body["access_token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get_request("GET", "/api/history", Some(&new_access)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // An access token cannot be used to refresh
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/refresh",
            json!({"refresh_token": access}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request("POST", "/api/refresh", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_preflight() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = create_test_app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/predict")
                .header(header::ORIGIN, state.config.frontend_url.as_str())
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        state.config.frontend_url.as_str()
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/login")
                .header(header::ORIGIN, "https://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = create_test_app(dir.path());

    let response = app
        .oneshot(get_request("GET", "/health", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], true);
}
