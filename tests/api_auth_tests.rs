// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API authentication and CORS tests.
//!
//! These tests verify that:
//! 1. Protected routes reject requests without valid tokens
//! 2. Protected routes accept requests with valid tokens
//! 3. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use runclub_api::config::Config;
use tower::ServiceExt;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn test_protected_route_without_token() {
    let app = common::create_test_app();
    let (status, body) = common::send(&app, Method::GET, "/clubs", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let app = common::create_test_app();
    let (status, body) = common::send(
        &app,
        Method::GET,
        "/users/profile",
        Some("invalid.token.here"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let app = common::create_test_app();
    let token = common::create_test_jwt(Uuid::new_v4());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/clubs")
                .header(header::AUTHORIZATION, format!("Token {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_key_rejected() {
    let app = common::create_test_app();
    let token = common::create_jwt(
        &Uuid::new_v4().to_string(),
        b"some_other_key_that_is_long_enough",
        3600,
    );

    let (status, _) = common::send(&app, Method::GET, "/clubs", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = common::create_test_app();
    let token = common::create_jwt(
        &Uuid::new_v4().to_string(),
        &Config::test_default().jwt_signing_key,
        -3600,
    );

    let (status, body) = common::send(&app, Method::GET, "/clubs", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_non_uuid_subject_rejected() {
    let app = common::create_test_app();
    let token = common::create_jwt("12345", &Config::test_default().jwt_signing_key, 3600);

    let (status, _) = common::send(&app, Method::GET, "/clubs", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_valid_token() {
    let app = common::create_test_app();
    let token = common::create_test_jwt(Uuid::new_v4());

    let (status, body) = common::send(&app, Method::GET, "/clubs", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = common::create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/activities/run")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_public_routes_no_auth_required() {
    let app = common::create_test_app();

    let (status, body) = common::send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Registration is public
    let (status, _) = common::send(
        &app,
        Method::POST,
        "/users",
        None,
        Some(serde_json::json!({
            "username": "newcomer",
            "email": "newcomer@example.com",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let app = common::create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("X-Content-Type-Options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
}
