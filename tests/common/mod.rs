// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use runclub_api::config::Config;
use runclub_api::db::MemoryStore;
use runclub_api::routes::create_router;
use runclub_api::services::MockLedger;
use runclub_api::AppState;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use uuid::Uuid;

/// Offline test app: in-memory store and mock ledger.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub ledger: Arc<MockLedger>,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let ledger = Arc::new(MockLedger::new());
    let state = Arc::new(AppState::new(
        Config::test_default(),
        store.clone(),
        ledger.clone(),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        ledger,
    }
}

/// Create a test JWT for `sub`, expiring `ttl_secs` from now (may be negative).
#[allow(dead_code)]
pub fn create_jwt(sub: &str, signing_key: &[u8], ttl_secs: i64) -> String {
    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        iat: usize,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: sub.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Valid token for `user_id` signed with the test key.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: Uuid) -> String {
    create_jwt(
        &user_id.to_string(),
        &Config::test_default().jwt_signing_key,
        86400,
    )
}

/// Send a request and return the status and JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Register a user through the API. Returns (user id, bearer token, response body).
#[allow(dead_code)]
pub async fn register(app: &TestApp, username: &str) -> (Uuid, String, Value) {
    let (status, body) = send(
        app,
        Method::POST,
        "/users",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "correct horse battery",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
    (id, create_test_jwt(id), body)
}

/// Create a club through the API as `token`'s user. Returns the club id.
#[allow(dead_code)]
pub async fn create_club(app: &TestApp, token: &str, name: &str) -> Uuid {
    let (status, body) = send(
        app,
        Method::POST,
        "/clubs",
        Some(token),
        Some(serde_json::json!({
            "name": name,
            "usdc_pool": 100.5,
            "distribution_type": "PROPORTIONAL",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create club failed: {}", body);
    body["id"].as_str().unwrap().parse().unwrap()
}
