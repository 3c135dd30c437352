// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and profile routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::services::users::{RegisterUser, RegisteredUser, UpdateProfile};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Registration (no authentication).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/users", post(register))
}

/// Profile routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/users/profile",
        get(get_profile).patch(update_profile).delete(delete_profile),
    )
}

/// Register a user. The wallet secret is returned once, here.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<RegisteredUser>)> {
    let user = state.users.register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.users.profile(user.user_id).await?))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfile>,
) -> Result<Json<UserProfile>> {
    Ok(Json(state.users.update_profile(user.user_id, body).await?))
}

/// Soft-delete the caller's account.
async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode> {
    tracing::info!(user_id = %user.user_id, "User-initiated account deletion");
    state.users.soft_delete(user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
