// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::ClubDetails;
use crate::services::clubs::{CreateClub, UpdateClub};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Club routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/clubs", post(create_club).get(list_clubs))
        .route(
            "/clubs/{id}",
            get(get_club).patch(update_club).delete(delete_club),
        )
        .route("/clubs/{id}/join", post(join_club))
        .route("/clubs/{id}/leave", post(leave_club))
}

async fn create_club(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreateClub>,
) -> Result<(StatusCode, Json<ClubDetails>)> {
    let club = state.clubs.create(user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

async fn list_clubs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<ClubDetails>>> {
    Ok(Json(state.clubs.list().await?))
}

async fn get_club(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClubDetails>> {
    Ok(Json(state.clubs.find(id).await?))
}

async fn update_club(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateClub>,
) -> Result<Json<ClubDetails>> {
    Ok(Json(state.clubs.update(id, user.user_id, body).await?))
}

async fn delete_club(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.clubs.remove(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn join_club(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ClubDetails>)> {
    let club = state.clubs.join(id, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(club)))
}

async fn leave_club(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ClubDetails>)> {
    let club = state.clubs.leave(id, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(club)))
}
