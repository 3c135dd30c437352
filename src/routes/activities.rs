// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run logging routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::Activity;
use crate::services::activities::{LogRun, RunResult};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Activity routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities/run", post(log_run))
        .route("/activities", get(list_activities))
        .route("/activities/{id}", get(get_activity))
}

/// Log a run and mint its KM token reward.
async fn log_run(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<LogRun>,
) -> Result<(StatusCode, Json<RunResult>)> {
    tracing::debug!(
        user_id = %user.user_id,
        club_id = %body.club_id,
        distance_km = body.distance_km,
        "Logging run"
    );
    let result = state.activities.log_run(user.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Activity>>> {
    Ok(Json(state.activities.list(user.user_id).await?))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Activity>> {
    Ok(Json(state.activities.find(user.user_id, id).await?))
}
