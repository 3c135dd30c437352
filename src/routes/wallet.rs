// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::ledger::Balance;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/wallet/balance", get(get_balance))
}

/// Balances of the caller's Stellar account.
async fn get_balance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Balance>>> {
    Ok(Json(state.wallet.balances(user.user_id).await?))
}
