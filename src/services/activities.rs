// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run logging and KM token rewards.
//!
//! A logged run is persisted first, then rewarded: `floor(km)` tokens are
//! minted to the runner's Stellar account. Runs under a kilometer are stored
//! but earn nothing and never touch the ledger. A failed mint leaves the run
//! stored; there is no retry.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::Activity;
use crate::services::events::{Event, EventPublisher};
use crate::services::ledger::Ledger;
use crate::services::rewards::tokens_for_distance;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub const RUN_REWARDED_MESSAGE: &str = "Run logged and tokens minted successfully!";
pub const RUN_TOO_SHORT_MESSAGE: &str = "Distance too short to generate tokens.";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogRun {
    #[validate(range(exclusive_min = 0.0, message = "must be positive"))]
    pub distance_km: f64,
    #[validate(range(min = 1, message = "must be positive"))]
    pub duration_seconds: i32,
    pub club_id: Uuid,
}

/// Outcome of logging a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RunResult {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_minted: Option<u64>,
    /// Mint transaction hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    pub activity_id: Uuid,
}

#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn Store>,
    ledger: Arc<dyn Ledger>,
    events: EventPublisher,
}

impl ActivityService {
    pub fn new(store: Arc<dyn Store>, ledger: Arc<dyn Ledger>, events: EventPublisher) -> Self {
        Self {
            store,
            ledger,
            events,
        }
    }

    /// Record a run for `user_id` and mint its reward.
    pub async fn log_run(&self, user_id: Uuid, input: LogRun) -> Result<RunResult> {
        input.validate()?;
        if !input.distance_km.is_finite() {
            return Err(AppError::BadRequest(
                "distance_km must be a finite number".to_string(),
            ));
        }

        tracing::debug!(user_id = %user_id, "Fetching runner");
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", user_id)))?;

        let address = user.stellar_address.clone().ok_or_else(|| {
            AppError::NotFound(format!(
                "Stellar wallet for user {} not configured.",
                user_id
            ))
        })?;

        if self.store.get_club(input.club_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Club with ID {} not found.",
                input.club_id
            )));
        }
        let is_member = self
            .store
            .club_members(input.club_id)
            .await?
            .iter()
            .any(|m| m.id == user_id);
        if !is_member {
            return Err(AppError::Forbidden(
                "You are not a member of this club.".to_string(),
            ));
        }

        let activity = Activity {
            id: Uuid::new_v4(),
            user_id,
            club_id: input.club_id,
            distance_km: input.distance_km,
            duration_seconds: input.duration_seconds,
            created_at: chrono::Utc::now(),
        };
        self.store.insert_activity(&activity).await?;

        tracing::info!(
            user_id = %user_id,
            username = %user.username,
            club_id = %activity.club_id,
            activity_id = %activity.id,
            distance_km = activity.distance_km,
            "Run logged"
        );

        let tokens = tokens_for_distance(activity.distance_km);
        if tokens == 0 {
            tracing::warn!(
                user_id = %user_id,
                distance_km = activity.distance_km,
                "Run too short, no tokens minted"
            );
            return Ok(RunResult {
                message: RUN_TOO_SHORT_MESSAGE.to_string(),
                tokens_minted: None,
                transaction: None,
                activity_id: activity.id,
            });
        }

        tracing::info!(user_id = %user_id, tokens, address = %address, "Minting KM tokens");
        let hash = self
            .ledger
            .mint_km_tokens(&address, tokens)
            .await
            .map_err(|e| {
                tracing::error!(
                    user_id = %user_id,
                    activity_id = %activity.id,
                    tokens,
                    error = %e,
                    "KM token mint failed"
                );
                AppError::Ledger(AppError::MINT_FAILED.to_string())
            })?;

        tracing::info!(user_id = %user_id, tokens, hash = %hash, "KM tokens minted");
        self.events.publish(Event::RunLogged {
            user_id,
            club_id: activity.club_id,
            activity_id: activity.id,
            distance_km: activity.distance_km,
            tokens_minted: tokens,
        });

        Ok(RunResult {
            message: RUN_REWARDED_MESSAGE.to_string(),
            tokens_minted: Some(tokens),
            transaction: Some(hash),
            activity_id: activity.id,
        })
    }

    /// The user's runs, newest first.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Activity>> {
        self.store.activities_for_user(user_id).await
    }

    /// One of the user's runs. Other users' runs are reported as missing.
    pub async fn find(&self, user_id: Uuid, id: Uuid) -> Result<Activity> {
        self.store
            .get_activity(id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("Activity with ID {} not found.", id)))
    }
}
