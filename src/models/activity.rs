// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Logged run model for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// A run logged by a user on behalf of one of their clubs.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Activity {
    pub id: Uuid,
    /// Runner
    pub user_id: Uuid,
    /// Club the run counts towards
    pub club_id: Uuid,
    /// Distance in kilometers (3 decimal places)
    pub distance_km: f64,
    /// Duration in seconds
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
}
