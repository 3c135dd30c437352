// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run-to-token reward computation.

/// KM tokens earned per kilometer run.
pub const KM_TO_TOKEN_RATIO: f64 = 1.0;

/// Whole tokens earned for a run: `floor(distance_km * KM_TO_TOKEN_RATIO)`.
///
/// Zero for runs shorter than one ratio unit, and for non-finite or
/// non-positive input.
pub fn tokens_for_distance(distance_km: f64) -> u64 {
    let tokens = (distance_km * KM_TO_TOKEN_RATIO).floor();
    if tokens.is_finite() && tokens >= 1.0 {
        tokens as u64
    } else {
        0
    }
}
