// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod club;
pub mod user;

pub use activity::Activity;
pub use club::{Club, ClubDetails, DistributionType};
pub use user::{NewUser, User, UserProfile, UserSummary};
