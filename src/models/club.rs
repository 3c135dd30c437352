// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Running club model.

use super::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// How a club's incentive pool is meant to be split between members.
///
/// Stored and returned, but no payout logic reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistributionType {
    Equal,
    #[default]
    Proportional,
}

impl DistributionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionType::Equal => "EQUAL",
            DistributionType::Proportional => "PROPORTIONAL",
        }
    }
}

impl fmt::Display for DistributionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EQUAL" => Ok(DistributionType::Equal),
            "PROPORTIONAL" => Ok(DistributionType::Proportional),
            other => Err(format!("unknown distribution type '{}'", other)),
        }
    }
}

/// Club row as stored in the database. Members live in the join table.
#[derive(Debug, Clone, Serialize)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    /// USDC deposited as the incentive pool (2 decimal places)
    pub usdc_pool: f64,
    pub distribution_type: DistributionType,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Club with its creator and member list, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ClubDetails {
    pub id: Uuid,
    pub name: String,
    pub usdc_pool: f64,
    pub distribution_type: DistributionType,
    /// `None` if the creator has since deleted their account
    pub creator: Option<UserSummary>,
    pub members: Vec<UserSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClubDetails {
    pub fn new(club: Club, creator: Option<UserSummary>, members: Vec<UserSummary>) -> Self {
        Self {
            id: club.id,
            name: club.name,
            usdc_pool: club.usdc_pool,
            distribution_type: club.distribution_type,
            creator,
            members,
            created_at: club.created_at,
            updated_at: club.updated_at,
        }
    }

    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.iter().any(|m| m.id == user_id)
    }
}
