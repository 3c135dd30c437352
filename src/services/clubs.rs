// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Club CRUD and membership.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Club, ClubDetails, DistributionType, UserSummary};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClub {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    /// Initial USDC deposited into the incentive pool
    #[validate(range(exclusive_min = 0.0, message = "must be positive"))]
    pub usdc_pool: f64,
    #[serde(default)]
    pub distribution_type: DistributionType,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateClub {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    pub distribution_type: Option<DistributionType>,
}

#[derive(Clone)]
pub struct ClubService {
    store: Arc<dyn Store>,
}

impl ClubService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Create a club. The creator becomes its first member.
    pub async fn create(&self, creator_id: Uuid, input: CreateClub) -> Result<ClubDetails> {
        input.validate()?;

        if self.store.get_user(creator_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Creator with User ID {} not found.",
                creator_id
            )));
        }

        let now = chrono::Utc::now();
        let club = Club {
            id: Uuid::new_v4(),
            name: input.name,
            usdc_pool: input.usdc_pool,
            distribution_type: input.distribution_type,
            creator_id,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_club(&club).await?;

        tracing::info!(
            club_id = %club.id,
            creator_id = %creator_id,
            usdc_pool = club.usdc_pool,
            distribution_type = %club.distribution_type,
            "Club created"
        );
        self.details(club).await
    }

    pub async fn list(&self) -> Result<Vec<ClubDetails>> {
        let clubs = self.store.list_clubs().await?;
        let mut details = Vec::with_capacity(clubs.len());
        for club in clubs {
            details.push(self.details(club).await?);
        }
        Ok(details)
    }

    pub async fn find(&self, id: Uuid) -> Result<ClubDetails> {
        let club = self.get(id).await?;
        self.details(club).await
    }

    /// Update name and/or distribution type. Creator only.
    pub async fn update(&self, id: Uuid, user_id: Uuid, input: UpdateClub) -> Result<ClubDetails> {
        input.validate()?;

        let mut club = self.get(id).await?;
        if club.creator_id != user_id {
            return Err(AppError::Forbidden(
                "You are not authorized to update this club.".to_string(),
            ));
        }

        if let Some(name) = input.name {
            club.name = name;
        }
        if let Some(distribution_type) = input.distribution_type {
            club.distribution_type = distribution_type;
        }

        let club = self.store.update_club(&club).await?;
        tracing::info!(club_id = %id, "Club updated");
        self.details(club).await
    }

    /// Delete a club with its memberships and activities. Creator only.
    pub async fn remove(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let club = self.get(id).await?;
        if club.creator_id != user_id {
            return Err(AppError::Forbidden(
                "You are not authorized to delete this club.".to_string(),
            ));
        }

        self.store.delete_club(id).await?;
        tracing::info!(club_id = %id, "Club deleted");
        Ok(())
    }

    /// Join a club. Joining again is a no-op.
    pub async fn join(&self, id: Uuid, user_id: Uuid) -> Result<ClubDetails> {
        let club = self.find(id).await?;
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User with ID {} not found.",
                user_id
            )));
        }

        if club.has_member(user_id) {
            return Ok(club);
        }

        self.store.add_member(id, user_id).await?;
        tracing::info!(club_id = %id, user_id = %user_id, "Member joined club");
        self.find(id).await
    }

    /// Leave a club. Leaving a club you are not in is a no-op.
    pub async fn leave(&self, id: Uuid, user_id: Uuid) -> Result<ClubDetails> {
        let club = self.find(id).await?;
        if !club.has_member(user_id) {
            return Ok(club);
        }

        self.store.remove_member(id, user_id).await?;
        tracing::info!(club_id = %id, user_id = %user_id, "Member left club");
        self.find(id).await
    }

    async fn get(&self, id: Uuid) -> Result<Club> {
        self.store
            .get_club(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Club with ID {} not found.", id)))
    }

    async fn details(&self, club: Club) -> Result<ClubDetails> {
        let creator = self
            .store
            .get_user(club.creator_id)
            .await?
            .map(|u| UserSummary::from(&u));
        let members = self
            .store
            .club_members(club.id)
            .await?
            .iter()
            .map(UserSummary::from)
            .collect();
        Ok(ClubDetails::new(club, creator, members))
    }
}
