// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Services talk to a [`Store`]; `PgStore` is the production implementation
//! and `MemoryStore` backs local development and tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::Result;
use crate::models::{Activity, Club, NewUser, User};
use async_trait::async_trait;
use uuid::Uuid;

/// Typed persistence operations used by the services.
///
/// User lookups never return soft-deleted rows.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────

    /// Insert a user. Fails with `Conflict` if the username or email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    /// Persist profile fields and bump `updated_at`.
    async fn update_user(&self, user: &User) -> Result<User>;
    /// Mark a user deleted. Returns false if no live user had that id.
    async fn soft_delete_user(&self, id: Uuid) -> Result<bool>;

    // ─── Clubs ───────────────────────────────────────────────

    /// Insert a club and its creator's membership together.
    async fn insert_club(&self, club: &Club) -> Result<()>;
    async fn get_club(&self, id: Uuid) -> Result<Option<Club>>;
    async fn list_clubs(&self) -> Result<Vec<Club>>;
    /// Persist name/pool/distribution and bump `updated_at`.
    async fn update_club(&self, club: &Club) -> Result<Club>;
    /// Delete a club together with its memberships and activities.
    async fn delete_club(&self, id: Uuid) -> Result<()>;

    // ─── Membership ──────────────────────────────────────────

    /// Live members of a club, ordered by username.
    async fn club_members(&self, club_id: Uuid) -> Result<Vec<User>>;
    async fn add_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()>;
    async fn remove_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()>;

    // ─── Activities ──────────────────────────────────────────

    async fn insert_activity(&self, activity: &Activity) -> Result<()>;
    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>>;
    /// A user's activities, newest first.
    async fn activities_for_user(&self, user_id: Uuid) -> Result<Vec<Activity>>;
}
