// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.
//!
//! Mirrors the relational semantics of `PgStore`: unique username/email
//! (including soft-deleted rows), a membership join set, cascading club
//! deletion. Every mutating call bumps a write counter so tests can assert
//! that a code path did not persist anything.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Activity, Club, NewUser, User};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// [`Store`] kept entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    clubs: DashMap<Uuid, Club>,
    /// (club_id, user_id)
    members: DashSet<(Uuid, Uuid)>,
    activities: DashMap<Uuid, Activity>,
    /// Serializes the uniqueness check and insert for users.
    user_insert_lock: Mutex<()>,
    writes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutating calls made so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }

    fn name_or_email_taken(&self, username: &str, email: &str, except: Option<Uuid>) -> bool {
        self.users.iter().any(|u| {
            Some(u.id) != except && (u.username == username || u.email == email)
        })
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        self.record_write();
        let _guard = self
            .user_insert_lock
            .lock()
            .map_err(|_| AppError::Database("user insert lock poisoned".to_string()))?;

        if self.name_or_email_taken(&user.username, &user.email, None) {
            return Err(AppError::Conflict(
                "Username or email is already in use".to_string(),
            ));
        }

        let now = chrono::Utc::now();
        let stored = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            stellar_address: user.stellar_address,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| !u.is_deleted())
            .map(|u| u.value().clone()))
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        self.record_write();
        let _guard = self
            .user_insert_lock
            .lock()
            .map_err(|_| AppError::Database("user insert lock poisoned".to_string()))?;

        if self.name_or_email_taken(&user.username, &user.email, Some(user.id)) {
            return Err(AppError::Conflict(
                "Username or email is already in use".to_string(),
            ));
        }

        let mut stored = self
            .users
            .get_mut(&user.id)
            .filter(|u| !u.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", user.id)))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.stellar_address = user.stellar_address.clone();
        stored.updated_at = chrono::Utc::now();
        Ok(stored.value().clone())
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<bool> {
        self.record_write();
        match self.users.get_mut(&id) {
            Some(mut user) if !user.is_deleted() => {
                user.deleted_at = Some(chrono::Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_club(&self, club: &Club) -> Result<()> {
        self.record_write();
        self.clubs.insert(club.id, club.clone());
        self.members.insert((club.id, club.creator_id));
        Ok(())
    }

    async fn get_club(&self, id: Uuid) -> Result<Option<Club>> {
        Ok(self.clubs.get(&id).map(|c| c.value().clone()))
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let mut clubs: Vec<Club> = self.clubs.iter().map(|c| c.value().clone()).collect();
        clubs.sort_by_key(|c| c.created_at);
        Ok(clubs)
    }

    async fn update_club(&self, club: &Club) -> Result<Club> {
        self.record_write();
        let mut stored = self
            .clubs
            .get_mut(&club.id)
            .ok_or_else(|| AppError::NotFound(format!("Club with ID {} not found.", club.id)))?;
        stored.name = club.name.clone();
        stored.usdc_pool = club.usdc_pool;
        stored.distribution_type = club.distribution_type;
        stored.updated_at = chrono::Utc::now();
        Ok(stored.value().clone())
    }

    async fn delete_club(&self, id: Uuid) -> Result<()> {
        self.record_write();
        self.activities.retain(|_, a| a.club_id != id);
        self.members.retain(|(club_id, _)| *club_id != id);
        self.clubs.remove(&id);
        Ok(())
    }

    async fn club_members(&self, club_id: Uuid) -> Result<Vec<User>> {
        let mut members: Vec<User> = self
            .members
            .iter()
            .filter(|m| m.0 == club_id)
            .filter_map(|m| self.users.get(&m.1).map(|u| u.value().clone()))
            .filter(|u| !u.is_deleted())
            .collect();
        members.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(members)
    }

    async fn add_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()> {
        self.record_write();
        self.members.insert((club_id, user_id));
        Ok(())
    }

    async fn remove_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()> {
        self.record_write();
        self.members.remove(&(club_id, user_id));
        Ok(())
    }

    async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        self.record_write();
        self.activities.insert(activity.id, activity.clone());
        Ok(())
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>> {
        Ok(self.activities.get(&id).map(|a| a.value().clone()))
    }

    async fn activities_for_user(&self, user_id: Uuid) -> Result<Vec<Activity>> {
        let mut activities: Vec<Activity> = self
            .activities
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.value().clone())
            .collect();
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(activities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "hash".to_string(),
            stellar_address: None,
        }
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice")).await.unwrap();

        let dup_name = NewUser {
            email: "other@example.com".to_string(),
            ..new_user("alice")
        };
        assert!(matches!(
            store.insert_user(dup_name).await,
            Err(AppError::Conflict(_))
        ));

        let dup_email = NewUser {
            username: "bob".to_string(),
            ..new_user("alice")
        };
        assert!(matches!(
            store.insert_user(dup_email).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_soft_deleted_user_is_hidden_but_keeps_name() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("carol")).await.unwrap();

        assert!(store.soft_delete_user(user.id).await.unwrap());
        assert!(store.get_user(user.id).await.unwrap().is_none());
        assert!(!store.soft_delete_user(user.id).await.unwrap());

        // Row is retained, so the username is still taken
        assert!(matches!(
            store.insert_user(new_user("carol")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_club_cascades() {
        let store = MemoryStore::new();
        let user = store.insert_user(new_user("dave")).await.unwrap();
        let now = chrono::Utc::now();
        let club = Club {
            id: Uuid::new_v4(),
            name: "Dawn Patrol".to_string(),
            usdc_pool: 10.0,
            distribution_type: Default::default(),
            creator_id: user.id,
            created_at: now,
            updated_at: now,
        };
        store.insert_club(&club).await.unwrap();
        store
            .insert_activity(&Activity {
                id: Uuid::new_v4(),
                user_id: user.id,
                club_id: club.id,
                distance_km: 5.0,
                duration_seconds: 1500,
                created_at: now,
            })
            .await
            .unwrap();

        assert_eq!(store.club_members(club.id).await.unwrap().len(), 1);

        store.delete_club(club.id).await.unwrap();

        assert!(store.get_club(club.id).await.unwrap().is_none());
        assert!(store.club_members(club.id).await.unwrap().is_empty());
        assert!(store.activities_for_user(user.id).await.unwrap().is_empty());
    }
}
