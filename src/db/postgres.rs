// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL store backed by `sqlx`.
//!
//! Tables:
//! - `users` (soft-deleted via `deleted_at`)
//! - `clubs`
//! - `club_members` (join table, composite key)
//! - `activities`
//!
//! Decimal columns are read back as `float8`; writes rely on the implicit
//! float8 → numeric assignment cast.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{Activity, Club, DistributionType, NewUser, User};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

const MAX_CONNECTIONS: u32 = 10;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, stellar_address, created_at, updated_at, deleted_at";
const CLUB_COLUMNS: &str = "id, name, usdc_pool::float8 AS usdc_pool, distribution_type, \
     creator_id, created_at, updated_at";
const ACTIVITY_COLUMNS: &str =
    "id, user_id, club_id, distance_km::float8 AS distance_km, duration_seconds, created_at";

/// PostgreSQL-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool to `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        tracing::info!(max_connections = MAX_CONNECTIONS, "Connected to Postgres");
        Ok(Self { pool })
    }
}

/// Convert a sqlx error, turning unique violations into `Conflict`.
fn db_error(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict("Username or email is already in use".to_string());
        }
    }
    AppError::Database(format!("{}: {}", context, err))
}

fn map_row_to_user(row: &PgRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        stellar_address: row.try_get("stellar_address")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

fn map_row_to_club(row: &PgRow) -> std::result::Result<Club, sqlx::Error> {
    let distribution: String = row.try_get("distribution_type")?;
    let distribution_type = distribution
        .parse::<DistributionType>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(Club {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        usdc_pool: row.try_get("usdc_pool")?,
        distribution_type,
        creator_id: row.try_get("creator_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_row_to_activity(row: &PgRow) -> std::result::Result<Activity, sqlx::Error> {
    Ok(Activity {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        club_id: row.try_get("club_id")?,
        distance_km: row.try_get("distance_km")?,
        duration_seconds: row.try_get("duration_seconds")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    // ─── User Operations ─────────────────────────────────────────

    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (id, username, email, password_hash, stellar_address, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.stellar_address)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to insert user", e))?;

        map_row_to_user(&row).map_err(|e| db_error("Failed to decode user", e))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get user", e))?;

        row.as_ref()
            .map(map_row_to_user)
            .transpose()
            .map_err(|e| db_error("Failed to decode user", e))
    }

    async fn update_user(&self, user: &User) -> Result<User> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, stellar_address = $4, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.stellar_address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update user", e))?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", user.id)))?;

        map_row_to_user(&row).map_err(|e| db_error("Failed to decode user", e))
    }

    async fn soft_delete_user(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to soft-delete user", e))?;

        Ok(result.rows_affected() > 0)
    }

    // ─── Club Operations ─────────────────────────────────────────

    async fn insert_club(&self, club: &Club) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        sqlx::query(
            "INSERT INTO clubs (id, name, usdc_pool, distribution_type, creator_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(club.id)
        .bind(&club.name)
        .bind(club.usdc_pool)
        .bind(club.distribution_type.as_str())
        .bind(club.creator_id)
        .bind(club.created_at)
        .bind(club.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to insert club", e))?;

        sqlx::query("INSERT INTO club_members (club_id, user_id) VALUES ($1, $2)")
            .bind(club.id)
            .bind(club.creator_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to insert creator membership", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit club creation", e))
    }

    async fn get_club(&self, id: Uuid) -> Result<Option<Club>> {
        let sql = format!("SELECT {} FROM clubs WHERE id = $1", CLUB_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get club", e))?;

        row.as_ref()
            .map(map_row_to_club)
            .transpose()
            .map_err(|e| db_error("Failed to decode club", e))
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let sql = format!("SELECT {} FROM clubs ORDER BY created_at", CLUB_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list clubs", e))?;

        rows.iter()
            .map(map_row_to_club)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| db_error("Failed to decode club", e))
    }

    async fn update_club(&self, club: &Club) -> Result<Club> {
        let sql = format!(
            "UPDATE clubs SET name = $2, usdc_pool = $3, distribution_type = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            CLUB_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(club.id)
            .bind(&club.name)
            .bind(club.usdc_pool)
            .bind(club.distribution_type.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update club", e))?
            .ok_or_else(|| AppError::NotFound(format!("Club with ID {} not found.", club.id)))?;

        map_row_to_club(&row).map_err(|e| db_error("Failed to decode club", e))
    }

    async fn delete_club(&self, id: Uuid) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        for sql in [
            "DELETE FROM activities WHERE club_id = $1",
            "DELETE FROM club_members WHERE club_id = $1",
            "DELETE FROM clubs WHERE id = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to delete club", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit club deletion", e))
    }

    // ─── Membership Operations ───────────────────────────────────

    async fn club_members(&self, club_id: Uuid) -> Result<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users WHERE deleted_at IS NULL AND id IN \
             (SELECT user_id FROM club_members WHERE club_id = $1) ORDER BY username",
            USER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(club_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list club members", e))?;

        rows.iter()
            .map(map_row_to_user)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| db_error("Failed to decode user", e))
    }

    async fn add_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            "INSERT INTO club_members (club_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(club_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to add club member", e))?;
        Ok(())
    }

    async fn remove_member(&self, club_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM club_members WHERE club_id = $1 AND user_id = $2")
            .bind(club_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to remove club member", e))?;
        Ok(())
    }

    // ─── Activity Operations ─────────────────────────────────────

    async fn insert_activity(&self, activity: &Activity) -> Result<()> {
        sqlx::query(
            "INSERT INTO activities (id, user_id, club_id, distance_km, duration_seconds, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(activity.id)
        .bind(activity.user_id)
        .bind(activity.club_id)
        .bind(activity.distance_km)
        .bind(activity.duration_seconds)
        .bind(activity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert activity", e))?;
        Ok(())
    }

    async fn get_activity(&self, id: Uuid) -> Result<Option<Activity>> {
        let sql = format!("SELECT {} FROM activities WHERE id = $1", ACTIVITY_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get activity", e))?;

        row.as_ref()
            .map(map_row_to_activity)
            .transpose()
            .map_err(|e| db_error("Failed to decode activity", e))
    }

    async fn activities_for_user(&self, user_id: Uuid) -> Result<Vec<Activity>> {
        let sql = format!(
            "SELECT {} FROM activities WHERE user_id = $1 ORDER BY created_at DESC",
            ACTIVITY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list activities", e))?;

        rows.iter()
            .map(map_row_to_activity)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| db_error("Failed to decode activity", e))
    }
}
