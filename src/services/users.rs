// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and profile management.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserProfile};
use crate::services::events::{Event, EventPublisher};
use crate::services::ledger::{strkey, Keypair};
use crate::services::password::hash_password;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Registration request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
}

/// Profile update request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_stellar_address"))]
    pub stellar_address: Option<String>,
}

fn validate_stellar_address(address: &str) -> std::result::Result<(), ValidationError> {
    if strkey::is_valid_account(address) {
        Ok(())
    } else {
        Err(ValidationError::new("stellar_address")
            .with_message("must be a Stellar account id (G...)".into()))
    }
}

/// Newly registered user. `secret` is the wallet seed and is only ever
/// returned here.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub secret: String,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    events: EventPublisher,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, events: EventPublisher) -> Self {
        Self { store, events }
    }

    /// Register a user with a freshly generated Stellar wallet.
    pub async fn register(&self, input: RegisterUser) -> Result<RegisteredUser> {
        input.validate()?;

        let keypair = Keypair::random().map_err(|e| anyhow::anyhow!("keypair: {e}"))?;
        let password_hash = hash_password(&input.password)?;

        let user = self
            .store
            .insert_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
                stellar_address: Some(keypair.address()),
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            stellar_address = %keypair.address(),
            "User registered"
        );
        self.events
            .publish(Event::user_created(user.id, &user.username));

        Ok(RegisteredUser {
            profile: UserProfile::from(&user),
            secret: keypair.secret(),
        })
    }

    /// Live user by id, or `NotFound`.
    pub async fn find(&self, id: Uuid) -> Result<User> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", id)))
    }

    pub async fn profile(&self, id: Uuid) -> Result<UserProfile> {
        Ok(UserProfile::from(&self.find(id).await?))
    }

    pub async fn update_profile(&self, id: Uuid, input: UpdateProfile) -> Result<UserProfile> {
        input.validate()?;

        let mut user = self.find(id).await?;
        if let Some(username) = input.username {
            user.username = username;
        }
        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(address) = input.stellar_address {
            user.stellar_address = Some(address);
        }

        let user = self.store.update_user(&user).await?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(UserProfile::from(&user))
    }

    /// Soft delete. The row stays, so the username and email remain taken.
    pub async fn soft_delete(&self, id: Uuid) -> Result<()> {
        if !self.store.soft_delete_user(id).await? {
            return Err(AppError::NotFound(format!("User with ID {} not found.", id)));
        }
        tracing::info!(user_id = %id, "User soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::password::verify_password;

    fn service() -> (UserService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (
            UserService::new(store.clone(), EventPublisher::default()),
            store,
        )
    }

    fn registration(name: &str) -> RegisterUser {
        RegisterUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password: "long enough".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_generates_wallet_and_hashes_password() {
        let (users, store) = service();
        let registered = users.register(registration("alice")).await.unwrap();

        let address = registered.profile.stellar_address.clone().unwrap();
        let keypair = Keypair::from_secret(&registered.secret).unwrap();
        assert_eq!(keypair.address(), address);

        let stored = store.get_user(registered.profile.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "long enough");
        assert!(verify_password("long enough", &stored.password_hash));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let (users, store) = service();

        let short = RegisterUser {
            password: "short".to_string(),
            ..registration("bob")
        };
        assert!(matches!(
            users.register(short).await,
            Err(AppError::BadRequest(msg)) if msg.contains("password")
        ));

        let bad_email = RegisterUser {
            email: "not-an-email".to_string(),
            ..registration("bob")
        };
        assert!(matches!(
            users.register(bad_email).await,
            Err(AppError::BadRequest(msg)) if msg.contains("email")
        ));

        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (users, _) = service();
        users.register(registration("carol")).await.unwrap();
        assert!(matches!(
            users.register(registration("carol")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (users, _) = service();
        assert!(matches!(
            users.profile(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_profile_changes_only_given_fields() {
        let (users, _) = service();
        let registered = users.register(registration("dave")).await.unwrap();
        let id = registered.profile.id;

        let updated = users
            .update_profile(
                id,
                UpdateProfile {
                    username: Some("david".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "david");
        assert_eq!(updated.email, "dave@example.com");
        assert_eq!(updated.stellar_address, registered.profile.stellar_address);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_bad_address() {
        let (users, _) = service();
        let id = users.register(registration("erin")).await.unwrap().profile.id;

        let result = users
            .update_profile(
                id,
                UpdateProfile {
                    stellar_address: Some("GNOTAREALKEY".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(msg)) if msg.contains("stellar_address")));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_user() {
        let (users, _) = service();
        let id = users.register(registration("frank")).await.unwrap().profile.id;

        users.soft_delete(id).await.unwrap();
        assert!(matches!(users.find(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            users.soft_delete(id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
