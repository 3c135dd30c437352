// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wallet balance lookup.

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::services::ledger::{Balance, Ledger, LedgerError};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct WalletService {
    store: Arc<dyn Store>,
    ledger: Arc<dyn Ledger>,
}

impl WalletService {
    pub fn new(store: Arc<dyn Store>, ledger: Arc<dyn Ledger>) -> Self {
        Self { store, ledger }
    }

    /// Balances of the user's linked Stellar account.
    pub async fn balances(&self, user_id: Uuid) -> Result<Vec<Balance>> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {} not found.", user_id)))?;

        let address = user.stellar_address.ok_or_else(|| {
            AppError::NotFound("Stellar address not found for this user.".to_string())
        })?;

        self.ledger
            .account_balances(&address)
            .await
            .map_err(|e| match e {
                LedgerError::AccountNotFound(_) => AppError::NotFound(format!(
                    "Stellar account {} not found or not funded on the network.",
                    address
                )),
                other => {
                    tracing::warn!(user_id = %user_id, error = %other, "Balance lookup failed");
                    AppError::Ledger(other.to_string())
                }
            })
    }
}
