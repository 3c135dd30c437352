// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stellar ledger integration.
//!
//! The rest of the service only sees the [`Ledger`] trait: mint KM tokens to
//! an account and read an account's balances. [`HorizonLedger`] talks to a
//! Horizon server; [`MockLedger`] records calls for tests.

pub mod horizon;
pub mod keypair;
pub mod mock;
pub mod strkey;
pub mod xdr;

pub use horizon::HorizonLedger;
pub use keypair::Keypair;
pub use mock::MockLedger;
pub use strkey::StrkeyError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One balance line of a Stellar account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Balance {
    /// Decimal string, 7 places
    pub balance: String,
    /// `native`, `credit_alphanum4`, `credit_alphanum12`, ...
    pub asset_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_issuer: Option<String>,
}

/// Errors from the ledger client. Converted to `AppError` by the services.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(String),

    #[error("Horizon returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Horizon request failed: {0}")]
    Transport(String),

    #[error("transaction rejected ({status}), result codes: {result_codes:?}")]
    Submit {
        status: u16,
        result_codes: Option<serde_json::Value>,
    },

    #[error("key error: {0}")]
    Key(String),

    #[error("invalid key: {0}")]
    InvalidKey(#[from] StrkeyError),

    #[error("unexpected Horizon response: {0}")]
    Decode(String),
}

/// Operations the service performs against the ledger network.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Mint `amount` KM tokens to `address` (`G...`). Returns the transaction hash.
    async fn mint_km_tokens(&self, address: &str, amount: u64) -> Result<String, LedgerError>;

    /// Balances held by `address`.
    async fn account_balances(&self, address: &str) -> Result<Vec<Balance>, LedgerError>;
}
