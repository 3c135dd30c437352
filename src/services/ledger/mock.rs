// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process [`Ledger`] for tests.
//!
//! Records every mint request and answers balance queries from a map.
//! Failures can be injected per operation. Lock poisoning is reported as a
//! transport error rather than a panic.

use super::{Balance, Ledger, LedgerError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A recorded mint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintCall {
    pub address: String,
    pub amount: u64,
}

#[derive(Default)]
pub struct MockLedger {
    mints: Mutex<Vec<MintCall>>,
    balances: Mutex<HashMap<String, Vec<Balance>>>,
    mint_error: Mutex<Option<LedgerError>>,
    balance_error: Mutex<Option<LedgerError>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint requests received so far, in order.
    pub fn mint_calls(&self) -> Vec<MintCall> {
        self.mints.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn set_balances(&self, address: &str, balances: Vec<Balance>) {
        if let Ok(mut map) = self.balances.lock() {
            map.insert(address.to_string(), balances);
        }
    }

    /// Make every subsequent mint fail with `err`.
    pub fn fail_mints_with(&self, err: LedgerError) {
        if let Ok(mut slot) = self.mint_error.lock() {
            *slot = Some(err);
        }
    }

    /// Make every subsequent balance query fail with `err`.
    pub fn fail_balances_with(&self, err: LedgerError) {
        if let Ok(mut slot) = self.balance_error.lock() {
            *slot = Some(err);
        }
    }

    fn poisoned(what: &str) -> LedgerError {
        LedgerError::Transport(format!("mock {} lock poisoned", what))
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn mint_km_tokens(&self, address: &str, amount: u64) -> Result<String, LedgerError> {
        if let Some(err) = self
            .mint_error
            .lock()
            .map_err(|_| Self::poisoned("mint error"))?
            .clone()
        {
            return Err(err);
        }

        let mut mints = self.mints.lock().map_err(|_| Self::poisoned("mints"))?;
        mints.push(MintCall {
            address: address.to_string(),
            amount,
        });
        // Deterministic fake hash: 64 hex chars
        Ok(format!("{:064x}", mints.len()))
    }

    async fn account_balances(&self, address: &str) -> Result<Vec<Balance>, LedgerError> {
        if let Some(err) = self
            .balance_error
            .lock()
            .map_err(|_| Self::poisoned("balance error"))?
            .clone()
        {
            return Err(err);
        }

        self.balances
            .lock()
            .map_err(|_| Self::poisoned("balances"))?
            .get(address)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_mints_in_order() {
        let ledger = MockLedger::new();
        let first = ledger.mint_km_tokens("GA", 3).await.unwrap();
        let second = ledger.mint_km_tokens("GB", 7).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(first.len(), 64);
        assert_eq!(
            ledger.mint_calls(),
            vec![
                MintCall {
                    address: "GA".to_string(),
                    amount: 3
                },
                MintCall {
                    address: "GB".to_string(),
                    amount: 7
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let ledger = MockLedger::new();
        assert!(matches!(
            ledger.account_balances("GX").await,
            Err(LedgerError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_injected_mint_failure_is_not_recorded() {
        let ledger = MockLedger::new();
        ledger.fail_mints_with(LedgerError::Transport("down".to_string()));
        assert!(ledger.mint_km_tokens("GA", 1).await.is_err());
        assert!(ledger.mint_calls().is_empty());
    }
}
