// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ed25519 account keys.

use super::strkey::{self, KeyKind};
use super::LedgerError;
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{Ed25519KeyPair, KeyPair as _};
use std::fmt;

/// An account keypair that can sign transactions.
pub struct Keypair {
    seed: [u8; 32],
    inner: Ed25519KeyPair,
}

impl Keypair {
    /// Build a keypair from an `S...` secret seed.
    pub fn from_secret(secret: &str) -> Result<Self, LedgerError> {
        let seed = strkey::decode(KeyKind::Seed, secret.trim())?;
        Self::from_seed(seed)
    }

    /// Generate a fresh keypair from the system RNG.
    pub fn random() -> Result<Self, LedgerError> {
        let mut seed = [0u8; 32];
        SystemRandom::new()
            .fill(&mut seed)
            .map_err(|_| LedgerError::Key("system RNG unavailable".to_string()))?;
        Self::from_seed(seed)
    }

    fn from_seed(seed: [u8; 32]) -> Result<Self, LedgerError> {
        let inner = Ed25519KeyPair::from_seed_unchecked(&seed)
            .map_err(|e| LedgerError::Key(e.to_string()))?;
        Ok(Self { seed, inner })
    }

    pub fn public_key(&self) -> [u8; 32] {
        let mut key = [0u8; 32];
        key.copy_from_slice(self.inner.public_key().as_ref());
        key
    }

    /// `G...` account id.
    pub fn address(&self) -> String {
        strkey::encode(KeyKind::Account, &self.public_key())
    }

    /// `S...` secret seed. Only ever shown to the key's owner.
    pub fn secret(&self) -> String {
        strkey::encode(KeyKind::Seed, &self.seed)
    }

    /// Last four bytes of the public key, used as the signature hint.
    pub fn hint(&self) -> [u8; 4] {
        let key = self.public_key();
        [key[28], key[29], key[30], key[31]]
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        let mut signature = [0u8; 64];
        signature.copy_from_slice(self.inner.sign(message).as_ref());
        signature
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
