// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Secrets (JWT key, ledger service seed) are read once at startup and kept
//! in memory for the lifetime of the process.

use std::env;

/// Testnet passphrase, used to derive the network id signed into transactions.
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";
/// Public network passphrase.
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

const DEFAULT_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Horizon REST endpoint of the ledger network
    pub horizon_url: String,
    /// Network passphrase (testnet or public)
    pub network_passphrase: String,
    /// KM token contract id (`C...` strkey)
    pub km_token_contract_id: String,
    /// Where monitoring events are POSTed, if anywhere
    pub monitoring_url: Option<String>,

    // --- Secrets ---
    /// JWT verification key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Secret seed (`S...`) of the account that signs mint transactions
    pub service_account_secret: String,
}

impl Config {
    /// Config for tests only. The service seed and contract id are valid
    /// strkeys so the real ledger client can be constructed offline.
    pub fn test_default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: 8080,
            database_url: None,
            horizon_url: "http://127.0.0.1:9".to_string(),
            network_passphrase: TESTNET_PASSPHRASE.to_string(),
            km_token_contract_id: "CD2A6RPIIAB54OXJPHXKUTGXX2XROLZCEMQZYTTE553LYV5IQ3JNXBQC"
                .to_string(),
            monitoring_url: None,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            service_account_secret: "SAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6NKI"
                .to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: non_empty_var("DATABASE_URL"),
            horizon_url: non_empty_var("HORIZON_URL")
                .unwrap_or_else(|| DEFAULT_HORIZON_URL.to_string()),
            network_passphrase: passphrase_for(
                env::var("NETWORK_PASSPHRASE").ok().as_deref(),
            )
            .to_string(),
            km_token_contract_id: env::var("KM_TOKEN_CONTRACT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("KM_TOKEN_CONTRACT_ID"))?,
            monitoring_url: non_empty_var("MONITORING_URL"),

            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            service_account_secret: env::var("SERVICE_ACCOUNT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("SERVICE_ACCOUNT_SECRET"))?,
        })
    }
}

/// Map the `NETWORK_PASSPHRASE` setting to a real passphrase.
/// Only the literal `TESTNET` selects testnet; everything else is public.
pub fn passphrase_for(setting: Option<&str>) -> &'static str {
    match setting {
        Some("TESTNET") => TESTNET_PASSPHRASE,
        _ => PUBLIC_PASSPHRASE,
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
