// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Horizon REST client for minting and balance lookups.

use super::keypair::Keypair;
use super::strkey::{self, KeyKind};
use super::xdr::{self, MintTransaction};
use super::{Balance, Ledger, LedgerError};
use crate::config::Config;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

/// Fee offered for the mint transaction, in stroops.
const MINT_FEE: u32 = 100_000;
/// How long a submitted transaction stays valid.
const TX_TIMEOUT_SECS: u64 = 30;

/// Subset of Horizon's account resource.
#[derive(Debug, Deserialize)]
struct AccountResponse {
    sequence: String,
    #[serde(default)]
    balances: Vec<Balance>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct ProblemResponse {
    extras: Option<ProblemExtras>,
}

#[derive(Debug, Deserialize)]
struct ProblemExtras {
    result_codes: Option<serde_json::Value>,
}

/// [`Ledger`] backed by a Horizon server.
pub struct HorizonLedger {
    http: reqwest::Client,
    base_url: String,
    network_id: [u8; 32],
    service: Keypair,
    contract: [u8; 32],
}

impl HorizonLedger {
    /// Build the client from config. Fails if the service seed or contract id
    /// is not a valid strkey.
    pub fn new(config: &Config) -> Result<Self, LedgerError> {
        let service = Keypair::from_secret(&config.service_account_secret)?;
        let contract = strkey::decode(KeyKind::Contract, config.km_token_contract_id.trim())?;

        tracing::info!(
            horizon = %config.horizon_url,
            service_account = %service.address(),
            contract = %config.km_token_contract_id,
            "Ledger client initialized"
        );

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.horizon_url.trim_end_matches('/').to_string(),
            network_id: xdr::network_id(&config.network_passphrase),
            service,
            contract,
        })
    }

    async fn load_account(&self, address: &str) -> Result<AccountResponse, LedgerError> {
        let url = format!("{}/accounts/{}", self.base_url, address);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LedgerError::AccountNotFound(address.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AccountResponse>()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }

    /// Build and sign the mint envelope. Returns the envelope XDR and the
    /// transaction hash.
    fn signed_mint_envelope(
        &self,
        recipient: &str,
        amount: u64,
        account_sequence: i64,
        now: u64,
    ) -> Result<(Vec<u8>, [u8; 32]), LedgerError> {
        let recipient = strkey::decode(KeyKind::Account, recipient)?;
        let tx = MintTransaction {
            source: self.service.public_key(),
            fee: MINT_FEE,
            sequence: account_sequence + 1,
            max_time: now + TX_TIMEOUT_SECS,
            contract: self.contract,
            recipient,
            amount: i128::from(amount),
        };

        let hash = tx.hash(&self.network_id);
        let signature = self.service.sign(&hash);
        Ok((tx.envelope_xdr(self.service.hint(), &signature), hash))
    }

    async fn submit(&self, envelope: &[u8]) -> Result<String, LedgerError> {
        let url = format!("{}/transactions", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[("tx", STANDARD.encode(envelope))])
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(submit_error(status.as_u16(), &body));
        }

        let submitted: SubmitResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        Ok(submitted.hash)
    }
}

/// Turn a failed submission into an error carrying Horizon's result codes.
fn submit_error(status: u16, body: &str) -> LedgerError {
    let result_codes = serde_json::from_str::<ProblemResponse>(body)
        .ok()
        .and_then(|p| p.extras)
        .and_then(|e| e.result_codes);
    LedgerError::Submit {
        status,
        result_codes,
    }
}

#[async_trait]
impl Ledger for HorizonLedger {
    async fn mint_km_tokens(&self, address: &str, amount: u64) -> Result<String, LedgerError> {
        let service_address = self.service.address();
        let account = self.load_account(&service_address).await?;
        let sequence: i64 = account
            .sequence
            .parse()
            .map_err(|_| LedgerError::Decode(format!("bad sequence '{}'", account.sequence)))?;

        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let (envelope, hash) = self.signed_mint_envelope(address, amount, sequence, now)?;

        tracing::debug!(
            recipient = %address,
            amount,
            sequence = sequence + 1,
            hash = %hex::encode(hash),
            "Submitting mint transaction"
        );

        let submitted = self.submit(&envelope).await?;
        tracing::info!(recipient = %address, amount, hash = %submitted, "Mint transaction applied");
        Ok(submitted)
    }

    async fn account_balances(&self, address: &str) -> Result<Vec<Balance>, LedgerError> {
        Ok(self.load_account(address).await?.balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ring::signature::{UnparsedPublicKey, ED25519};

    const RECIPIENT: &str = "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI";

    fn ledger() -> HorizonLedger {
        HorizonLedger::new(&Config::test_default()).unwrap()
    }

    #[test]
    fn test_new_reads_service_key_and_contract() {
        let ledger = ledger();
        assert_eq!(
            ledger.service.address(),
            "GAB2CB576PHBBPQ5ODORRZ2LYCMWPZGWGCN2KDK7DXOIMZASKUY3QZ6Q"
        );
        assert_eq!(
            hex::encode(ledger.contract),
            "f40f45e84003de3ae979eeaa4cd7beaf172f2223219c4e64ef76bc57a886d2db"
        );
    }

    #[test]
    fn test_new_rejects_bad_contract() {
        let config = Config {
            km_token_contract_id: "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
                .to_string(),
            ..Config::test_default()
        };
        assert!(matches!(
            HorizonLedger::new(&config),
            Err(LedgerError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_signed_envelope_verifies() {
        let ledger = ledger();
        let (envelope, hash) = ledger
            .signed_mint_envelope(RECIPIENT, 5, 41, 1_700_000_000)
            .unwrap();

        // envelope type + tx + signature count + hint + length, then the signature
        let signature = &envelope[envelope.len() - 64..];
        let public_key = ledger.service.public_key();
        let verifier = UnparsedPublicKey::new(&ED25519, &public_key);
        assert!(verifier.verify(&hash, signature).is_ok());

        // sequence is account sequence + 1
        assert_eq!(&envelope[4 + 40..4 + 48], &42i64.to_be_bytes());
    }

    #[test]
    fn test_signed_envelope_rejects_bad_recipient() {
        assert!(matches!(
            ledger().signed_mint_envelope("GNOTAKEY", 1, 0, 0),
            Err(LedgerError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_submit_error_extracts_result_codes() {
        let body = r#"{
            "title": "Transaction Failed",
            "status": 400,
            "extras": {"result_codes": {"transaction": "tx_bad_seq"}}
        }"#;
        match submit_error(400, body) {
            LedgerError::Submit {
                status,
                result_codes,
            } => {
                assert_eq!(status, 400);
                assert_eq!(
                    result_codes.unwrap()["transaction"],
                    serde_json::json!("tx_bad_seq")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            submit_error(504, "gateway timeout"),
            LedgerError::Submit {
                status: 504,
                result_codes: None
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_horizon_is_transport_error() {
        let err = ledger().account_balances(RECIPIENT).await.unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }
}
