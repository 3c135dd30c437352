// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Minimal XDR encoding for the KM token mint transaction.
//!
//! Only the shape the service submits is supported: a `Transaction` with an
//! ed25519 source, time-bound preconditions, no memo, and a single
//! `InvokeHostFunction` operation calling `mint(Address, i128)` on a contract.
//! XDR is big-endian with every item padded to a 4-byte boundary.

use sha2::{Digest, Sha256};

const ENVELOPE_TYPE_TX: u32 = 2;
const KEY_TYPE_ED25519: u32 = 0;
const PUBLIC_KEY_TYPE_ED25519: u32 = 0;
const PRECOND_TIME: u32 = 1;
const MEMO_NONE: u32 = 0;
const OP_INVOKE_HOST_FUNCTION: u32 = 24;
const HOST_FUNCTION_TYPE_INVOKE_CONTRACT: u32 = 0;
const SC_ADDRESS_TYPE_ACCOUNT: u32 = 0;
const SC_ADDRESS_TYPE_CONTRACT: u32 = 1;
const SCV_I128: u32 = 10;
const SCV_ADDRESS: u32 = 18;

const MINT_FUNCTION: &str = "mint";

/// Append-only XDR writer.
#[derive(Debug, Default)]
pub struct XdrWriter {
    buf: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Fixed-length opaque data (`opaque x[N]`).
    pub fn fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self.pad(bytes.len())
    }

    /// Variable-length opaque data or string (`opaque x<>`, `string x<>`).
    pub fn var(&mut self, bytes: &[u8]) -> &mut Self {
        self.u32(bytes.len() as u32);
        self.fixed(bytes)
    }

    /// `false` discriminant of an absent optional (`T*`).
    pub fn none(&mut self) -> &mut Self {
        self.u32(0)
    }

    fn pad(&mut self, len: usize) -> &mut Self {
        let padding = (4 - len % 4) % 4;
        self.buf.extend(std::iter::repeat(0u8).take(padding));
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// `sha256(passphrase)`, the network id mixed into every signature.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Unsigned mint transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintTransaction {
    /// Source account (service key) public key
    pub source: [u8; 32],
    /// Fee in stroops
    pub fee: u32,
    /// Source account sequence + 1
    pub sequence: i64,
    /// Upper time bound (unix seconds); the lower bound is 0
    pub max_time: u64,
    /// KM token contract id
    pub contract: [u8; 32],
    /// Recipient account public key
    pub recipient: [u8; 32],
    /// Tokens to mint
    pub amount: i128,
}

impl MintTransaction {
    /// XDR of the `Transaction` struct.
    pub fn to_xdr(&self) -> Vec<u8> {
        let mut w = XdrWriter::new();

        // sourceAccount: MuxedAccount
        w.u32(KEY_TYPE_ED25519).fixed(&self.source);
        w.u32(self.fee);
        w.i64(self.sequence);

        // cond: Preconditions (time bounds)
        w.u32(PRECOND_TIME).u64(0).u64(self.max_time);

        w.u32(MEMO_NONE);

        // operations<100>
        w.u32(1);
        w.none(); // operation source account
        w.u32(OP_INVOKE_HOST_FUNCTION);
        w.u32(HOST_FUNCTION_TYPE_INVOKE_CONTRACT);
        w.u32(SC_ADDRESS_TYPE_CONTRACT).fixed(&self.contract);
        w.var(MINT_FUNCTION.as_bytes());

        // args: (Address to, i128 amount)
        w.u32(2);
        w.u32(SCV_ADDRESS)
            .u32(SC_ADDRESS_TYPE_ACCOUNT)
            .u32(PUBLIC_KEY_TYPE_ED25519)
            .fixed(&self.recipient);
        w.u32(SCV_I128)
            .i64((self.amount >> 64) as i64)
            .u64(self.amount as u64);

        // auth: SorobanAuthorizationEntry<>
        w.u32(0);

        // ext
        w.u32(0);

        w.into_bytes()
    }

    /// Hash that gets signed, which is also the transaction hash.
    pub fn hash(&self, network_id: &[u8; 32]) -> [u8; 32] {
        let mut w = XdrWriter::new();
        w.fixed(network_id);
        w.u32(ENVELOPE_TYPE_TX);
        let mut payload = w.into_bytes();
        payload.extend_from_slice(&self.to_xdr());
        Sha256::digest(&payload).into()
    }

    /// XDR of the `TransactionEnvelope` carrying one decorated signature.
    pub fn envelope_xdr(&self, hint: [u8; 4], signature: &[u8; 64]) -> Vec<u8> {
        let mut w = XdrWriter::new();
        w.u32(ENVELOPE_TYPE_TX);
        let mut envelope = w.into_bytes();
        envelope.extend_from_slice(&self.to_xdr());

        let mut w = XdrWriter::new();
        w.u32(1).fixed(&hint).var(signature);
        envelope.extend_from_slice(&w.into_bytes());
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TESTNET_PASSPHRASE;

    fn sample() -> MintTransaction {
        MintTransaction {
            source: [1u8; 32],
            fee: 100_000,
            sequence: 42,
            max_time: 1_700_000_030,
            contract: [2u8; 32],
            recipient: [7u8; 32],
            amount: 5,
        }
    }

    #[test]
    fn test_writer_pads_to_four_bytes() {
        let mut w = XdrWriter::new();
        w.var(b"mint").var(b"abcde");
        assert_eq!(
            w.into_bytes(),
            vec![
                0, 0, 0, 4, b'm', b'i', b'n', b't', //
                0, 0, 0, 5, b'a', b'b', b'c', b'd', b'e', 0, 0, 0,
            ]
        );
    }

    #[test]
    fn test_transaction_layout() {
        let xdr = sample().to_xdr();
        assert_eq!(xdr.len(), 208);
        // fee follows the 36-byte muxed source
        assert_eq!(&xdr[36..40], &100_000u32.to_be_bytes());
        assert_eq!(&xdr[40..48], &42i64.to_be_bytes());
        // the last 24 bytes: i128 (hi, lo), empty auth, ext v0
        let tail = &xdr[xdr.len() - 24..];
        assert_eq!(&tail[..4], &SCV_I128.to_be_bytes());
        assert_eq!(&tail[4..12], &0i64.to_be_bytes());
        assert_eq!(&tail[12..20], &5u64.to_be_bytes());
        assert_eq!(&tail[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_negative_i128_sign_extends() {
        let tx = MintTransaction {
            amount: -1,
            ..sample()
        };
        let xdr = tx.to_xdr();
        let tail = &xdr[xdr.len() - 20..xdr.len() - 8];
        assert_eq!(tail, &[0xffu8; 12]);
    }

    #[test]
    fn test_testnet_network_id() {
        assert_eq!(
            hex::encode(network_id(TESTNET_PASSPHRASE)),
            "cee0302d59844d32bdca915c8203dd44b33fbb7edc19051ea37abedf28ecd472"
        );
    }

    /// Computed independently from the XDR definitions for `sample()`.
    const SAMPLE_HASH: &str = "9de7773a85853f3de02021a868285fa23483234f64c30c848326e86963ff9649";

    #[test]
    fn test_hash_matches_reference() {
        let hash = sample().hash(&network_id(TESTNET_PASSPHRASE));
        assert_eq!(hex::encode(hash), SAMPLE_HASH);
    }

    #[test]
    fn test_envelope_wraps_transaction_and_signature() {
        let tx = sample();
        let envelope = tx.envelope_xdr([9, 9, 9, 9], &[3u8; 64]);
        assert_eq!(&envelope[..4], &ENVELOPE_TYPE_TX.to_be_bytes());
        assert_eq!(&envelope[4..212], tx.to_xdr().as_slice());
        assert_eq!(&envelope[212..216], &1u32.to_be_bytes());
        assert_eq!(&envelope[216..220], &[9, 9, 9, 9]);
        assert_eq!(&envelope[220..224], &64u32.to_be_bytes());
        assert_eq!(envelope.len(), 224 + 64);
    }

}
