// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stellar "strkey" text encoding of 32-byte keys.
//!
//! Layout: base32 (RFC 4648 alphabet, no padding) over
//! `version byte ‖ 32-byte payload ‖ CRC16-XModem (little endian)`.
//! 35 input bytes always produce exactly 56 characters.

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const PAYLOAD_LEN: usize = 32;
const RAW_LEN: usize = 1 + PAYLOAD_LEN + 2;
const ENCODED_LEN: usize = 56;

/// Which kind of key a strkey carries. Determines the leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Ed25519 public key, `G...`
    Account,
    /// Ed25519 secret seed, `S...`
    Seed,
    /// Soroban contract id, `C...`
    Contract,
}

impl KeyKind {
    fn version_byte(self) -> u8 {
        match self {
            KeyKind::Account => 6 << 3,
            KeyKind::Seed => 18 << 3,
            KeyKind::Contract => 2 << 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrkeyError {
    #[error("strkey must be 56 characters, got {0}")]
    InvalidLength(usize),
    #[error("invalid base32 character {0:?}")]
    InvalidCharacter(char),
    #[error("unexpected key type (expected {expected:?})")]
    WrongKind { expected: KeyKind },
    #[error("checksum mismatch")]
    BadChecksum,
}

/// Encode a 32-byte key as a strkey of the given kind.
pub fn encode(kind: KeyKind, payload: &[u8; PAYLOAD_LEN]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = kind.version_byte();
    raw[1..=PAYLOAD_LEN].copy_from_slice(payload);
    let crc = crc16_xmodem(&raw[..=PAYLOAD_LEN]);
    raw[PAYLOAD_LEN + 1..].copy_from_slice(&crc.to_le_bytes());
    base32_encode(&raw)
}

/// Decode a strkey, checking its kind and checksum.
pub fn decode(kind: KeyKind, encoded: &str) -> Result<[u8; PAYLOAD_LEN], StrkeyError> {
    if encoded.len() != ENCODED_LEN {
        return Err(StrkeyError::InvalidLength(encoded.len()));
    }
    let raw = base32_decode(encoded)?;

    if raw[0] != kind.version_byte() {
        return Err(StrkeyError::WrongKind { expected: kind });
    }

    let expected = crc16_xmodem(&raw[..=PAYLOAD_LEN]);
    let actual = u16::from_le_bytes([raw[PAYLOAD_LEN + 1], raw[PAYLOAD_LEN + 2]]);
    if expected != actual {
        return Err(StrkeyError::BadChecksum);
    }

    let mut payload = [0u8; PAYLOAD_LEN];
    payload.copy_from_slice(&raw[1..=PAYLOAD_LEN]);
    Ok(payload)
}

/// Convenience check used by request validation.
pub fn is_valid_account(encoded: &str) -> bool {
    decode(KeyKind::Account, encoded).is_ok()
}

/// CRC-16/XMODEM (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn base32_encode(raw: &[u8; RAW_LEN]) -> String {
    let mut out = String::with_capacity(ENCODED_LEN);
    let mut buffer: u16 = 0;
    let mut bits = 0;
    for &byte in raw {
        buffer = (buffer << 8) | byte as u16;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    // 280 bits divide evenly into 5-bit groups, so nothing is left over.
    debug_assert_eq!(bits, 0);
    out
}

fn base32_decode(encoded: &str) -> Result<[u8; RAW_LEN], StrkeyError> {
    let mut raw = [0u8; RAW_LEN];
    let mut buffer: u16 = 0;
    let mut bits = 0;
    let mut pos = 0;
    for c in encoded.chars() {
        let value = match c {
            'A'..='Z' => c as u16 - 'A' as u16,
            '2'..='7' => c as u16 - '2' as u16 + 26,
            other => return Err(StrkeyError::InvalidCharacter(other)),
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            raw[pos] = (buffer >> bits) as u8;
            pos += 1;
        }
    }
    Ok(raw)
}
