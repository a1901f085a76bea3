//! Block hash type and hashing helpers
//!
//! Provides the fixed-width 256-bit identifier used for checkpoints and
//! block-index entries, plus the SHA-256 helpers used to derive block hashes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hash width in bytes
pub const HASH_SIZE: usize = 32;

/// Errors produced when parsing a hash from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashParseError {
    #[error("Invalid hash length: expected 64 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// A 256-bit block identifier
///
/// Bytes are kept in the order they are written, so `to_string()` gives back
/// exactly the hex that was parsed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256([u8; HASH_SIZE]);

impl Hash256 {
    /// The all-zero hash
    pub const ZERO: Hash256 = Hash256([0u8; HASH_SIZE]);

    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a hex literal at compile time.
    ///
    /// Accepts an optional `0x` prefix. Panics on malformed input, which
    /// becomes a build error when used in a `const` or `static`.
    pub const fn from_hex_literal(s: &str) -> Self {
        let bytes = s.as_bytes();
        let start = if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X')
        {
            2
        } else {
            0
        };
        assert!(
            bytes.len() - start == HASH_SIZE * 2,
            "hash literal must have 64 hex digits"
        );

        let mut out = [0u8; HASH_SIZE];
        let mut i = 0;
        while i < HASH_SIZE {
            let hi = hex_nibble(bytes[start + 2 * i]);
            let lo = hex_nibble(bytes[start + 2 * i + 1]);
            out[i] = (hi << 4) | lo;
            i += 1;
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in hash literal"),
    }
}

impl FromStr for Hash256 {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != HASH_SIZE * 2 {
            return Err(HashParseError::InvalidLength(digits.len()));
        }
        let mut out = [0u8; HASH_SIZE];
        hex::decode_to_slice(digits, &mut out)?;
        Ok(Self(out))
    }
}

impl From<[u8; HASH_SIZE]> for Hash256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes double SHA-256 (SHA-256 of SHA-256)
pub fn double_sha256(data: &[u8]) -> Hash256 {
    Hash256(sha256(&sha256(data)))
}

/// Derive a block hash from its parent hash and height.
///
/// Used to build synthetic chains for simulation and tests.
pub fn block_hash(prev: &Hash256, height: u64) -> Hash256 {
    let mut data = Vec::with_capacity(HASH_SIZE + 8);
    data.extend_from_slice(prev.as_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    double_sha256(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS: &str = "00000eca234f07edc98aaf3f2a7b7478dc58992a9cd439323d099c6a590ca2bb";

    #[test]
    fn test_sha256() {
        assert_eq!(
            hex::encode(sha256(b"hello world")),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_literal_matches_runtime_parse() {
        const LITERAL: Hash256 = Hash256::from_hex_literal(
            "0x00000eca234f07edc98aaf3f2a7b7478dc58992a9cd439323d099c6a590ca2bb",
        );
        let parsed: Hash256 = GENESIS.parse().unwrap();
        assert_eq!(LITERAL, parsed);
        assert_eq!(parsed.to_string(), GENESIS);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abcd".parse::<Hash256>(),
            Err(HashParseError::InvalidLength(4))
        );
        let bad = "zz".repeat(32);
        assert!(matches!(
            bad.parse::<Hash256>(),
            Err(HashParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_serde_hex_string() {
        let hash: Hash256 = GENESIS.parse().unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", GENESIS));
        let back: Hash256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_block_hash_depends_on_parent_and_height() {
        let a = block_hash(&Hash256::ZERO, 1);
        let b = block_hash(&Hash256::ZERO, 2);
        let c = block_hash(&a, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, block_hash(&Hash256::ZERO, 1));
    }
}
