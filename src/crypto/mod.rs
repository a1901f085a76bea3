//! Cryptographic utilities
//!
//! This module provides:
//! - The 256-bit block hash type
//! - SHA-256 hashing

pub mod hash;

pub use hash::{block_hash, double_sha256, sha256, Hash256, HashParseError, HASH_SIZE};
