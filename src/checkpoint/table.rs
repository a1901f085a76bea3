//! Checkpoint Table
//!
//! Compiled-in checkpoints per network:
//! - Mainnet carries the curated list of known-good blocks
//! - Testnet has no checkpoints, so no hardening applies there
//!
//! What makes a good checkpoint block: it is surrounded by blocks with
//! reasonable timestamps (none before it with a later timestamp, none after
//! it with an earlier one) and contains no strange transactions.

use crate::checkpoint::CheckpointError;
use crate::crypto::Hash256;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// Checkpoint Entry
// =============================================================================

/// A checkpoint representing a known-good block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Block height
    pub height: u64,
    /// Block hash
    pub hash: Hash256,
}

impl Checkpoint {
    pub const fn new(height: u64, hash: Hash256) -> Self {
        Self { height, hash }
    }

    const fn literal(height: u64, hash: &str) -> Self {
        Self::new(height, Hash256::from_hex_literal(hash))
    }
}

/// Mainnet checkpoints, ordered by height
pub static MAINNET_CHECKPOINTS: &[Checkpoint] = &[
    Checkpoint::literal(0, "0x00000eca234f07edc98aaf3f2a7b7478dc58992a9cd439323d099c6a590ca2bb"),
    Checkpoint::literal(1, "0x00000acaf72cf1995b9185a52672453d8f81bb658a50b963e150d07352ab724c"),
    Checkpoint::literal(5, "0x00000b6fc95ba794bdef55b8f3ad49f26fc5388a6009dd4d24c2f80e4aa0a633"),
    Checkpoint::literal(10, "0x000005e4b1741c8a1d519677b6e29f187c76c506c5a625a0524d713b94253a3d"),
    Checkpoint::literal(20, "0x00000862863e9d752b6746598f8c4271c281d0badbef77544157953ac0bd31f7"),
    Checkpoint::literal(50, "0x0000054abd4a74494fde15549aecbed0e0aac75272b7b0cb407e404482bf6022"),
    Checkpoint::literal(100, "0x000002363147d6e203051362970fca038f73f1d2c023e8a10844e77386979810"),
    Checkpoint::literal(200, "0x0000000886f478b5df5e2d54036f150f9599b3fc4aa56c68867a1ac8d87cfff3"),
    Checkpoint::literal(500, "0x000008dabcccb7df4d991a9f764bffa65735740f0fce1e933c5b59b7f9195fd8"),
    Checkpoint::literal(1000, "0x000005527bcc13f4c8ea2a80d6c25b9a0c70b24cc8a7af722c8d8dba5bcf6bef"),
    Checkpoint::literal(1200, "0x000003d4e194c6cadb4489da382f239ac806e7a755efcd8634a629aed55cfe7f"),
    Checkpoint::literal(1300, "0x00000c12473e1ac49e6ac0c5a5350f11e16f9e7fecfcc63075e30646a92beb1d"),
];

/// Testnet has no checkpoints
pub static TESTNET_CHECKPOINTS: &[Checkpoint] = &[];

// =============================================================================
// Network
// =============================================================================

/// Network the node runs on; selects the active checkpoint table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Main,
    Test,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Main => write!(f, "mainnet"),
            Network::Test => write!(f, "testnet"),
        }
    }
}

// =============================================================================
// Checkpoint Table
// =============================================================================

/// Read-only height -> hash mapping, sorted by height
#[derive(Debug, Clone)]
pub struct CheckpointTable {
    entries: Cow<'static, [Checkpoint]>,
}

impl CheckpointTable {
    /// The compiled-in table for a network
    pub fn for_network(network: Network) -> Self {
        let entries = match network {
            Network::Main => MAINNET_CHECKPOINTS,
            Network::Test => TESTNET_CHECKPOINTS,
        };
        Self {
            entries: Cow::Borrowed(entries),
        }
    }

    /// Build a custom table (e.g. for a private test network).
    ///
    /// Heights must be unique; input order does not matter.
    pub fn from_checkpoints(mut checkpoints: Vec<Checkpoint>) -> Result<Self, CheckpointError> {
        checkpoints.sort_by_key(|cp| cp.height);
        if let Some(dup) = checkpoints.windows(2).find(|w| w[0].height == w[1].height) {
            return Err(CheckpointError::DuplicateHeight(dup[0].height));
        }
        Ok(Self {
            entries: Cow::Owned(checkpoints),
        })
    }

    /// Hash recorded at `height`, if any
    pub fn lookup(&self, height: u64) -> Option<Hash256> {
        self.entries
            .binary_search_by_key(&height, |cp| cp.height)
            .ok()
            .map(|i| self.entries[i].hash)
    }

    /// Deepest checkpoint
    pub fn highest(&self) -> Option<&Checkpoint> {
        self.entries.last()
    }

    /// Checkpoints in ascending height order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Checkpoint> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
