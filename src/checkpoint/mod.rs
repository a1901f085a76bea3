//! Checkpoint subsystem
//!
//! This module provides:
//! - Compiled-in checkpoint tables per network
//! - Hardened checks against those tables
//! - Chain length estimation for progress display
//! - The moving sync checkpoint that bounds reorganization depth

pub mod manager;
pub mod sync;
pub mod table;

use crate::crypto::Hash256;
use thiserror::Error;

pub use manager::{CheckpointManager, CheckpointResult};
pub use sync::select_sync_checkpoint;
pub use table::{Checkpoint, CheckpointTable, Network, MAINNET_CHECKPOINTS, TESTNET_CHECKPOINTS};

/// Number of blocks the sync checkpoint trails the best tip
pub const CHECKPOINT_SPAN: u64 = 500;

/// Checkpoint errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("Duplicate checkpoint height: {0}")]
    DuplicateHeight(u64),
    #[error("Block {got} at height {height} contradicts checkpoint {expected}")]
    HardenedMismatch {
        height: u64,
        expected: Hash256,
        got: Hash256,
    },
    #[error("Block at height {height} is at or below sync checkpoint {sync_height}")]
    BelowSyncCheckpoint { height: u64, sync_height: u64 },
}

/// Checkpoint configuration
#[derive(Debug, Clone)]
pub struct CheckpointConfig {
    /// Selects the active checkpoint table
    pub network: Network,
    /// How far the sync checkpoint trails the best tip
    pub span: u64,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            network: Network::Main,
            span: CHECKPOINT_SPAN,
        }
    }
}
