//! Chain Checkpoints: checkpoint enforcement for a blockchain node
//!
//! This crate provides:
//! - Compiled-in checkpoint tables (mainnet populated, testnet empty)
//! - Hardened checks rejecting blocks that contradict a checkpoint
//! - Chain length estimation for sync progress
//! - A moving sync checkpoint that caps reorganization depth
//! - An arena block index and a chain state accessor for the host
//!
//! # Example
//!
//! ```rust
//! use chain_checkpoints::checkpoint::{CheckpointManager, Network};
//! use chain_checkpoints::core::{ChainStateManager, NodeMode};
//! use chain_checkpoints::crypto::{block_hash, Hash256};
//!
//! let checkpoints = CheckpointManager::for_network(Network::Test);
//!
//! // Build a 600-block chain
//! let genesis = block_hash(&Hash256::ZERO, 0);
//! let mut chain = ChainStateManager::new(NodeMode::Full, genesis);
//! let mut prev = genesis;
//! for height in 1..=600 {
//!     let hash = block_hash(&prev, height);
//!     chain.connect_block(hash, &prev).unwrap();
//!     prev = hash;
//! }
//!
//! // Reorganizations may not reach below height 100
//! assert!(!checkpoints.check_sync(100, &chain));
//! assert!(checkpoints.check_sync(101, &chain));
//! ```

pub mod checkpoint;
pub mod cli;
pub mod core;
pub mod crypto;
pub mod storage;

// Re-export commonly used types
pub use checkpoint::{
    Checkpoint, CheckpointConfig, CheckpointError, CheckpointManager, CheckpointResult,
    CheckpointTable, Network, CHECKPOINT_SPAN,
};
pub use core::{ChainError, ChainState, ChainStateManager, ChainTip, NodeMode};
pub use crypto::Hash256;
pub use storage::{BlockId, BlockIndex, IndexEntry};
