//! Checkpoint Manager
//!
//! Validates candidate blocks against the active checkpoint table and
//! resolves the deepest checkpoint present in a local block index.

use crate::checkpoint::{CheckpointConfig, CheckpointTable, Network};
use crate::crypto::Hash256;
use crate::storage::{BlockIndex, IndexEntry};

// =============================================================================
// Checkpoint Result
// =============================================================================

/// Result of checkpoint verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointResult {
    /// Block matches the checkpoint
    Match,
    /// Block doesn't match the checkpoint
    Mismatch { expected: Hash256, got: Hash256 },
    /// No checkpoint at this height
    NoCheckpoint,
}

impl CheckpointResult {
    pub fn is_valid(&self) -> bool {
        matches!(
            self,
            CheckpointResult::Match | CheckpointResult::NoCheckpoint
        )
    }
}

// =============================================================================
// Checkpoint Manager
// =============================================================================

/// Checkpoint checks for one network.
///
/// Immutable after construction; every query recomputes from its inputs.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    table: CheckpointTable,
    config: CheckpointConfig,
}

impl CheckpointManager {
    pub fn new(config: CheckpointConfig) -> Self {
        Self {
            table: CheckpointTable::for_network(config.network),
            config,
        }
    }

    /// Manager for a network with the default span
    pub fn for_network(network: Network) -> Self {
        Self::new(CheckpointConfig {
            network,
            ..Default::default()
        })
    }

    /// Manager over a custom table
    pub fn with_table(table: CheckpointTable, config: CheckpointConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &CheckpointTable {
        &self.table
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn span(&self) -> u64 {
        self.config.span
    }

    /// Compare a block against the checkpoint at its height
    pub fn verify_checkpoint(&self, height: u64, hash: &Hash256) -> CheckpointResult {
        match self.table.lookup(height) {
            Some(expected) if expected == *hash => CheckpointResult::Match,
            Some(expected) => CheckpointResult::Mismatch {
                expected,
                got: *hash,
            },
            None => CheckpointResult::NoCheckpoint,
        }
    }

    /// False if `hash` contradicts the checkpoint at `height`.
    ///
    /// A false result means the candidate must be rejected outright.
    pub fn check_hardened(&self, height: u64, hash: &Hash256) -> bool {
        let result = self.verify_checkpoint(height, hash);
        if let CheckpointResult::Mismatch { expected, got } = &result {
            log::warn!(
                "Block {} at height {} contradicts checkpoint {}",
                got,
                height,
                expected
            );
        }
        result.is_valid()
    }

    /// Chain length implied by the deepest checkpoint; advisory only
    pub fn total_blocks_estimate(&self) -> u64 {
        self.table.highest().map_or(0, |cp| cp.height)
    }

    /// Fraction of the estimated chain reached at `current_height`, capped at 1.0
    pub fn sync_progress(&self, current_height: u64) -> f64 {
        let estimate = self.total_blocks_estimate();
        if estimate == 0 {
            return 1.0;
        }
        (current_height as f64 / estimate as f64).min(1.0)
    }

    /// Deepest checkpoint whose block is present in `index`.
    ///
    /// Works for the full-block index and the header index alike.
    pub fn last_checkpoint<'a>(&self, index: &'a BlockIndex) -> Option<&'a IndexEntry> {
        self.table
            .iter()
            .rev()
            .find_map(|cp| index.find(&cp.hash))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::{Checkpoint, MAINNET_CHECKPOINTS};
    use crate::crypto::block_hash;

    fn hash(byte: u8) -> Hash256 {
        Hash256::new([byte; 32])
    }

    fn manager_with(checkpoints: Vec<Checkpoint>) -> CheckpointManager {
        let table = CheckpointTable::from_checkpoints(checkpoints).unwrap();
        CheckpointManager::with_table(table, CheckpointConfig::default())
    }

    #[test]
    fn test_checkpoint_verification() {
        let manager = manager_with(vec![
            Checkpoint::new(100, hash(1)),
            Checkpoint::new(200, hash(2)),
        ]);

        assert_eq!(
            manager.verify_checkpoint(100, &hash(1)),
            CheckpointResult::Match
        );
        assert_eq!(
            manager.verify_checkpoint(100, &hash(9)),
            CheckpointResult::Mismatch {
                expected: hash(1),
                got: hash(9)
            }
        );
        assert_eq!(
            manager.verify_checkpoint(150, &hash(9)),
            CheckpointResult::NoCheckpoint
        );
    }

    #[test]
    fn test_check_hardened_mainnet() {
        let manager = CheckpointManager::for_network(Network::Main);
        let h500 = MAINNET_CHECKPOINTS
            .iter()
            .find(|cp| cp.height == 500)
            .unwrap()
            .hash;

        assert!(manager.check_hardened(500, &h500));
        assert!(!manager.check_hardened(500, &hash(7)));
        assert!(manager.check_hardened(501, &hash(7)));
        assert!(manager.check_hardened(501, &h500));
    }

    #[test]
    fn test_check_hardened_every_mainnet_checkpoint() {
        let manager = CheckpointManager::for_network(Network::Main);
        for cp in MAINNET_CHECKPOINTS {
            assert!(manager.check_hardened(cp.height, &cp.hash));
            assert!(!manager.check_hardened(cp.height, &Hash256::ZERO));
        }
    }

    #[test]
    fn test_testnet_never_hardened() {
        let manager = CheckpointManager::for_network(Network::Test);
        for cp in MAINNET_CHECKPOINTS {
            assert!(manager.check_hardened(cp.height, &Hash256::ZERO));
            assert!(manager.check_hardened(cp.height, &cp.hash));
        }
        assert!(manager.check_hardened(u64::MAX, &hash(3)));
    }

    #[test]
    fn test_total_blocks_estimate() {
        assert_eq!(
            CheckpointManager::for_network(Network::Main).total_blocks_estimate(),
            1300
        );
        assert_eq!(
            CheckpointManager::for_network(Network::Test).total_blocks_estimate(),
            0
        );

        let manager = manager_with(vec![
            Checkpoint::new(500, hash(2)),
            Checkpoint::new(0, hash(1)),
            Checkpoint::new(200, hash(3)),
        ]);
        assert_eq!(manager.total_blocks_estimate(), 500);
    }

    #[test]
    fn test_sync_progress() {
        let manager = CheckpointManager::for_network(Network::Main);
        assert_eq!(manager.sync_progress(0), 0.0);
        assert_eq!(manager.sync_progress(650), 0.5);
        assert_eq!(manager.sync_progress(5000), 1.0);

        let testnet = CheckpointManager::for_network(Network::Test);
        assert_eq!(testnet.sync_progress(0), 1.0);
    }

    #[test]
    fn test_last_checkpoint_picks_deepest_present() {
        let mut index = BlockIndex::new();
        let genesis = block_hash(&Hash256::ZERO, 0);
        index.insert_genesis(genesis).unwrap();
        let mut hashes = vec![genesis];
        for height in 1..=30 {
            let prev = hashes[height as usize - 1];
            let next = block_hash(&prev, height);
            index.insert(next, &prev).unwrap();
            hashes.push(next);
        }

        let manager = manager_with(vec![
            Checkpoint::new(0, hashes[0]),
            Checkpoint::new(10, hashes[10]),
            Checkpoint::new(20, hashes[20]),
            Checkpoint::new(40, hash(4)),
        ]);

        let found = manager.last_checkpoint(&index).unwrap();
        assert_eq!(found.height, 20);
        assert_eq!(found.hash, hashes[20]);
    }

    #[test]
    fn test_last_checkpoint_absent() {
        let mut index = BlockIndex::new();
        index.insert_genesis(hash(8)).unwrap();

        let manager = manager_with(vec![Checkpoint::new(0, hash(1))]);
        assert!(manager.last_checkpoint(&index).is_none());
        assert!(manager.last_checkpoint(&BlockIndex::new()).is_none());

        let testnet = CheckpointManager::for_network(Network::Test);
        assert!(testnet.last_checkpoint(&index).is_none());
    }
}
