//! Chain State Management
//!
//! Defines the accessor through which the checkpoint logic reads chain state
//! (node mode, block indices, best tips), and a reference host implementation
//! that tracks a full-block index and a header-only index side by side.

use crate::checkpoint::{CheckpointError, CheckpointManager};
use crate::crypto::Hash256;
use crate::storage::{BlockId, BlockIndex, IndexEntry, IndexError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Chain state errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("Block rejected: {0}")]
    Rejected(#[from] CheckpointError),
}

/// Whether the node keeps full blocks or headers only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeMode {
    #[default]
    Full,
    Thin,
}

impl fmt::Display for NodeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeMode::Full => write!(f, "full"),
            NodeMode::Thin => write!(f, "thin"),
        }
    }
}

/// Read access to the host's chain state.
///
/// Callers hold whatever lock the host uses around tip updates for the
/// duration of a query, so one call observes one consistent snapshot.
pub trait ChainState {
    fn node_mode(&self) -> NodeMode;

    /// Index of blocks with full data
    fn block_index(&self) -> &BlockIndex;

    /// Index of headers (thin mode)
    fn header_index(&self) -> &BlockIndex;

    /// Tip of the best full chain
    fn best_block(&self) -> Option<BlockId>;

    /// Tip of the best header chain
    fn best_header(&self) -> Option<BlockId>;

    /// Entry at the best full tip
    fn best_block_entry(&self) -> Option<&IndexEntry> {
        self.best_block().and_then(|id| self.block_index().get(id))
    }

    /// Entry at the best header tip
    fn best_header_entry(&self) -> Option<&IndexEntry> {
        self.best_header().and_then(|id| self.header_index().get(id))
    }
}

/// Represents a chain tip (end of a chain branch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainTip {
    /// Hash of the tip block
    pub hash: Hash256,
    /// Height of the tip
    pub height: u64,
}

impl From<&IndexEntry> for ChainTip {
    fn from(entry: &IndexEntry) -> Self {
        Self {
            hash: entry.hash,
            height: entry.height,
        }
    }
}

/// In-memory chain state with a full-block index and a header index
#[derive(Debug, Clone)]
pub struct ChainStateManager {
    mode: NodeMode,
    block_index: BlockIndex,
    header_index: BlockIndex,
    best_block: Option<BlockId>,
    best_header: Option<BlockId>,
}

impl ChainStateManager {
    /// Create state holding only the genesis block in both indices
    pub fn new(mode: NodeMode, genesis: Hash256) -> Self {
        let block_index = BlockIndex::with_genesis(genesis);
        let header_index = BlockIndex::with_genesis(genesis);
        Self {
            mode,
            best_block: block_index.root_id(),
            best_header: header_index.root_id(),
            block_index,
            header_index,
        }
    }

    /// Add a header; advances the best header tip if it is higher
    pub fn accept_header(&mut self, hash: Hash256, prev: &Hash256) -> Result<BlockId, ChainError> {
        let id = self.header_index.insert(hash, prev)?;
        if advances(&self.header_index, self.best_header, id) {
            self.best_header = Some(id);
            log::debug!(
                "New best header {} at height {}",
                hash,
                height_of(&self.header_index, id)
            );
        }
        Ok(id)
    }

    /// Add a full block; advances the best block tip if it is higher
    pub fn connect_block(&mut self, hash: Hash256, prev: &Hash256) -> Result<BlockId, ChainError> {
        let id = self.block_index.insert(hash, prev)?;
        if advances(&self.block_index, self.best_block, id) {
            self.best_block = Some(id);
            log::debug!(
                "New best block {} at height {}",
                hash,
                height_of(&self.block_index, id)
            );
        }
        Ok(id)
    }

    /// Run checkpoint checks for a candidate, then add it to the index for
    /// the current mode.
    pub fn accept_block(
        &mut self,
        checkpoints: &CheckpointManager,
        hash: Hash256,
        prev: &Hash256,
    ) -> Result<BlockId, ChainError> {
        let index = match self.mode {
            NodeMode::Full => &self.block_index,
            NodeMode::Thin => &self.header_index,
        };
        let parent = index.find(prev).ok_or(IndexError::UnknownParent {
            hash,
            parent: *prev,
        })?;
        let height = parent.height + 1;

        checkpoints.check_candidate(height, &hash, &*self)?;

        match self.mode {
            NodeMode::Full => self.connect_block(hash, prev),
            NodeMode::Thin => self.accept_header(hash, prev),
        }
    }

    pub fn best_block_tip(&self) -> Option<ChainTip> {
        self.best_block_entry().map(ChainTip::from)
    }

    pub fn best_header_tip(&self) -> Option<ChainTip> {
        self.best_header_entry().map(ChainTip::from)
    }
}

impl ChainState for ChainStateManager {
    fn node_mode(&self) -> NodeMode {
        self.mode
    }

    fn block_index(&self) -> &BlockIndex {
        &self.block_index
    }

    fn header_index(&self) -> &BlockIndex {
        &self.header_index
    }

    fn best_block(&self) -> Option<BlockId> {
        self.best_block
    }

    fn best_header(&self) -> Option<BlockId> {
        self.best_header
    }
}

fn height_of(index: &BlockIndex, id: BlockId) -> u64 {
    index.get(id).map_or(0, |e| e.height)
}

// First-seen wins on equal height.
fn advances(index: &BlockIndex, best: Option<BlockId>, candidate: BlockId) -> bool {
    match best {
        None => true,
        Some(best) => height_of(index, candidate) > height_of(index, best),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::Network;
    use crate::crypto::block_hash;
    use std::sync::Mutex;

    /// Records (level, target) of every log line
    struct CaptureLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut records) = self.records.lock() {
                records.push((record.level(), record.target().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger {
        records: Mutex::new(Vec::new()),
    };

    fn genesis() -> Hash256 {
        block_hash(&Hash256::ZERO, 0)
    }

    /// Extend the best full chain by `count` blocks, returning every hash
    fn extend_blocks(state: &mut ChainStateManager, count: u64) -> Vec<Hash256> {
        let mut hashes = vec![genesis()];
        for height in 1..=count {
            let prev = hashes[height as usize - 1];
            let hash = block_hash(&prev, height);
            state.connect_block(hash, &prev).unwrap();
            hashes.push(hash);
        }
        hashes
    }

    #[test]
    fn test_new_state_at_genesis() {
        let state = ChainStateManager::new(NodeMode::Full, genesis());

        let tip = state.best_block_tip().unwrap();
        assert_eq!(tip.height, 0);
        assert_eq!(tip.hash, genesis());
        assert_eq!(state.best_header_tip(), Some(tip));
    }

    #[test]
    fn test_best_tips_advance_independently() {
        let mut state = ChainStateManager::new(NodeMode::Full, genesis());
        let hashes = extend_blocks(&mut state, 5);

        assert_eq!(state.best_block_tip().unwrap().height, 5);
        assert_eq!(state.best_header_tip().unwrap().height, 0);

        state.accept_header(hashes[1], &hashes[0]).unwrap();
        assert_eq!(state.best_header_tip().unwrap().height, 1);
    }

    #[test]
    fn test_tip_advances_logged_at_debug() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);

        let mut state = ChainStateManager::new(NodeMode::Full, genesis());
        let hashes = extend_blocks(&mut state, 20);
        state.accept_header(hashes[1], &hashes[0]).unwrap();

        let records = LOGGER.records.lock().unwrap();
        let chain_state_at_info = |level: &log::Level, target: &String| {
            target.ends_with("core::chain_state") && *level <= log::Level::Info
        };
        assert!(!records.iter().any(|(level, target)| chain_state_at_info(level, target)));
        assert!(records
            .iter()
            .any(|(level, target)| *level == log::Level::Debug
                && target.ends_with("core::chain_state")));
    }

    #[test]
    fn test_lower_fork_does_not_move_tip() {
        let mut state = ChainStateManager::new(NodeMode::Full, genesis());
        let hashes = extend_blocks(&mut state, 3);

        let fork = block_hash(&hashes[1], 77);
        state.connect_block(fork, &hashes[1]).unwrap();
        assert_eq!(state.best_block_tip().unwrap().hash, hashes[3]);
    }

    #[test]
    fn test_accept_block_unknown_parent() {
        let mut state = ChainStateManager::new(NodeMode::Full, genesis());
        let checkpoints = CheckpointManager::for_network(Network::Test);
        let orphan = block_hash(&Hash256::ZERO, 5);
        let missing = Hash256::new([9; 32]);

        assert!(matches!(
            state.accept_block(&checkpoints, orphan, &missing),
            Err(ChainError::Index(IndexError::UnknownParent { .. }))
        ));
    }

    #[test]
    fn test_accept_block_rejects_deep_fork() {
        let mut state = ChainStateManager::new(NodeMode::Full, genesis());
        let hashes = extend_blocks(&mut state, 600);
        let checkpoints = CheckpointManager::for_network(Network::Test);

        // Candidate at height 51, below sync checkpoint 100
        let deep = block_hash(&hashes[50], 9_999);
        assert_eq!(
            state.accept_block(&checkpoints, deep, &hashes[50]),
            Err(ChainError::Rejected(CheckpointError::BelowSyncCheckpoint {
                height: 51,
                sync_height: 100
            }))
        );

        // Candidate at height 100 is still rejected
        let boundary = block_hash(&hashes[99], 9_999);
        assert!(state.accept_block(&checkpoints, boundary, &hashes[99]).is_err());

        // Candidate at height 101 is allowed
        let shallow = block_hash(&hashes[100], 9_999);
        assert!(state.accept_block(&checkpoints, shallow, &hashes[100]).is_ok());
        assert_eq!(state.best_block_tip().unwrap().height, 600);
    }

    #[test]
    fn test_accept_block_thin_mode_uses_headers() {
        let mut state = ChainStateManager::new(NodeMode::Thin, genesis());
        let checkpoints = CheckpointManager::for_network(Network::Test);
        let next = block_hash(&genesis(), 1);

        // Full tip at genesis: the thin sync checkpoint is the root, so
        // height 1 is acceptable.
        state.accept_block(&checkpoints, next, &genesis()).unwrap();
        assert_eq!(state.best_header_tip().unwrap().height, 1);
        assert_eq!(state.best_block_tip().unwrap().height, 0);
    }
}
