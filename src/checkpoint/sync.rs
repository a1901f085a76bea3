//! Sync Checkpoint
//!
//! The sync checkpoint is the ancestor of the best tip found by walking back
//! until the span is exhausted. Blocks at or below it are refused, which caps
//! the depth of any reorganization the node will follow.
//!
//! Nothing here is cached: every call reads the current tips again, and a
//! result goes stale as soon as the tip moves.

use crate::checkpoint::{CheckpointError, CheckpointManager};
use crate::core::{ChainState, NodeMode};
use crate::crypto::Hash256;
use crate::storage::{BlockId, BlockIndex, IndexEntry};

/// Walk back from `tip` while a predecessor exists and the current entry is
/// still within `span` of `reference_height`.
///
/// Returns `None` only if `tip` is not in `index`.
pub fn select_sync_checkpoint(
    index: &BlockIndex,
    tip: BlockId,
    reference_height: u64,
    span: u64,
) -> Option<&IndexEntry> {
    index
        .ancestors(tip)
        .find(|e| e.prev.is_none() || e.height.saturating_add(span) <= reference_height)
}

impl CheckpointManager {
    /// Sync checkpoint on the best full chain
    pub fn auto_select_sync_checkpoint<'a, C: ChainState>(
        &self,
        chain: &'a C,
    ) -> Option<&'a IndexEntry> {
        let tip = chain.best_block()?;
        let reference_height = chain.block_index().get(tip)?.height;
        select_sync_checkpoint(chain.block_index(), tip, reference_height, self.span())
    }

    /// Sync checkpoint on the best header chain.
    ///
    /// The span is measured against the best *full* block height, not the
    /// header tip. A node with no full tip uses height 0.
    pub fn auto_select_sync_thin_checkpoint<'a, C: ChainState>(
        &self,
        chain: &'a C,
    ) -> Option<&'a IndexEntry> {
        let tip = chain.best_header()?;
        let reference_height = chain.best_block_entry().map_or(0, |e| e.height);
        select_sync_checkpoint(chain.header_index(), tip, reference_height, self.span())
    }

    /// Sync checkpoint for the chain's current node mode
    pub fn sync_checkpoint<'a, C: ChainState>(&self, chain: &'a C) -> Option<&'a IndexEntry> {
        let sync = match chain.node_mode() {
            NodeMode::Full => self.auto_select_sync_checkpoint(chain),
            NodeMode::Thin => self.auto_select_sync_thin_checkpoint(chain),
        };
        if let Some(entry) = sync {
            log::debug!(
                "Sync checkpoint ({}) {} at height {}",
                chain.node_mode(),
                entry.hash,
                entry.height
            );
        }
        sync
    }

    /// False if `height` is at or below the current sync checkpoint.
    ///
    /// An empty chain has no sync checkpoint and accepts every height.
    pub fn check_sync<C: ChainState>(&self, height: u64, chain: &C) -> bool {
        match self.sync_checkpoint(chain) {
            Some(sync) if height <= sync.height => {
                log::debug!(
                    "Rejecting height {} at or below sync checkpoint {}",
                    height,
                    sync.height
                );
                false
            }
            _ => true,
        }
    }

    /// Hardened and sync checks for one candidate block
    pub fn check_candidate<C: ChainState>(
        &self,
        height: u64,
        hash: &Hash256,
        chain: &C,
    ) -> Result<(), CheckpointError> {
        if !self.check_hardened(height, hash) {
            let expected = self.table().lookup(height).unwrap_or_default();
            return Err(CheckpointError::HardenedMismatch {
                height,
                expected,
                got: *hash,
            });
        }
        if !self.check_sync(height, chain) {
            let sync_height = self.sync_checkpoint(chain).map_or(0, |e| e.height);
            return Err(CheckpointError::BelowSyncCheckpoint {
                height,
                sync_height,
            });
        }
        Ok(())
    }
}
