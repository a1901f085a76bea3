//! Block Index
//!
//! Arena of block-index entries forming the ancestry chain:
//! - Entries are appended, never removed or moved
//! - Predecessors are stored as arena ids, not pointers
//! - Lookup by hash or by id

use crate::crypto::Hash256;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Block index errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Duplicate block: {0}")]
    DuplicateBlock(Hash256),
    #[error("Unknown parent {parent} for block {hash}")]
    UnknownParent { hash: Hash256, parent: Hash256 },
    #[error("Genesis already present: {0}")]
    GenesisExists(Hash256),
}

// =============================================================================
// Block Index Entry
// =============================================================================

/// Stable identifier of an entry in a [`BlockIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A block known to the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Block hash
    pub hash: Hash256,
    /// Block height (genesis = 0)
    pub height: u64,
    /// Immediate predecessor, `None` only for the root
    pub prev: Option<BlockId>,
}

// =============================================================================
// Block Index
// =============================================================================

/// Append-only arena of block-index entries.
///
/// The same type backs both the full-block index and the header-only index,
/// so every ancestry walk goes through one code path.
#[derive(Debug, Default, Clone)]
pub struct BlockIndex {
    entries: Vec<IndexEntry>,
    by_hash: HashMap<Hash256, BlockId>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index holding only the root block
    pub fn with_genesis(hash: Hash256) -> Self {
        let mut index = Self::new();
        index.push(IndexEntry {
            hash,
            height: 0,
            prev: None,
        });
        index
    }

    /// Id of the root block
    pub fn root_id(&self) -> Option<BlockId> {
        (!self.entries.is_empty()).then_some(BlockId(0))
    }

    /// Insert the root of the chain
    pub fn insert_genesis(&mut self, hash: Hash256) -> Result<BlockId, IndexError> {
        if let Some(root) = self.entries.first() {
            return Err(IndexError::GenesisExists(root.hash));
        }
        Ok(self.push(IndexEntry {
            hash,
            height: 0,
            prev: None,
        }))
    }

    /// Insert a block on top of a known parent
    pub fn insert(&mut self, hash: Hash256, prev_hash: &Hash256) -> Result<BlockId, IndexError> {
        if self.by_hash.contains_key(&hash) {
            return Err(IndexError::DuplicateBlock(hash));
        }
        let parent_id = self
            .id_of(prev_hash)
            .ok_or(IndexError::UnknownParent {
                hash,
                parent: *prev_hash,
            })?;
        let height = self.entries[parent_id.0].height + 1;

        Ok(self.push(IndexEntry {
            hash,
            height,
            prev: Some(parent_id),
        }))
    }

    fn push(&mut self, entry: IndexEntry) -> BlockId {
        let id = BlockId(self.entries.len());
        self.by_hash.insert(entry.hash, id);
        self.entries.push(entry);
        id
    }

    /// Get entry by id
    pub fn get(&self, id: BlockId) -> Option<&IndexEntry> {
        self.entries.get(id.0)
    }

    /// Get entry by hash
    pub fn find(&self, hash: &Hash256) -> Option<&IndexEntry> {
        self.id_of(hash).and_then(|id| self.get(id))
    }

    /// Get the id of a block by hash
    pub fn id_of(&self, hash: &Hash256) -> Option<BlockId> {
        self.by_hash.get(hash).copied()
    }

    /// Get the immediate predecessor of an entry
    pub fn predecessor(&self, entry: &IndexEntry) -> Option<&IndexEntry> {
        entry.prev.and_then(|id| self.get(id))
    }

    /// Iterate from `id` back to the root, `id` included
    pub fn ancestors(&self, id: BlockId) -> Ancestors<'_> {
        Ancestors {
            index: self,
            next: self.get(id),
        }
    }

    /// Check if block exists
    pub fn contains(&self, hash: &Hash256) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Get total indexed blocks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator over an entry and its ancestors
pub struct Ancestors<'a> {
    index: &'a BlockIndex,
    next: Option<&'a IndexEntry>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a IndexEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.index.predecessor(current);
        Some(current)
    }
}

// =============================================================================
// Tests
// =============================================================================
