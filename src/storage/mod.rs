//! Storage module for the in-memory block index

pub mod index;

pub use index::{Ancestors, BlockId, BlockIndex, IndexEntry, IndexError};
