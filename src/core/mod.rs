//! Core chain components
//!
//! This module contains:
//! - Node mode (full blocks vs headers only)
//! - The chain state accessor read by the checkpoint logic
//! - An in-memory chain state with best-tip tracking

pub mod chain_state;

pub use chain_state::{ChainError, ChainState, ChainStateManager, ChainTip, NodeMode};
