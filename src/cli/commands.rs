//! CLI commands for the checkpoint tool
//!
//! Implements the command handlers for inspecting checkpoint tables and
//! simulating the sync gate on synthetic chains.

use crate::checkpoint::{CheckpointConfig, CheckpointManager, CheckpointResult, Network};
use crate::core::{ChainError, ChainState, ChainStateManager, ChainTip, NodeMode};
use crate::crypto::{block_hash, Hash256};
use serde::Serialize;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub checkpoints: CheckpointManager,
    pub mode: NodeMode,
    pub json: bool,
}

impl AppState {
    pub fn new(config: CheckpointConfig, mode: NodeMode, json: bool) -> Self {
        Self {
            checkpoints: CheckpointManager::new(config),
            mode,
            json,
        }
    }
}

/// Gate decision for one height in a simulation
#[derive(Debug, Clone, Serialize)]
pub struct HeightCheck {
    pub height: u64,
    pub accepted: bool,
}

/// Summary of a simulated chain
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub network: Network,
    pub mode: NodeMode,
    pub span: u64,
    pub best_block: Option<ChainTip>,
    pub best_header: Option<ChainTip>,
    pub sync_checkpoint: Option<ChainTip>,
    pub last_checkpoint: Option<ChainTip>,
    pub progress: f64,
    pub checks: Vec<HeightCheck>,
}

/// Build a chain of `blocks` full blocks and `headers` headers on one branch.
///
/// Genesis is the table's height-0 checkpoint when there is one.
pub fn simulate_chain(
    checkpoints: &CheckpointManager,
    mode: NodeMode,
    blocks: u64,
    headers: u64,
) -> Result<ChainStateManager, ChainError> {
    let genesis = checkpoints
        .table()
        .lookup(0)
        .unwrap_or_else(|| block_hash(&Hash256::ZERO, 0));
    let mut state = ChainStateManager::new(mode, genesis);

    let mut prev = genesis;
    for height in 1..=blocks.max(headers) {
        let hash = block_hash(&prev, height);
        if height <= blocks {
            state.connect_block(hash, &prev)?;
        }
        if height <= headers {
            state.accept_header(hash, &prev)?;
        }
        prev = hash;
    }
    log::info!(
        "Simulated {} blocks and {} headers on {}",
        blocks,
        headers,
        checkpoints.network()
    );
    Ok(state)
}

/// Summarize checkpoint state for a simulated chain
pub fn simulation_report(
    checkpoints: &CheckpointManager,
    state: &ChainStateManager,
    checks: &[u64],
) -> SimulationReport {
    let local_index = match state.node_mode() {
        NodeMode::Full => state.block_index(),
        NodeMode::Thin => state.header_index(),
    };
    let best_block = state.best_block_tip();
    let current_height = match state.node_mode() {
        NodeMode::Full => best_block.as_ref().map_or(0, |t| t.height),
        NodeMode::Thin => state.best_header_tip().map_or(0, |t| t.height),
    };

    SimulationReport {
        network: checkpoints.network(),
        mode: state.node_mode(),
        span: checkpoints.span(),
        best_header: state.best_header_tip(),
        best_block,
        sync_checkpoint: checkpoints.sync_checkpoint(state).map(ChainTip::from),
        last_checkpoint: checkpoints.last_checkpoint(local_index).map(ChainTip::from),
        progress: checkpoints.sync_progress(current_height),
        checks: checks
            .iter()
            .map(|&height| HeightCheck {
                height,
                accepted: checkpoints.check_sync(height, state),
            })
            .collect(),
    }
}

/// Print the active checkpoint table
pub fn cmd_list(state: &AppState) -> CliResult<()> {
    let table = state.checkpoints.table();

    if state.json {
        let entries: Vec<_> = table.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if table.is_empty() {
        println!("📭 No checkpoints for {}", state.checkpoints.network());
        return Ok(());
    }

    println!(
        "📋 {} checkpoints for {}:",
        table.len(),
        state.checkpoints.network()
    );
    for cp in table.iter() {
        println!("   {:>8}  {}", cp.height, cp.hash);
    }

    Ok(())
}

/// Print the chain length estimate
pub fn cmd_estimate(state: &AppState) -> CliResult<()> {
    let estimate = state.checkpoints.total_blocks_estimate();

    if state.json {
        println!("{}", serde_json::json!({ "total_blocks_estimate": estimate }));
    } else {
        println!(
            "📏 Estimated chain height for {}: {}",
            state.checkpoints.network(),
            estimate
        );
    }

    Ok(())
}

/// Verify a block against the checkpoint at its height.
///
/// Returns false on a mismatch.
pub fn cmd_verify(state: &AppState, height: u64, hash: &str) -> CliResult<bool> {
    let hash: Hash256 = hash.parse()?;
    let result = state.checkpoints.verify_checkpoint(height, &hash);

    if state.json {
        let (status, expected) = match &result {
            CheckpointResult::Match => ("match", None),
            CheckpointResult::Mismatch { expected, .. } => ("mismatch", Some(*expected)),
            CheckpointResult::NoCheckpoint => ("no_checkpoint", None),
        };
        println!(
            "{}",
            serde_json::json!({
                "height": height,
                "hash": hash,
                "status": status,
                "expected": expected,
            })
        );
    } else {
        match &result {
            CheckpointResult::Match => {
                println!("✅ Block {} matches checkpoint at height {}", hash, height)
            }
            CheckpointResult::Mismatch { expected, got } => {
                println!("❌ Block {} contradicts checkpoint at height {}", got, height);
                println!("   Expected: {}", expected);
            }
            CheckpointResult::NoCheckpoint => {
                println!("ℹ️  No checkpoint at height {}", height)
            }
        }
    }

    Ok(result.is_valid())
}

/// Build a synthetic chain and report the sync gate
pub fn cmd_simulate(
    state: &AppState,
    blocks: u64,
    headers: Option<u64>,
    checks: &[u64],
) -> CliResult<()> {
    let headers = headers.unwrap_or(blocks);
    let chain = simulate_chain(&state.checkpoints, state.mode, blocks, headers)?;
    let report = simulation_report(&state.checkpoints, &chain, checks);

    if state.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "🔗 Simulated {} chain on {} (span {})",
        report.mode, report.network, report.span
    );
    if let Some(tip) = &report.best_block {
        println!("   ├─ Best block: {} at height {}", tip.hash, tip.height);
    }
    if let Some(tip) = &report.best_header {
        println!("   ├─ Best header: {} at height {}", tip.hash, tip.height);
    }
    match &report.last_checkpoint {
        Some(cp) => println!("   ├─ Last checkpoint: height {}", cp.height),
        None => println!("   ├─ Last checkpoint: none"),
    }
    println!("   ├─ Progress: {:.1}%", report.progress * 100.0);
    match &report.sync_checkpoint {
        Some(sync) => println!("   └─ Sync checkpoint: {} at height {}", sync.hash, sync.height),
        None => println!("   └─ Sync checkpoint: none"),
    }

    for check in &report.checks {
        let mark = if check.accepted { "✅" } else { "❌" };
        println!("   {} height {}", mark, check.height);
    }

    Ok(())
}
