//! Checkpoint CLI Application
//!
//! A command-line interface for inspecting checkpoint tables and the sync gate.

use chain_checkpoints::checkpoint::{CheckpointConfig, Network, CHECKPOINT_SPAN};
use chain_checkpoints::cli::{self, AppState};
use chain_checkpoints::core::NodeMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "checkpoints")]
#[command(version = "0.1.0")]
#[command(about = "Blockchain checkpoint and sync-gate inspector", long_about = None)]
struct Cli {
    /// Use the test network (no checkpoints)
    #[arg(long)]
    testnet: bool,

    /// Run as a thin (headers-only) node
    #[arg(long)]
    thin: bool,

    /// Blocks the sync checkpoint trails the best tip
    #[arg(long, default_value_t = CHECKPOINT_SPAN)]
    span: u64,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the active checkpoints
    List,

    /// Show the chain length estimate
    Estimate,

    /// Verify a block hash against the checkpoint at its height
    Verify {
        /// Block height
        #[arg(long)]
        height: u64,

        /// Block hash (hex)
        #[arg(long)]
        hash: String,
    },

    /// Build a synthetic chain and report the sync checkpoint
    Simulate {
        /// Number of full blocks above genesis
        #[arg(short, long)]
        blocks: u64,

        /// Number of headers above genesis (defaults to --blocks)
        #[arg(long)]
        headers: Option<u64>,

        /// Heights to run through the sync gate
        #[arg(short, long, num_args = 1..)]
        check: Vec<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = CheckpointConfig {
        network: if cli.testnet {
            Network::Test
        } else {
            Network::Main
        },
        span: cli.span,
    };
    let mode = if cli.thin {
        NodeMode::Thin
    } else {
        NodeMode::Full
    };
    let state = AppState::new(config, mode, cli.json);

    match cli.command {
        Commands::List => {
            cli::cmd_list(&state)?;
        }

        Commands::Estimate => {
            cli::cmd_estimate(&state)?;
        }

        Commands::Verify { height, hash } => {
            if !cli::cmd_verify(&state, height, &hash)? {
                std::process::exit(1);
            }
        }

        Commands::Simulate {
            blocks,
            headers,
            check,
        } => {
            cli::cmd_simulate(&state, blocks, headers, &check)?;
        }
    }

    Ok(())
}
