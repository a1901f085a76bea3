//! Command-line interface

pub mod commands;

pub use commands::{
    cmd_estimate, cmd_list, cmd_simulate, cmd_verify, simulate_chain, simulation_report, AppState,
    CliResult, HeightCheck, SimulationReport,
};
