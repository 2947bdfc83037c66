//! Command-line interface orchestration for pagrowth.
//!
//! `simulate` grows a graph and prints its summary, optionally streaming
//! per-step telemetry and exporting DOT; `stats` reports distance
//! statistics at a fixed timestep interval.

mod commands;
mod render;

pub use commands::{
    Cli, CliError, Command, DEFAULT_SAMPLES, DecayArg, ModelArg, ModelArgs, SimulateCommand,
    StatsCommand, Verbosity, render, run_cli,
};
pub use render::{TelemetryWriter, write_graph_summary};
