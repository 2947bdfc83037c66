//! Command-line front end for the pagrowth preferential-attachment
//! simulator.
//!
//! The binary exposes `simulate` and `stats` subcommands; this library
//! surface keeps argument parsing, command execution and logging set-up
//! testable without spawning processes.

pub mod cli;
pub mod logging;
