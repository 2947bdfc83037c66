//! Benchmark setup error type.
//!
//! Lets setup functions propagate core failures with `?` instead of
//! `.expect()`.

use pagrowth_core::{AnalyticsError, SimulationError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Building or running a simulation failed.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
    /// A distance computation failed.
    #[error("distance analytics failed: {0}")]
    Analytics(#[from] AnalyticsError),
}
