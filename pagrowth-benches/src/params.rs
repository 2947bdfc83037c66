//! Benchmark parameter types.

use std::fmt;

use pagrowth_core::ModelKind;

/// Parameters for a growth benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GrowthBenchParams {
    /// Model to grow.
    pub model: ModelKind,
    /// Edges added per timestep.
    pub m: u32,
    /// Timesteps executed after the seed graph.
    pub steps: u64,
}

impl fmt::Display for GrowthBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},m={},steps={}", self.model, self.m, self.steps)
    }
}

/// Parameters for a distance benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct DistanceBenchParams {
    /// Timesteps grown before measuring.
    pub steps: u64,
    /// Pairs drawn by sampling benchmarks.
    pub samples: usize,
}

impl fmt::Display for DistanceBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "steps={},samples={}", self.steps, self.samples)
    }
}
