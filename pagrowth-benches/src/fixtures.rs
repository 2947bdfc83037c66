//! Pre-configured simulations for benchmarks.
//!
//! Each model gets fixed representative parameters: `delta = 0` for the
//! Hofstad models, `p = 0.5` for the hybrid and the inverse-log decay for
//! the edge-step function model.

use pagrowth_core::{DecayFunction, ModelKind, MultiGraph, SimulationBuilder};

use crate::{error::BenchSetupError, params::GrowthBenchParams};

/// Every model, in benchmark order.
pub const MODELS: [ModelKind; 4] = [
    ModelKind::HofstadA,
    ModelKind::HofstadB,
    ModelKind::EdgeVertexHybrid,
    ModelKind::EdgeStepFunction,
];

/// Builder for `params` seeded with `seed`.
#[must_use]
pub fn builder_for(params: &GrowthBenchParams, seed: u64) -> SimulationBuilder {
    let builder = SimulationBuilder::new(params.model)
        .with_m(params.m)
        .with_t_stop(params.model.seed_timestep().saturating_add(params.steps))
        .with_seed(seed);
    match params.model {
        ModelKind::HofstadA | ModelKind::HofstadB => builder.with_delta(0.0),
        ModelKind::EdgeVertexHybrid => builder.with_p(0.5),
        ModelKind::EdgeStepFunction => builder.with_edge_step_fn(DecayFunction::InverseLog),
    }
}

/// Grows a graph for `params` to completion.
///
/// # Errors
/// Propagates configuration and simulation failures.
pub fn grown_graph(params: &GrowthBenchParams, seed: u64) -> Result<MultiGraph, BenchSetupError> {
    Ok(builder_for(params, seed).build()?.run(None)?)
}
