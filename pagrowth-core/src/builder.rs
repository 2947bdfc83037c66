//! Validated configuration surface for simulations.
//!
//! [`SimulationBuilder`] collects the model selector and its parameters,
//! checks every constraint before any step runs, and hands back a ready
//! [`Simulation`] seeded with its model's seed graph.

use rand::{SeedableRng, rngs::SmallRng};
use tracing::{instrument, warn};

use crate::{
    Result, SimulationError,
    error::AtTimestep,
    policy::{
        AttachmentPolicy, DecayFunction, EdgeStepFunction, EdgeVertexHybrid, HofstadA, HofstadB,
        ModelKind, ModelPolicy,
    },
    simulation::Simulation,
};

/// Configures and constructs [`Simulation`] instances.
///
/// `m` and `t_stop` are always required. Hofstad models take `delta`
/// (default `0`), the edge/vertex hybrid requires `p` and the edge-step
/// function model requires a [`DecayFunction`]. `t_start` defaults to the
/// model's seed timestep and must equal it when given.
///
/// # Examples
/// ```
/// use pagrowth_core::{ModelKind, SimulationBuilder, SimulationErrorCode};
///
/// let err = SimulationBuilder::new(ModelKind::EdgeVertexHybrid)
///     .with_m(2)
///     .with_t_stop(10)
///     .build()
///     .expect_err("p is required for the hybrid");
/// assert_eq!(err.code(), SimulationErrorCode::InvalidParameter);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationBuilder {
    model: ModelKind,
    m: Option<u32>,
    delta: Option<f64>,
    p: Option<f64>,
    edge_step_fn: Option<DecayFunction>,
    t_start: Option<u64>,
    t_stop: Option<u64>,
    seed: Option<u64>,
}

impl SimulationBuilder {
    /// Creates an empty configuration for `model`.
    #[must_use]
    pub const fn new(model: ModelKind) -> Self {
        Self {
            model,
            m: None,
            delta: None,
            p: None,
            edge_step_fn: None,
            t_start: None,
            t_stop: None,
            seed: None,
        }
    }

    /// Sets the number of edges added per timestep.
    #[must_use]
    pub const fn with_m(mut self, m: u32) -> Self {
        self.m = Some(m);
        self
    }

    /// Sets the affine attachment parameter of the Hofstad models.
    #[must_use]
    pub const fn with_delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Sets the vertex-step probability of the edge/vertex hybrid.
    #[must_use]
    pub const fn with_p(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    /// Sets the decay function of the edge-step function model.
    #[must_use]
    pub const fn with_edge_step_fn(mut self, function: DecayFunction) -> Self {
        self.edge_step_fn = Some(function);
        self
    }

    /// Overrides the first timestep.
    #[must_use]
    pub const fn with_t_start(mut self, t_start: u64) -> Self {
        self.t_start = Some(t_start);
        self
    }

    /// Sets the exclusive stop timestep.
    #[must_use]
    pub const fn with_t_stop(mut self, t_stop: u64) -> Self {
        self.t_stop = Some(t_stop);
        self
    }

    /// Seeds the random source; entropy is used when no seed is given.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Selected model.
    #[must_use]
    #[rustfmt::skip]
    pub const fn model(&self) -> ModelKind { self.model }

    /// Configured seed, if any.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> Option<u64> { self.seed }

    /// Validates the model parameters and builds the policy alone.
    ///
    /// Parameters that the selected model ignores are logged at `warn`.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when a required
    /// parameter is missing or out of range.
    pub fn build_policy(&self) -> Result<ModelPolicy> {
        let m = self
            .m
            .ok_or_else(|| SimulationError::invalid_parameter("m", "is required"))?;
        self.warn_ignored();
        let policy = match self.model {
            ModelKind::HofstadA => HofstadA::new(m, self.delta.unwrap_or(0.0))?.into(),
            ModelKind::HofstadB => HofstadB::new(m, self.delta.unwrap_or(0.0))?.into(),
            ModelKind::EdgeVertexHybrid => {
                let p = self.p.ok_or_else(|| {
                    SimulationError::invalid_parameter("p", "is required by edge-vertex-hybrid")
                })?;
                EdgeVertexHybrid::new(m, p)?.into()
            }
            ModelKind::EdgeStepFunction => {
                let function = self.edge_step_fn.ok_or_else(|| {
                    SimulationError::invalid_parameter(
                        "edgestep_fn",
                        "is required by edge-step-function",
                    )
                })?;
                EdgeStepFunction::new(m, function)?.into()
            }
        };
        Ok(policy)
    }

    /// Validates the configuration and constructs a [`Simulation`] over the
    /// model's seed graph.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] for any missing or
    /// out-of-range parameter, including a `t_start` that differs from the
    /// model's seed timestep.
    #[instrument(name = "builder.build", err, skip(self), fields(model = %self.model))]
    pub fn build(self) -> Result<Simulation> {
        let policy = self.build_policy()?;
        let seed_timestep = policy.seed_timestep();
        let t_start = self.t_start.unwrap_or(seed_timestep);
        if t_start != seed_timestep {
            return Err(SimulationError::invalid_parameter(
                "t_start",
                format!(
                    "{} starts from its seed graph at t={seed_timestep} (got {t_start})",
                    self.model
                ),
            ));
        }
        let t_stop = self
            .t_stop
            .ok_or_else(|| SimulationError::invalid_parameter("t_stop", "is required"))?;

        let graph = policy.seed_graph().at(t_start)?;
        let rng = self
            .seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        Simulation::new(graph, policy, t_start, t_stop, rng)
    }

    fn warn_ignored(&self) {
        let uses_delta = matches!(self.model, ModelKind::HofstadA | ModelKind::HofstadB);
        if !uses_delta && self.delta.is_some() {
            warn!(model = %self.model, parameter = "delta", "parameter ignored by model");
        }
        if self.model != ModelKind::EdgeVertexHybrid && self.p.is_some() {
            warn!(model = %self.model, parameter = "p", "parameter ignored by model");
        }
        if self.model != ModelKind::EdgeStepFunction && self.edge_step_fn.is_some() {
            warn!(model = %self.model, parameter = "edgestep_fn", "parameter ignored by model");
        }
    }
}
