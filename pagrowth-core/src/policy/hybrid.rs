//! Models mixing vertex-steps and edge-steps.
//!
//! Both models attach purely by degree (no affine term). A vertex-step adds
//! one vertex whose `m` edges target existing vertices with probability
//! `degree(n) / (2mt + i)`; an edge-step draws `m` distinct endpoint pairs
//! with probability `degree(n) / (2mt + 2i)` per endpoint, where `i` counts
//! the edges already placed during the step.

use crate::{
    Result, SimulationError,
    distribution::AttachmentDistribution,
    error::GraphError,
    graph::MultiGraph,
};

use super::{
    AttachmentPolicy, DecayFunction, DrawContext, ModelKind, StepKind,
    existing_vertex_distribution,
};

fn validate_m(m: u32) -> Result<()> {
    if m == 0 {
        return Err(SimulationError::invalid_parameter(
            "m",
            "at least one edge must be added per timestep",
        ));
    }
    Ok(())
}

fn degree_distribution(graph: &MultiGraph, m: u32, t: u64, context: &DrawContext) -> AttachmentDistribution {
    let base = 2.0 * f64::from(m) * t as f64;
    let placed = f64::from(context.placed);
    match context.kind {
        StepKind::VertexStep => {
            existing_vertex_distribution(graph, context.new_vertex, 0.0, base + placed)
        }
        StepKind::EdgeStep => existing_vertex_distribution(graph, None, 0.0, base + 2.0 * placed),
    }
}

/// Each step is a vertex-step with fixed probability `p` and an edge-step
/// otherwise.
///
/// # Examples
/// ```
/// use pagrowth_core::{AttachmentPolicy, EdgeVertexHybrid};
///
/// let policy = EdgeVertexHybrid::new(1, 0.25)?;
/// assert_eq!(policy.vertex_step_probability(10), Some(0.25));
/// assert!(EdgeVertexHybrid::new(1, 1.0).is_err());
/// # Ok::<(), pagrowth_core::SimulationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeVertexHybrid {
    m: u32,
    p: f64,
}

impl EdgeVertexHybrid {
    /// Validates the parameters and builds the policy.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when `m == 0` or `p` lies
    /// outside the open interval `(0, 1)`.
    pub fn new(m: u32, p: f64) -> Result<Self> {
        validate_m(m)?;
        if !(p > 0.0 && p < 1.0) {
            return Err(SimulationError::invalid_parameter(
                "p",
                format!("must lie strictly between 0 and 1 (got {p})"),
            ));
        }
        Ok(Self { m, p })
    }

    /// Vertex-step probability.
    #[must_use]
    #[rustfmt::skip]
    pub const fn p(&self) -> f64 { self.p }
}

impl AttachmentPolicy for EdgeVertexHybrid {
    fn model(&self) -> ModelKind {
        ModelKind::EdgeVertexHybrid
    }

    fn m(&self) -> u32 {
        self.m
    }

    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError> {
        MultiGraph::vertex_pair_with_parallel_edges(self.m)
    }

    fn vertex_step_probability(&self, _t: u64) -> Option<f64> {
        Some(self.p)
    }

    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution {
        degree_distribution(graph, self.m, t, context)
    }
}

/// Like [`EdgeVertexHybrid`], but the vertex-step probability at `t` is
/// given by a [`DecayFunction`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStepFunction {
    m: u32,
    function: DecayFunction,
}

impl EdgeStepFunction {
    /// Validates the parameters and builds the policy.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when `m == 0`.
    pub fn new(m: u32, function: DecayFunction) -> Result<Self> {
        validate_m(m)?;
        Ok(Self { m, function })
    }

    /// Decay function driving the vertex-step probability.
    #[must_use]
    #[rustfmt::skip]
    pub const fn function(&self) -> DecayFunction { self.function }
}

impl AttachmentPolicy for EdgeStepFunction {
    fn model(&self) -> ModelKind {
        ModelKind::EdgeStepFunction
    }

    fn m(&self) -> u32 {
        self.m
    }

    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError> {
        MultiGraph::vertex_pair_with_parallel_edges(self.m)
    }

    fn vertex_step_probability(&self, t: u64) -> Option<f64> {
        Some(self.function.vertex_step_probability(t))
    }

    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution {
        degree_distribution(graph, self.m, t, context)
    }
}
