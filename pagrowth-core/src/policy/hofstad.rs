//! Hofstad preferential-attachment models (a) and (b).

use crate::{
    Result, SimulationError,
    distribution::AttachmentDistribution,
    error::GraphError,
    graph::MultiGraph,
};

use super::{AttachmentPolicy, DrawContext, ModelKind, existing_vertex_distribution};

fn validate(m: u32, delta: f64) -> Result<()> {
    if m == 0 {
        return Err(SimulationError::invalid_parameter(
            "m",
            "at least one edge must be added per timestep",
        ));
    }
    if !delta.is_finite() {
        return Err(SimulationError::invalid_parameter(
            "delta",
            format!("must be finite (got {delta})"),
        ));
    }
    if delta < -f64::from(m) {
        return Err(SimulationError::invalid_parameter(
            "delta",
            format!("must be at least -m = -{m} (got {delta})"),
        ));
    }
    Ok(())
}

/// Hofstad model (a): a single self-looped seed vertex, self-loops allowed.
///
/// During step `t` the new vertex `v` draws its `m` targets one at a time.
/// Before the draw that follows `i` placed edges, an existing vertex `n` has
/// weight `degree(n) + delta`, the new vertex has weight
/// `m + delta + degree(v)`, and both are normalised by
/// `t(2m + delta) + m + delta + 2i`.
///
/// # Examples
/// ```
/// use pagrowth_core::{AttachmentPolicy, HofstadA};
///
/// let policy = HofstadA::new(2, 0.5)?;
/// assert_eq!(policy.seed_timestep(), 1);
/// assert_eq!(policy.seed_graph()?.self_loop_count(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HofstadA {
    m: u32,
    delta: f64,
}

impl HofstadA {
    /// Validates the parameters and builds the policy.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when `m == 0` or
    /// `delta < -m`.
    pub fn new(m: u32, delta: f64) -> Result<Self> {
        validate(m, delta)?;
        Ok(Self { m, delta })
    }

    /// Affine attachment parameter.
    #[must_use]
    #[rustfmt::skip]
    pub const fn delta(&self) -> f64 { self.delta }
}

impl AttachmentPolicy for HofstadA {
    fn model(&self) -> ModelKind {
        ModelKind::HofstadA
    }

    fn m(&self) -> u32 {
        self.m
    }

    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError> {
        MultiGraph::single_vertex_with_loops(self.m)
    }

    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution {
        let m = f64::from(self.m);
        let placed = f64::from(context.placed);
        let denominator =
            t as f64 * (2.0 * m + self.delta) + m + self.delta + 2.0 * placed;
        let new_vertex = context.new_vertex;
        AttachmentDistribution::from_weights(
            graph.degrees().map(|(vertex, degree)| {
                let weight = if Some(vertex) == new_vertex {
                    m + self.delta + degree as f64
                } else {
                    degree as f64 + self.delta
                };
                (vertex, weight)
            }),
            denominator,
        )
    }
}

/// Hofstad model (b): two seed vertices joined by `m` parallel edge-pairs;
/// the new vertex never attaches to itself.
///
/// Before the draw that follows `i` placed edges, an existing vertex `n` has
/// probability `(degree(n) + delta) / (t(2m + delta) + i)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HofstadB {
    m: u32,
    delta: f64,
}

impl HofstadB {
    /// Validates the parameters and builds the policy.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when `m == 0` or
    /// `delta < -m`.
    pub fn new(m: u32, delta: f64) -> Result<Self> {
        validate(m, delta)?;
        Ok(Self { m, delta })
    }

    /// Affine attachment parameter.
    #[must_use]
    #[rustfmt::skip]
    pub const fn delta(&self) -> f64 { self.delta }
}

impl AttachmentPolicy for HofstadB {
    fn model(&self) -> ModelKind {
        ModelKind::HofstadB
    }

    fn m(&self) -> u32 {
        self.m
    }

    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError> {
        MultiGraph::vertex_pair_with_parallel_edges(self.m)
    }

    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution {
        let denominator =
            t as f64 * (2.0 * f64::from(self.m) + self.delta) + f64::from(context.placed);
        existing_vertex_distribution(graph, context.new_vertex, self.delta, denominator)
    }
}
