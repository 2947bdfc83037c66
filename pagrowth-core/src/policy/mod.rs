//! Attachment-rule policies for the supported growth models.
//!
//! A policy owns the model parameters and knows how to seed the graph,
//! decide the kind of each step, build the attachment distribution for the
//! next draw and apply a whole step to the graph.
//!
//! # Degree-sum bookkeeping
//!
//! Every completed timestep of every model adds exactly `m` edges, so the
//! degree sum at the start of step `t` is `2mt` once the seed graph matches
//! its natural timestep. Policies derive their normalising denominators from
//! that closed form plus the number of edges already placed during the
//! current step, never from a degree rescan.
//!
//! # Random draws per step
//!
//! - Hofstad-A and Hofstad-B: `m` single-vertex sampler draws.
//! - Edge/vertex hybrid and edge-step function: one Bernoulli draw, then
//!   either `m` single-vertex draws (vertex-step) or `m` distinct pair draws
//!   (edge-step; two samples per pair plus one per rejected duplicate).

mod decay;
mod hofstad;
mod hybrid;

use std::fmt;

use rand::Rng;

use crate::{
    Result,
    distribution::AttachmentDistribution,
    error::{AtTimestep, GraphError},
    graph::{MultiGraph, VertexId},
    sampler::{SampleCount, sample_from},
    simulation::telemetry::{DrawRecord, StepRecord},
};

pub use self::{
    decay::DecayFunction,
    hofstad::{HofstadA, HofstadB},
    hybrid::{EdgeStepFunction, EdgeVertexHybrid},
};

/// Growth models supported by the simulator.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ModelKind {
    /// Hofstad model (a): self-loops allowed, affine parameter `delta`.
    HofstadA,
    /// Hofstad model (b): no self-loops, affine parameter `delta`.
    HofstadB,
    /// Bernoulli-gated mix of vertex-steps and edge-steps.
    EdgeVertexHybrid,
    /// Vertex-step probability given by a decaying function of `t`.
    EdgeStepFunction,
}

impl ModelKind {
    /// Returns the stable kebab-case name of the model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HofstadA => "hofstad-a",
            Self::HofstadB => "hofstad-b",
            Self::EdgeVertexHybrid => "edge-vertex-hybrid",
            Self::EdgeStepFunction => "edge-step-function",
        }
    }

    /// Timestep at which the model's seed graph is complete.
    #[must_use]
    pub const fn seed_timestep(self) -> u64 {
        match self {
            Self::HofstadA => 1,
            Self::HofstadB | Self::EdgeVertexHybrid | Self::EdgeStepFunction => 2,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of mutation performed by one timestep.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StepKind {
    /// Adds one vertex and `m` edges from it.
    VertexStep,
    /// Adds `m` edges between existing vertices.
    EdgeStep,
}

impl StepKind {
    /// Returns the stable kebab-case name of the step kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VertexStep => "vertex-step",
            Self::EdgeStep => "edge-step",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position within a step at which a distribution is requested.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DrawContext {
    /// Kind of the step in progress.
    pub kind: StepKind,
    /// Edges already placed during this step.
    pub placed: u32,
    /// Vertex inserted by this step, for vertex-steps.
    pub new_vertex: Option<VertexId>,
}

impl DrawContext {
    /// Context for the draw after `placed` edges of a vertex-step.
    #[must_use]
    pub const fn vertex_step(new_vertex: VertexId, placed: u32) -> Self {
        Self {
            kind: StepKind::VertexStep,
            placed,
            new_vertex: Some(new_vertex),
        }
    }

    /// Context for the draw after `placed` edges of an edge-step.
    #[must_use]
    pub const fn edge_step(placed: u32) -> Self {
        Self {
            kind: StepKind::EdgeStep,
            placed,
            new_vertex: None,
        }
    }
}

/// Attachment rule of one growth model.
pub trait AttachmentPolicy {
    /// Model implemented by this policy.
    fn model(&self) -> ModelKind;

    /// Edges added per timestep.
    fn m(&self) -> u32;

    /// Builds the graph the simulation starts from.
    ///
    /// # Errors
    /// Propagates [`GraphError`] from the store.
    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError>;

    /// Timestep at which [`Self::seed_graph`] is complete.
    fn seed_timestep(&self) -> u64 {
        self.model().seed_timestep()
    }

    /// Degree sum the graph must have at the start of step `t`.
    fn expected_degree_sum(&self, t: u64) -> u64 {
        2 * u64::from(self.m()) * t
    }

    /// Probability of a vertex-step at `t`, or `None` when every step is a
    /// vertex-step.
    fn vertex_step_probability(&self, _t: u64) -> Option<f64> {
        None
    }

    /// Decides the kind of step `t`, consuming one Bernoulli draw for mixed
    /// models and nothing otherwise.
    fn step_kind<R: Rng + ?Sized>(&self, t: u64, rng: &mut R) -> StepKind {
        match self.vertex_step_probability(t) {
            None => StepKind::VertexStep,
            Some(p) if rng.gen_bool(p) => StepKind::VertexStep,
            Some(_) => StepKind::EdgeStep,
        }
    }

    /// Distribution for the next draw of step `t` given the current graph.
    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution;

    /// Applies one step of kind `kind` to `graph`, returning the inserted
    /// vertex for vertex-steps. Draws are appended to `record` when given.
    ///
    /// # Errors
    /// Returns [`crate::SimulationError::InvalidVertex`] or
    /// [`crate::SimulationError::InvalidDistribution`] on internal contract
    /// violations; the step must then be treated as fatal.
    fn apply_step<R: Rng + ?Sized>(
        &self,
        graph: &mut MultiGraph,
        t: u64,
        kind: StepKind,
        rng: &mut R,
        record: Option<&mut StepRecord>,
    ) -> Result<Option<VertexId>> {
        match kind {
            StepKind::VertexStep => attach_new_vertex(self, graph, t, rng, record).map(Some),
            StepKind::EdgeStep => connect_existing_pairs(self, graph, t, rng, record).map(|()| None),
        }
    }
}

/// Inserts a vertex and draws its `m` targets one at a time, updating
/// degrees between draws.
fn attach_new_vertex<P, R>(
    policy: &P,
    graph: &mut MultiGraph,
    t: u64,
    rng: &mut R,
    mut record: Option<&mut StepRecord>,
) -> Result<VertexId>
where
    P: AttachmentPolicy + ?Sized,
    R: Rng + ?Sized,
{
    let vertex = graph.add_vertex().at(t)?;
    for placed in 0..policy.m() {
        let context = DrawContext::vertex_step(vertex, placed);
        let distribution = policy.probability_distribution(graph, t, &context);
        let selected = sample_from(rng, &distribution, SampleCount::One, false).at(t)?;
        for &target in &selected {
            graph.add_edge(vertex, target).at(t)?;
        }
        if let Some(record) = record.as_deref_mut() {
            record.push_draw(DrawRecord::new(distribution, selected));
        }
    }
    Ok(vertex)
}

/// Draws `m` distinct endpoint pairs among existing vertices and joins each.
fn connect_existing_pairs<P, R>(
    policy: &P,
    graph: &mut MultiGraph,
    t: u64,
    rng: &mut R,
    mut record: Option<&mut StepRecord>,
) -> Result<()>
where
    P: AttachmentPolicy + ?Sized,
    R: Rng + ?Sized,
{
    for placed in 0..policy.m() {
        let context = DrawContext::edge_step(placed);
        let distribution = policy.probability_distribution(graph, t, &context);
        let selected = sample_from(rng, &distribution, SampleCount::Two, true).at(t)?;
        if let [u, v] = selected[..] {
            graph.add_edge(u, v).at(t)?;
        }
        if let Some(record) = record.as_deref_mut() {
            record.push_draw(DrawRecord::new(distribution, selected));
        }
    }
    Ok(())
}

/// Distribution over every vertex except `excluded`, weighted by
/// `degree + delta` and normalised by `denominator`.
pub(crate) fn existing_vertex_distribution(
    graph: &MultiGraph,
    excluded: Option<VertexId>,
    delta: f64,
    denominator: f64,
) -> AttachmentDistribution {
    AttachmentDistribution::from_weights(
        graph
            .degrees()
            .filter(|(vertex, _)| Some(*vertex) != excluded)
            .map(|(vertex, degree)| (vertex, degree as f64 + delta)),
        denominator,
    )
}

/// Runtime-selected policy built from a configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelPolicy {
    /// Hofstad model (a).
    HofstadA(HofstadA),
    /// Hofstad model (b).
    HofstadB(HofstadB),
    /// Bernoulli-gated hybrid.
    EdgeVertexHybrid(EdgeVertexHybrid),
    /// Decaying vertex-step probability.
    EdgeStepFunction(EdgeStepFunction),
}

macro_rules! delegate {
    ($self:ident, $policy:ident => $body:expr) => {
        match $self {
            Self::HofstadA($policy) => $body,
            Self::HofstadB($policy) => $body,
            Self::EdgeVertexHybrid($policy) => $body,
            Self::EdgeStepFunction($policy) => $body,
        }
    };
}

impl AttachmentPolicy for ModelPolicy {
    fn model(&self) -> ModelKind {
        delegate!(self, policy => policy.model())
    }

    fn m(&self) -> u32 {
        delegate!(self, policy => policy.m())
    }

    fn seed_graph(&self) -> core::result::Result<MultiGraph, GraphError> {
        delegate!(self, policy => policy.seed_graph())
    }

    fn vertex_step_probability(&self, t: u64) -> Option<f64> {
        delegate!(self, policy => policy.vertex_step_probability(t))
    }

    fn probability_distribution(
        &self,
        graph: &MultiGraph,
        t: u64,
        context: &DrawContext,
    ) -> AttachmentDistribution {
        delegate!(self, policy => policy.probability_distribution(graph, t, context))
    }
}

impl From<HofstadA> for ModelPolicy {
    fn from(policy: HofstadA) -> Self {
        Self::HofstadA(policy)
    }
}

impl From<HofstadB> for ModelPolicy {
    fn from(policy: HofstadB) -> Self {
        Self::HofstadB(policy)
    }
}

impl From<EdgeVertexHybrid> for ModelPolicy {
    fn from(policy: EdgeVertexHybrid) -> Self {
        Self::EdgeVertexHybrid(policy)
    }
}

impl From<EdgeStepFunction> for ModelPolicy {
    fn from(policy: EdgeStepFunction) -> Self {
        Self::EdgeStepFunction(policy)
    }
}
