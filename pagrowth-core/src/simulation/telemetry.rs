//! Per-step telemetry handed to observers.
//!
//! Records are only assembled while an observer is attached, and the
//! simulation never reads them back.

use crate::{
    distribution::AttachmentDistribution,
    graph::{MultiGraph, VertexId},
    policy::StepKind,
};

/// One sampler draw: the distribution used and the vertices selected.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    distribution: AttachmentDistribution,
    selected: Vec<VertexId>,
}

impl DrawRecord {
    pub(crate) fn new(distribution: AttachmentDistribution, selected: Vec<VertexId>) -> Self {
        Self {
            distribution,
            selected,
        }
    }

    /// Distribution the draw was taken from.
    #[must_use]
    #[rustfmt::skip]
    pub fn distribution(&self) -> &AttachmentDistribution { &self.distribution }

    /// Vertices returned by the sampler.
    #[must_use]
    #[rustfmt::skip]
    pub fn selected(&self) -> &[VertexId] { &self.selected }
}

/// Telemetry for one completed timestep.
#[derive(Clone, Debug, PartialEq)]
pub struct StepRecord {
    t: u64,
    kind: StepKind,
    vertex_step_probability: Option<f64>,
    new_vertex: Option<VertexId>,
    draws: Vec<DrawRecord>,
}

impl StepRecord {
    pub(crate) fn new(t: u64, kind: StepKind, vertex_step_probability: Option<f64>) -> Self {
        Self {
            t,
            kind,
            vertex_step_probability,
            new_vertex: None,
            draws: Vec::new(),
        }
    }

    pub(crate) fn push_draw(&mut self, draw: DrawRecord) {
        self.draws.push(draw);
    }

    pub(crate) fn set_new_vertex(&mut self, vertex: Option<VertexId>) {
        self.new_vertex = vertex;
    }

    /// Timestep this record describes.
    #[must_use]
    #[rustfmt::skip]
    pub fn t(&self) -> u64 { self.t }

    /// Kind of step taken.
    #[must_use]
    #[rustfmt::skip]
    pub fn kind(&self) -> StepKind { self.kind }

    /// Vertex-step probability in force, for mixed models.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_step_probability(&self) -> Option<f64> { self.vertex_step_probability }

    /// Vertex added by a vertex-step.
    #[must_use]
    #[rustfmt::skip]
    pub fn new_vertex(&self) -> Option<VertexId> { self.new_vertex }

    /// Draws in the order they were taken.
    #[must_use]
    #[rustfmt::skip]
    pub fn draws(&self) -> &[DrawRecord] { &self.draws }

    /// All selected vertices across draws, in draw order.
    pub fn selected(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.draws
            .iter()
            .flat_map(|draw| draw.selected.iter().copied())
    }

    /// Total probability mass of each draw's distribution.
    #[must_use]
    pub fn probability_mass(&self) -> Vec<f64> {
        self.draws
            .iter()
            .map(|draw| draw.distribution.total_mass())
            .collect()
    }
}

/// Receives telemetry after each step's graph mutation has been committed.
pub trait StepObserver {
    /// Called once per completed step with the record and the updated graph.
    fn on_step(&mut self, record: &StepRecord, graph: &MultiGraph);
}

impl<F> StepObserver for F
where
    F: FnMut(&StepRecord, &MultiGraph),
{
    fn on_step(&mut self, record: &StepRecord, graph: &MultiGraph) {
        self(record, graph);
    }
}
