//! Step scheduler driving a policy over a graph from `t_start` to `t_stop`.
//!
//! The scheduler owns the graph, the policy and the random source for the
//! duration of a run. It performs no I/O: observers receive each step's
//! telemetry strictly after the step's mutation has been committed.

pub mod telemetry;

use rand::{Rng, rngs::SmallRng};
use tracing::{debug, info, instrument};

use crate::{
    Result, SimulationError,
    graph::{MultiGraph, VertexId},
    policy::{AttachmentPolicy, ModelPolicy, StepKind},
};

use self::telemetry::{StepObserver, StepRecord};

/// Lifecycle of a [`Simulation`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchedulerState {
    /// Steps remain before `t_stop`.
    Running,
    /// `t` has reached `t_stop`; further steps are no-ops.
    Stopped,
}

/// Outcome of a single [`Simulation::step`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StepOutcome {
    /// Timestep that was executed.
    pub t: u64,
    /// Kind of step taken.
    pub kind: StepKind,
    /// Vertex inserted by a vertex-step.
    pub new_vertex: Option<VertexId>,
}

/// A running growth simulation.
///
/// # Examples
/// ```
/// use pagrowth_core::{ModelKind, SimulationBuilder};
///
/// let simulation = SimulationBuilder::new(ModelKind::HofstadA)
///     .with_m(1)
///     .with_delta(0.0)
///     .with_t_stop(4)
///     .with_seed(7)
///     .build()?;
/// let graph = simulation.run(None)?;
/// assert_eq!(graph.vertex_count(), 4);
/// assert_eq!(graph.degree_sum(), 8);
/// # Ok::<(), pagrowth_core::SimulationError>(())
/// ```
#[derive(Debug)]
pub struct Simulation<P = ModelPolicy, R = SmallRng> {
    graph: MultiGraph,
    policy: P,
    rng: R,
    t: u64,
    t_start: u64,
    t_stop: u64,
    state: SchedulerState,
    vertex_steps: u64,
    edge_steps: u64,
}

impl<P: AttachmentPolicy, R: Rng> Simulation<P, R> {
    /// Prepares a simulation over `graph`, which must match the policy's
    /// degree-sum invariant at `t_start`.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidParameter`] when `t_start == 0`,
    /// `t_stop <= t_start`, or the graph's degree sum differs from the
    /// `2m·t_start` the policy's closed-form denominators rely on.
    pub fn new(graph: MultiGraph, policy: P, t_start: u64, t_stop: u64, rng: R) -> Result<Self> {
        if t_start == 0 {
            return Err(SimulationError::invalid_parameter(
                "t_start",
                "timesteps start at 1",
            ));
        }
        if t_stop <= t_start {
            return Err(SimulationError::invalid_parameter(
                "t_stop",
                format!("must exceed t_start={t_start} by at least one (got {t_stop})"),
            ));
        }
        let expected = policy.expected_degree_sum(t_start);
        if graph.degree_sum() != expected {
            return Err(SimulationError::invalid_parameter(
                "t_start",
                format!(
                    "graph degree sum {} does not match {expected} expected by {} at t={t_start}",
                    graph.degree_sum(),
                    policy.model(),
                ),
            ));
        }

        Ok(Self {
            graph,
            policy,
            rng,
            t: t_start,
            t_start,
            t_stop,
            state: SchedulerState::Running,
            vertex_steps: 0,
            edge_steps: 0,
        })
    }

    /// Executes the next timestep, or returns `Ok(None)` once stopped.
    ///
    /// A stopped simulation opens no `simulation.step` span.
    ///
    /// # Errors
    /// Propagates policy failures; the simulation must not be stepped again
    /// after an error.
    pub fn step(&mut self, observer: Option<&mut dyn StepObserver>) -> Result<Option<StepOutcome>> {
        match self.state {
            SchedulerState::Running => self.execute_step(observer).map(Some),
            SchedulerState::Stopped => Ok(None),
        }
    }

    #[instrument(
        name = "simulation.step",
        level = "debug",
        err,
        skip(self, observer),
        fields(t = self.t),
    )]
    fn execute_step(&mut self, observer: Option<&mut dyn StepObserver>) -> Result<StepOutcome> {
        let t = self.t;
        let kind = self.policy.step_kind(t, &mut self.rng);
        let mut record = observer
            .is_some()
            .then(|| StepRecord::new(t, kind, self.policy.vertex_step_probability(t)));

        let new_vertex =
            self.policy
                .apply_step(&mut self.graph, t, kind, &mut self.rng, record.as_mut())?;
        debug_assert_eq!(
            self.graph.degree_sum(),
            self.policy.expected_degree_sum(t + 1)
        );

        match kind {
            StepKind::VertexStep => self.vertex_steps += 1,
            StepKind::EdgeStep => self.edge_steps += 1,
        }
        #[cfg(feature = "metrics")]
        {
            metrics::counter!("simulation_steps_total", "kind" => kind.as_str()).increment(1);
            if new_vertex.is_some() {
                metrics::counter!("simulation_vertices_added_total").increment(1);
            }
        }
        debug!(t, kind = %kind, vertices = self.graph.vertex_count(), "step committed");

        if let (Some(observer), Some(record)) = (observer, record.as_mut()) {
            record.set_new_vertex(new_vertex);
            observer.on_step(record, &self.graph);
        }

        self.t += 1;
        if self.t == self.t_stop {
            self.state = SchedulerState::Stopped;
        }
        Ok(StepOutcome { t, kind, new_vertex })
    }

    /// Runs every remaining step and returns the final graph.
    ///
    /// # Errors
    /// Propagates the first step failure.
    #[instrument(
        name = "simulation.run",
        err,
        skip(self, observer),
        fields(
            model = %self.policy.model(),
            m = self.policy.m(),
            t_start = self.t_start,
            t_stop = self.t_stop,
        ),
    )]
    pub fn run(mut self, observer: Option<&mut dyn StepObserver>) -> Result<MultiGraph> {
        match observer {
            Some(observer) => {
                while self.state == SchedulerState::Running {
                    self.execute_step(Some(&mut *observer))?;
                }
            }
            None => {
                while self.state == SchedulerState::Running {
                    self.execute_step(None)?;
                }
            }
        }
        info!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            vertex_steps = self.vertex_steps,
            edge_steps = self.edge_steps,
            "simulation completed"
        );
        Ok(self.graph)
    }
}

impl<P, R> Simulation<P, R> {
    /// Current graph state.
    #[must_use]
    #[rustfmt::skip]
    pub fn graph(&self) -> &MultiGraph { &self.graph }

    /// Policy driving the simulation.
    #[must_use]
    #[rustfmt::skip]
    pub fn policy(&self) -> &P { &self.policy }

    /// Next timestep to execute (equals `t_stop` once stopped).
    #[must_use]
    #[rustfmt::skip]
    pub fn t(&self) -> u64 { self.t }

    /// First timestep executed.
    #[must_use]
    #[rustfmt::skip]
    pub fn t_start(&self) -> u64 { self.t_start }

    /// Exclusive upper bound on executed timesteps.
    #[must_use]
    #[rustfmt::skip]
    pub fn t_stop(&self) -> u64 { self.t_stop }

    /// Current lifecycle state.
    #[must_use]
    #[rustfmt::skip]
    pub fn state(&self) -> SchedulerState { self.state }

    /// Vertex-steps taken so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_steps(&self) -> u64 { self.vertex_steps }

    /// Edge-steps taken so far.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_steps(&self) -> u64 { self.edge_steps }

    /// Consumes the simulation and returns its graph as it stands.
    #[must_use]
    pub fn into_graph(self) -> MultiGraph {
        self.graph
    }
}

/// Runs `policy` over `graph` for timesteps `t_start..t_stop` using `rng`.
///
/// # Errors
/// See [`Simulation::new`] and [`Simulation::step`].
///
/// # Examples
/// ```
/// use pagrowth_core::{AttachmentPolicy, HofstadB, run};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let policy = HofstadB::new(2, -1.0)?;
/// let seed = policy.seed_graph()?;
/// let mut rng = SmallRng::seed_from_u64(3);
/// let graph = run(seed, policy, 2, 5, &mut rng, None)?;
/// assert_eq!(graph.vertex_count(), 5);
/// assert_eq!(graph.self_loop_count(), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run<P, R>(
    graph: MultiGraph,
    policy: P,
    t_start: u64,
    t_stop: u64,
    rng: &mut R,
    observer: Option<&mut dyn StepObserver>,
) -> Result<MultiGraph>
where
    P: AttachmentPolicy,
    R: Rng + ?Sized,
{
    Simulation::new(graph, policy, t_start, t_stop, rng)?.run(observer)
}

#[cfg(test)]
mod property;
#[cfg(test)]
mod tests;
