//! Property tests for growth invariants across randomly configured runs.

use proptest::{prelude::any, prop_assert, prop_assert_eq, proptest};
use test_strategy::Arbitrary;

use crate::{
    builder::SimulationBuilder,
    distribution::PROBABILITY_TOLERANCE,
    graph::MultiGraph,
    policy::{DecayFunction, ModelKind, StepKind},
    test_utils::suite_proptest_config,
};

use super::telemetry::StepRecord;

#[derive(Clone, Copy, Debug, Arbitrary)]
enum ModelChoice {
    #[weight(2)]
    HofstadA,
    #[weight(2)]
    HofstadB,
    EdgeVertexHybrid,
    EdgeStepFunction,
}

impl ModelChoice {
    const fn kind(self) -> ModelKind {
        match self {
            Self::HofstadA => ModelKind::HofstadA,
            Self::HofstadB => ModelKind::HofstadB,
            Self::EdgeVertexHybrid => ModelKind::EdgeVertexHybrid,
            Self::EdgeStepFunction => ModelKind::EdgeStepFunction,
        }
    }
}

/// One randomly configured run; `delta_fraction` spans `[-m, m + 2]`.
#[derive(Clone, Debug, Arbitrary)]
struct GrowthCase {
    model: ModelChoice,
    #[strategy(1_u32..=4)]
    m: u32,
    #[strategy(0.0_f64..=1.0)]
    delta_fraction: f64,
    #[strategy(0.05_f64..0.95)]
    p: f64,
    #[strategy(0_usize..3)]
    decay: usize,
    #[strategy(1_u64..40)]
    steps: u64,
    seed: u64,
}

impl GrowthCase {
    fn builder(&self) -> SimulationBuilder {
        let m = f64::from(self.m);
        let kind = self.model.kind();
        let builder = SimulationBuilder::new(kind)
            .with_m(self.m)
            .with_t_stop(kind.seed_timestep() + self.steps)
            .with_seed(self.seed);
        match self.model {
            ModelChoice::HofstadA | ModelChoice::HofstadB => {
                builder.with_delta(-m + self.delta_fraction * (2.0 * m + 2.0))
            }
            ModelChoice::EdgeVertexHybrid => builder.with_p(self.p),
            ModelChoice::EdgeStepFunction => {
                builder.with_edge_step_fn(DecayFunction::ALL[self.decay])
            }
        }
    }
}

#[derive(Default)]
struct Audit {
    masses: Vec<f64>,
    zero_probability_picks: usize,
    edge_step_self_pairs: usize,
}

impl Audit {
    fn observe(&mut self, record: &StepRecord, _graph: &MultiGraph) {
        self.masses.extend(record.probability_mass());
        for draw in record.draws() {
            for &vertex in draw.selected() {
                if draw.distribution().probability_of(vertex).unwrap_or(0.0) <= 0.0 {
                    self.zero_probability_picks += 1;
                }
            }
            if record.kind() == StepKind::EdgeStep
                && draw.selected().first() == draw.selected().last()
            {
                self.edge_step_self_pairs += 1;
            }
        }
    }
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn growth_preserves_invariants(case in any::<GrowthCase>()) {
        let simulation = case.builder().build().expect("generated configuration is valid");
        let seed_vertices = simulation.graph().vertex_count() as u64;
        let m = u64::from(case.m);
        let t_stop = simulation.t_stop();

        let mut audit = Audit::default();
        let mut vertex_steps = 0_u64;
        let mut observer = |record: &StepRecord, graph: &MultiGraph| {
            if record.kind() == StepKind::VertexStep {
                vertex_steps += 1;
            }
            audit.observe(record, graph);
        };
        let graph = simulation.run(Some(&mut observer)).expect("run succeeds");

        prop_assert_eq!(graph.degree_sum(), 2 * m * t_stop);
        prop_assert_eq!(graph.vertex_count() as u64, seed_vertices + vertex_steps);
        prop_assert!(audit
            .masses
            .iter()
            .all(|mass| (mass - 1.0).abs() <= PROBABILITY_TOLERANCE));
        prop_assert_eq!(audit.zero_probability_picks, 0);
        prop_assert_eq!(audit.edge_step_self_pairs, 0);
        if matches!(case.model, ModelChoice::HofstadB) {
            prop_assert_eq!(graph.self_loop_count(), 0);
        }
    }

    #[test]
    fn fixed_seed_reproduces_graph(case in any::<GrowthCase>()) {
        let first = case.builder().build().and_then(|s| s.run(None)).expect("run succeeds");
        let second = case.builder().build().and_then(|s| s.run(None)).expect("run succeeds");
        prop_assert_eq!(first, second);
    }
}
