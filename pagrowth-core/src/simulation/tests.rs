//! Unit tests for the step scheduler.

use pagrowth_test_support::tracing::RecordingLayer;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use crate::{
    distribution::PROBABILITY_TOLERANCE,
    error::SimulationErrorCode,
    graph::MultiGraph,
    policy::{
        AttachmentPolicy, DecayFunction, EdgeStepFunction, EdgeVertexHybrid, HofstadA, HofstadB,
        ModelPolicy, StepKind,
    },
    test_utils::CollectingObserver,
};

use super::{SchedulerState, Simulation, StepRecord, run};

fn simulation(policy: impl Into<ModelPolicy>, t_stop: u64, seed: u64) -> Simulation {
    let policy = policy.into();
    let graph = policy.seed_graph().expect("seed builds");
    let t_start = policy.seed_timestep();
    Simulation::new(graph, policy, t_start, t_stop, SmallRng::seed_from_u64(seed))
        .expect("configuration is valid")
}

#[test]
fn hofstad_a_scenario_adds_three_vertices() {
    let graph = simulation(HofstadA::new(1, 0.0).expect("valid"), 4, 1)
        .run(None)
        .expect("run succeeds");
    assert_eq!(graph.vertex_count(), 4);
    assert_eq!(graph.degree_sum(), 8);
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn hofstad_b_scenario_has_no_self_loops() {
    let graph = simulation(HofstadB::new(2, -1.0).expect("valid"), 5, 1)
        .run(None)
        .expect("run succeeds");
    assert_eq!(graph.vertex_count(), 5);
    assert_eq!(graph.self_loop_count(), 0);
    assert_eq!(graph.degree_sum(), 20);
}

#[rstest]
#[case::hybrid(ModelPolicy::from(EdgeVertexHybrid::new(2, 0.4).expect("valid")))]
#[case::edge_step_function(ModelPolicy::from(
    EdgeStepFunction::new(2, DecayFunction::InverseLog).expect("valid")
))]
fn vertex_count_tracks_vertex_steps(#[case] policy: ModelPolicy) {
    let seed_vertices = policy.seed_graph().expect("seed builds").vertex_count();
    let mut simulation = simulation(policy, 60, 21);
    while simulation.step(None).expect("step succeeds").is_some() {}

    let steps = simulation.vertex_steps() + simulation.edge_steps();
    assert_eq!(steps, 58);
    assert_eq!(
        simulation.graph().vertex_count() as u64,
        seed_vertices as u64 + simulation.vertex_steps()
    );
    assert_eq!(simulation.graph().degree_sum(), 2 * 2 * 60);
}

#[test]
fn observer_sees_each_step_after_mutation() {
    let mut observer = CollectingObserver::default();
    let graph = simulation(HofstadB::new(1, 0.0).expect("valid"), 7, 3)
        .run(Some(&mut observer))
        .expect("run succeeds");

    let timesteps: Vec<u64> = observer.records.iter().map(StepRecord::t).collect();
    assert_eq!(timesteps, vec![2, 3, 4, 5, 6]);
    assert_eq!(observer.vertex_counts, vec![3, 4, 5, 6, 7]);
    assert_eq!(graph.vertex_count(), 7);
    for record in &observer.records {
        assert_eq!(record.kind(), StepKind::VertexStep);
        assert!(record.new_vertex().is_some());
        assert_eq!(record.draws().len(), 1);
    }
}

#[test]
fn every_recorded_distribution_is_normalised() {
    let mut masses = Vec::new();
    let mut observer = |record: &StepRecord, _graph: &MultiGraph| {
        masses.extend(record.probability_mass());
    };
    simulation(EdgeVertexHybrid::new(3, 0.5).expect("valid"), 40, 8)
        .run(Some(&mut observer))
        .expect("run succeeds");

    assert_eq!(masses.len(), 38 * 3);
    for mass in masses {
        assert!((mass - 1.0).abs() <= PROBABILITY_TOLERANCE, "mass {mass}");
    }
}

#[test]
fn hybrid_edge_steps_never_create_self_loops() {
    let mut edge_steps = 0;
    let mut observer = |record: &StepRecord, _graph: &MultiGraph| {
        if record.kind() == StepKind::EdgeStep {
            edge_steps += 1;
            assert!(record.new_vertex().is_none());
            for draw in record.draws() {
                assert_ne!(draw.selected().first(), draw.selected().last());
            }
        }
    };
    let graph = simulation(EdgeVertexHybrid::new(1, 0.2).expect("valid"), 80, 5)
        .run(Some(&mut observer))
        .expect("run succeeds");
    assert!(edge_steps > 0);
    assert_eq!(graph.self_loop_count(), 0);
}

#[test]
fn identical_seeds_produce_identical_graphs() {
    let policy = EdgeStepFunction::new(2, DecayFunction::InverseLogSquared).expect("valid");
    let first = simulation(policy, 50, 77).run(None).expect("run succeeds");
    let second = simulation(policy, 50, 77).run(None).expect("run succeeds");
    assert_eq!(first, second);
}

#[test]
fn step_after_stop_is_a_no_op() {
    let mut simulation = simulation(HofstadA::new(1, 0.0).expect("valid"), 2, 0);
    assert_eq!(simulation.state(), SchedulerState::Running);
    let outcome = simulation
        .step(None)
        .expect("step succeeds")
        .expect("one step remains");
    assert_eq!(outcome.t, 1);
    assert_eq!(outcome.new_vertex, simulation.graph().last_vertex());
    assert_eq!(simulation.state(), SchedulerState::Stopped);
    assert_eq!(simulation.t(), 2);
    assert_eq!(simulation.step(None), Ok(None));
    assert_eq!(simulation.graph().vertex_count(), 2);
}

#[test]
fn stopped_simulation_opens_no_step_span() {
    let layer = RecordingLayer::default();
    let mut simulation = simulation(HofstadA::new(1, 0.0).expect("valid"), 3, 0);
    layer.in_scope(|| {
        while simulation.step(None).expect("step succeeds").is_some() {}
        assert_eq!(simulation.step(None), Ok(None));
    });

    let timesteps: Vec<Option<String>> = layer
        .spans()
        .into_iter()
        .filter(|span| span.name == "simulation.step")
        .map(|span| span.field("t").map(str::to_owned))
        .collect();
    assert_eq!(timesteps, vec![Some("1".to_owned()), Some("2".to_owned())]);
}

#[cfg(feature = "metrics")]
#[test]
fn steps_increment_counters() {
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(&recorder, || {
        simulation(HofstadA::new(1, 0.0).expect("valid"), 4, 1)
            .run(None)
            .expect("run succeeds")
    });

    let counters: Vec<(String, Vec<String>, u64)> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((
                key.key().name().to_owned(),
                key.key()
                    .labels()
                    .map(|label| format!("{}={}", label.key(), label.value()))
                    .collect(),
                count,
            )),
            _ => None,
        })
        .collect();
    assert!(counters.contains(&(
        "simulation_steps_total".to_owned(),
        vec!["kind=vertex-step".to_owned()],
        3
    )));
    assert!(counters.contains(&("simulation_vertices_added_total".to_owned(), Vec::new(), 3)));
}

#[rstest]
#[case::zero_start(0, 3)]
#[case::empty_range(1, 1)]
#[case::inverted_range(3, 2)]
#[case::start_off_seed(2, 5)]
fn new_rejects_invalid_ranges(#[case] t_start: u64, #[case] t_stop: u64) {
    let policy = HofstadA::new(1, 0.0).expect("valid");
    let graph = policy.seed_graph().expect("seed builds");
    let err = Simulation::new(graph, policy, t_start, t_stop, SmallRng::seed_from_u64(0))
        .expect_err("range must be rejected");
    assert_eq!(err.code(), SimulationErrorCode::InvalidParameter);
}

#[test]
fn free_run_borrows_the_caller_rng() {
    let policy = HofstadB::new(1, 0.5).expect("valid");
    let mut rng = SmallRng::seed_from_u64(10);
    let graph = run(
        policy.seed_graph().expect("seed builds"),
        policy,
        2,
        6,
        &mut rng,
        None,
    )
    .expect("run succeeds");
    assert_eq!(graph.vertex_count(), 6);
}
