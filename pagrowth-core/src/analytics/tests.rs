//! Unit tests for the distance analytics.

use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};

use crate::graph::{MultiGraph, VertexId};

use super::{
    AnalyticsError, AnalyticsErrorCode, DistanceMap, DistanceSummary, all_pairwise_distances,
    average_distance, diameter, sample_distances, typical_distances,
};

fn vid(raw: u32) -> VertexId {
    VertexId::new(raw).expect("test identifiers are non-zero")
}

/// Builds a graph with `n` vertices joined by the given 1-based edges.
fn graph_with(n: u32, edges: &[(u32, u32)]) -> MultiGraph {
    let mut graph = MultiGraph::new();
    for _ in 0..n {
        graph.add_vertex().expect("insert must succeed");
    }
    for &(u, v) in edges {
        graph.add_edge(vid(u), vid(v)).expect("endpoints exist");
    }
    graph
}

/// Path 1-2-3-4 with a doubled first edge and a self-loop on 4.
#[fixture]
fn path() -> MultiGraph {
    graph_with(4, &[(1, 2), (1, 2), (2, 3), (3, 4), (4, 4)])
}

#[rstest]
fn pairwise_distances_ignore_multiplicity(path: MultiGraph) {
    let distances = all_pairwise_distances(&path);
    let expected: DistanceMap = [
        ((vid(1), vid(2)), 1),
        ((vid(1), vid(3)), 2),
        ((vid(1), vid(4)), 3),
        ((vid(2), vid(3)), 1),
        ((vid(2), vid(4)), 2),
        ((vid(3), vid(4)), 1),
    ]
    .into_iter()
    .collect();
    assert_eq!(distances, expected);
}

#[rstest]
fn diameter_of_path_is_its_length(path: MultiGraph) {
    assert_eq!(diameter(&path), Ok(3));
}

#[rstest]
fn average_distance_of_path(path: MultiGraph) {
    let average = average_distance(&all_pairwise_distances(&path)).expect("pairs exist");
    assert!((average - 10.0 / 6.0).abs() < 1e-12);
}

#[test]
fn unreachable_pairs_are_omitted() {
    let graph = graph_with(3, &[(1, 2), (3, 3)]);
    let distances = all_pairwise_distances(&graph);
    assert_eq!(distances.len(), 1);
    assert_eq!(
        diameter(&graph),
        Err(AnalyticsError::Disconnected {
            reachable: 1,
            total: 3,
        })
    );
}

#[rstest]
#[case::empty(0, Err(AnalyticsError::EmptyGraph))]
#[case::single_vertex(1, Ok(0))]
fn diameter_of_trivial_graphs(#[case] n: u32, #[case] expected: Result<u32, AnalyticsError>) {
    assert_eq!(diameter(&graph_with(n, &[])), expected);
}

#[test]
fn average_distance_of_empty_map_is_none() {
    assert_eq!(average_distance(&DistanceMap::new()), None);
}

#[rstest]
fn sample_distances_draws_without_replacement(path: MultiGraph) {
    let distances = all_pairwise_distances(&path);
    let mut rng = SmallRng::seed_from_u64(5);
    let mut sampled = sample_distances(&distances, distances.len(), &mut rng)
        .expect("count equals available pairs");
    sampled.sort_unstable();
    let mut all: Vec<u32> = distances.values().copied().collect();
    all.sort_unstable();
    assert_eq!(sampled, all);
}

#[rstest]
fn sample_distances_rejects_oversized_requests(path: MultiGraph) {
    let distances = all_pairwise_distances(&path);
    let mut rng = SmallRng::seed_from_u64(5);
    let err = sample_distances(&distances, 7, &mut rng).expect_err("only six pairs");
    assert_eq!(err.code(), AnalyticsErrorCode::InsufficientSamples);
    assert_eq!(
        err,
        AnalyticsError::InsufficientSamples {
            requested: 7,
            available: 6,
        }
    );
}

#[rstest]
fn typical_distances_match_all_pairs(path: MultiGraph) {
    let mut rng = SmallRng::seed_from_u64(17);
    let mut typical = typical_distances(&path, 6, &mut rng).expect("six pairs exist");
    typical.sort_unstable();
    assert_eq!(typical, vec![1, 1, 1, 2, 2, 3]);
}

#[test]
fn typical_distances_skip_unreachable_pairs() {
    let graph = graph_with(3, &[(1, 2)]);
    let mut rng = SmallRng::seed_from_u64(3);
    let typical = typical_distances(&graph, 3, &mut rng).expect("three pairs exist");
    assert_eq!(typical, vec![1]);
}

#[rstest]
fn typical_distances_reject_oversized_requests(path: MultiGraph) {
    let mut rng = SmallRng::seed_from_u64(3);
    let err = typical_distances(&path, 7, &mut rng).expect_err("only six pairs");
    assert_eq!(err.code(), AnalyticsErrorCode::InsufficientSamples);
}

#[rstest]
fn summary_clamps_sample_count(path: MultiGraph) {
    let mut rng = SmallRng::seed_from_u64(8);
    let summary = DistanceSummary::capture(&path, 4, 100, &mut rng);
    assert_eq!(summary.t(), 4);
    assert_eq!(summary.vertex_count(), 4);
    assert_eq!(summary.edge_count(), 5);
    assert_eq!(summary.diameter(), Some(3));
    assert_eq!(summary.average_distance(), summary.sampled_mean());
}

#[test]
fn summary_of_disconnected_graph_has_no_diameter() {
    let graph = graph_with(2, &[(1, 1)]);
    let mut rng = SmallRng::seed_from_u64(8);
    let summary = DistanceSummary::capture(&graph, 1, 3, &mut rng);
    assert_eq!(summary.diameter(), None);
    assert_eq!(summary.average_distance(), None);
    assert_eq!(summary.sampled_mean(), None);
}
