//! Stable error codes across the public error types.

use pagrowth_core::{
    AnalyticsError, AnalyticsErrorCode, DistributionError, DistributionErrorCode, GraphError,
    GraphErrorCode, SimulationError, SimulationErrorCode, VertexId,
};
use rstest::rstest;

fn vid(raw: u32) -> VertexId {
    VertexId::new(raw).expect("test identifiers are non-zero")
}

#[rstest]
#[case(
    GraphError::InvalidVertex { vertex: vid(3), vertex_count: 2 },
    GraphErrorCode::InvalidVertex,
    "GRAPH_INVALID_VERTEX",
)]
#[case(
    GraphError::CapacityExceeded { vertex_count: 7 },
    GraphErrorCode::CapacityExceeded,
    "GRAPH_CAPACITY_EXCEEDED",
)]
fn returns_expected_graph_code(
    #[case] error: GraphError,
    #[case] expected: GraphErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), code);
    assert_eq!(expected.to_string(), code);
}

#[rstest]
#[case(DistributionError::Empty, "DISTRIBUTION_EMPTY")]
#[case(
    DistributionError::LengthMismatch { candidates: 2, weights: 3 },
    "DISTRIBUTION_LENGTH_MISMATCH",
)]
#[case(
    DistributionError::InvalidWeight { index: 0, weight: -0.5 },
    "DISTRIBUTION_INVALID_WEIGHT",
)]
#[case(
    DistributionError::NotNormalised { total: 0.9, tolerance: 1e-6 },
    "DISTRIBUTION_NOT_NORMALISED",
)]
#[case(
    DistributionError::NoDistinctPair { positive: 1 },
    "DISTRIBUTION_NO_DISTINCT_PAIR",
)]
fn returns_expected_distribution_code(#[case] error: DistributionError, #[case] code: &str) {
    assert_eq!(error.code().as_str(), code);
}

#[rstest]
#[case(
    SimulationError::InvalidParameter { parameter: "m", reason: "is required".to_owned() },
    SimulationErrorCode::InvalidParameter,
    None,
    None,
)]
#[case(
    SimulationError::InvalidVertex {
        t: 4,
        error: GraphError::InvalidVertex { vertex: vid(9), vertex_count: 4 },
    },
    SimulationErrorCode::InvalidVertex,
    Some(GraphErrorCode::InvalidVertex),
    None,
)]
#[case(
    SimulationError::InvalidDistribution { t: 4, error: DistributionError::Empty },
    SimulationErrorCode::InvalidDistribution,
    None,
    Some(DistributionErrorCode::Empty),
)]
fn returns_expected_simulation_code(
    #[case] error: SimulationError,
    #[case] expected: SimulationErrorCode,
    #[case] graph: Option<GraphErrorCode>,
    #[case] distribution: Option<DistributionErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.graph_code(), graph);
    assert_eq!(error.distribution_code(), distribution);
}

#[test]
fn simulation_errors_expose_their_source() {
    use std::error::Error as _;

    let error = SimulationError::InvalidDistribution {
        t: 12,
        error: DistributionError::NoDistinctPair { positive: 1 },
    };
    assert_eq!(
        error.to_string(),
        "attachment distribution rejected at t=12: distinct pair requested but only 1 \
         candidates carry positive weight"
    );
    assert!(error.source().is_some());
}

#[rstest]
#[case(
    AnalyticsError::InsufficientSamples { requested: 5, available: 3 },
    AnalyticsErrorCode::InsufficientSamples,
    "ANALYTICS_INSUFFICIENT_SAMPLES",
)]
#[case(
    AnalyticsError::Disconnected { reachable: 1, total: 3 },
    AnalyticsErrorCode::Disconnected,
    "ANALYTICS_DISCONNECTED",
)]
#[case(AnalyticsError::EmptyGraph, AnalyticsErrorCode::EmptyGraph, "ANALYTICS_EMPTY_GRAPH")]
fn returns_expected_analytics_code(
    #[case] error: AnalyticsError,
    #[case] expected: AnalyticsErrorCode,
    #[case] code: &str,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(expected.as_str(), code);
    assert_eq!(expected.to_string(), code);
}
