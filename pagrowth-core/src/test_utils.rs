//! Shared test utilities for `pagrowth-core`.

use pagrowth_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{graph::MultiGraph, simulation::telemetry::StepRecord};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `PAGROWTH_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Observer that keeps every record together with the graph size after the
/// step.
#[derive(Default)]
pub(crate) struct CollectingObserver {
    pub(crate) records: Vec<StepRecord>,
    pub(crate) vertex_counts: Vec<usize>,
}

impl crate::StepObserver for CollectingObserver {
    fn on_step(&mut self, record: &StepRecord, graph: &MultiGraph) {
        self.records.push(record.clone());
        self.vertex_counts.push(graph.vertex_count());
    }
}
