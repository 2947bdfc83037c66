//! Distance analytics benchmarks.
//!
//! Grows one Hofstad-B graph per size outside the timed loop, then measures
//! all-pairs BFS and pair-sampled typical distances against it.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{SeedableRng, rngs::SmallRng};

use pagrowth_benches::{
    error::BenchSetupError,
    fixtures::grown_graph,
    params::{DistanceBenchParams, GrowthBenchParams},
};
use pagrowth_core::{ModelKind, analytics};

/// Seed used for growth and sampling.
const SEED: u64 = 7;

/// Timesteps grown before measuring.
const STEP_COUNTS: &[u64] = &[250, 1_000];

/// Pairs drawn by the typical-distance benchmark.
const SAMPLES: usize = 200;

fn distances_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("distances");
    group.sample_size(10);

    for &steps in STEP_COUNTS {
        let graph = grown_graph(
            &GrowthBenchParams {
                model: ModelKind::HofstadB,
                m: 2,
                steps,
            },
            SEED,
        )?;
        let params = DistanceBenchParams {
            steps,
            samples: SAMPLES,
        };
        // Fail setup rather than inside the timed loop.
        analytics::typical_distances(&graph, SAMPLES, &mut SmallRng::seed_from_u64(SEED))?;

        group.bench_with_input(
            BenchmarkId::new("all_pairs", params),
            &graph,
            |b, graph| b.iter(|| analytics::all_pairwise_distances(graph)),
        );
        group.bench_with_input(
            BenchmarkId::new("typical", params),
            &graph,
            |b, graph| {
                let mut rng = SmallRng::seed_from_u64(SEED);
                b.iter(|| analytics::typical_distances(graph, SAMPLES, &mut rng));
            },
        );
    }

    group.finish();
    Ok(())
}

fn distances(c: &mut Criterion) {
    if let Err(err) = distances_impl(c) {
        panic!("distances benchmark setup failed: {err}");
    }
}

criterion_group!(benches, distances);
criterion_main!(benches);
