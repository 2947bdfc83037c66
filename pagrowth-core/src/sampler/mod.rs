//! Degree-weighted vertex sampler.
//!
//! Draws one or two vertices with replacement according to a normalised
//! probability vector. Pair draws can be constrained to distinct vertices,
//! in which case the second draw is rejected and repeated until it differs
//! from the first. Every accepted or rejected draw consumes exactly one
//! [`WeightedIndex`] sample from the caller's RNG.

use std::collections::HashSet;

use rand::{
    Rng,
    distributions::{Distribution, WeightedIndex},
};

use crate::{
    distribution::{AttachmentDistribution, PROBABILITY_TOLERANCE},
    error::DistributionError,
    graph::VertexId,
};

type SampleResult<T> = core::result::Result<T, DistributionError>;

/// Number of vertices drawn by a single [`sample`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SampleCount {
    /// Draw a single attachment target.
    One,
    /// Draw an endpoint pair.
    Two,
}

/// Draws `count` vertices from `candidates` with probability `weights`.
///
/// With `distinct` set and `count == SampleCount::Two`, the second vertex is
/// redrawn until it differs from the first. `distinct` has no effect on
/// single draws.
///
/// # Errors
/// Returns [`DistributionError`] when the slices differ in length, are empty,
/// contain a negative or non-finite weight, do not sum to one within
/// [`PROBABILITY_TOLERANCE`], or when a distinct pair is requested but fewer
/// than two distinct candidates carry positive weight.
///
/// # Examples
/// ```
/// use pagrowth_core::{SampleCount, VertexId, sample};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let candidates = [VertexId::new(1).expect("non-zero"), VertexId::new(2).expect("non-zero")];
/// let mut rng = SmallRng::seed_from_u64(7);
/// let pair = sample(&mut rng, &candidates, &[0.5, 0.5], SampleCount::Two, true)?;
/// assert_ne!(pair[0], pair[1]);
/// # Ok::<(), pagrowth_core::DistributionError>(())
/// ```
pub fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[VertexId],
    weights: &[f64],
    count: SampleCount,
    distinct: bool,
) -> SampleResult<Vec<VertexId>> {
    let positive = validate_weights(candidates, weights)?;
    let wants_distinct_pair = distinct && count == SampleCount::Two;
    if wants_distinct_pair && positive < 2 {
        return Err(DistributionError::NoDistinctPair { positive });
    }

    // Validation above rules out every `WeightedError` variant.
    let index = WeightedIndex::new(weights).map_err(|_| DistributionError::NotNormalised {
        total: weights.iter().sum(),
        tolerance: PROBABILITY_TOLERANCE,
    })?;

    let first = candidates[index.sample(rng)];
    match count {
        SampleCount::One => Ok(vec![first]),
        SampleCount::Two => {
            let mut second = candidates[index.sample(rng)];
            while wants_distinct_pair && second == first {
                second = candidates[index.sample(rng)];
            }
            Ok(vec![first, second])
        }
    }
}

/// Convenience wrapper drawing from an [`AttachmentDistribution`].
///
/// # Errors
/// See [`sample`].
pub fn sample_from<R: Rng + ?Sized>(
    rng: &mut R,
    distribution: &AttachmentDistribution,
    count: SampleCount,
    distinct: bool,
) -> SampleResult<Vec<VertexId>> {
    sample(
        rng,
        distribution.candidates(),
        distribution.probabilities(),
        count,
        distinct,
    )
}

/// Validates a candidate/weight pairing and returns how many distinct
/// candidates carry strictly positive weight.
pub(crate) fn validate_weights(candidates: &[VertexId], weights: &[f64]) -> SampleResult<usize> {
    if candidates.len() != weights.len() {
        return Err(DistributionError::LengthMismatch {
            candidates: candidates.len(),
            weights: weights.len(),
        });
    }
    if candidates.is_empty() {
        return Err(DistributionError::Empty);
    }

    let mut total = 0.0;
    let mut positive = HashSet::new();
    for (index, (&vertex, &weight)) in candidates.iter().zip(weights).enumerate() {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DistributionError::InvalidWeight { index, weight });
        }
        if weight > 0.0 {
            positive.insert(vertex);
        }
        total += weight;
    }

    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(DistributionError::NotNormalised {
            total,
            tolerance: PROBABILITY_TOLERANCE,
        });
    }
    Ok(positive.len())
}
