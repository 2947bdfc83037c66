//! Attachment distributions produced by the policies.
//!
//! An [`AttachmentDistribution`] pairs candidate vertices with their
//! attachment probability for a single sampler draw. Candidates keep the
//! order in which the policy emitted them, which is vertex insertion order
//! (with the in-progress vertex last for Hofstad-A).

use crate::{error::DistributionError, graph::VertexId, sampler};

/// Absolute deviation from one tolerated when validating probability mass.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Ordered `(vertex, probability)` pairs for one attachment draw.
///
/// # Examples
/// ```
/// use pagrowth_core::{AttachmentDistribution, VertexId};
///
/// let a = VertexId::new(1).expect("non-zero");
/// let b = VertexId::new(2).expect("non-zero");
/// let distribution = AttachmentDistribution::from_weights([(a, 3.0), (b, 1.0)], 4.0);
/// assert_eq!(distribution.probability_of(a), Some(0.75));
/// assert!(distribution.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttachmentDistribution {
    candidates: Vec<VertexId>,
    probabilities: Vec<f64>,
}

impl AttachmentDistribution {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(capacity),
            probabilities: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, vertex: VertexId, probability: f64) {
        self.candidates.push(vertex);
        self.probabilities.push(probability);
    }

    /// Normalises raw attachment weights by a known denominator.
    ///
    /// The denominator is not recomputed from `entries`; policies pass the
    /// closed-form total so that a mismatch surfaces in [`Self::validate`].
    #[must_use]
    pub fn from_weights(
        entries: impl IntoIterator<Item = (VertexId, f64)>,
        denominator: f64,
    ) -> Self {
        let entries = entries.into_iter();
        let mut distribution = Self::with_capacity(entries.size_hint().0);
        for (vertex, weight) in entries {
            distribution.push(vertex, weight / denominator);
        }
        distribution
    }

    /// Returns the candidate vertices in emission order.
    #[must_use]
    #[rustfmt::skip]
    pub fn candidates(&self) -> &[VertexId] { &self.candidates }

    /// Returns the probabilities aligned with [`Self::candidates`].
    #[must_use]
    #[rustfmt::skip]
    pub fn probabilities(&self) -> &[f64] { &self.probabilities }

    /// Iterates `(vertex, probability)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.candidates
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Returns the probability assigned to `vertex`, if it is a candidate.
    #[must_use]
    pub fn probability_of(&self, vertex: VertexId) -> Option<f64> {
        self.iter()
            .find_map(|(candidate, probability)| (candidate == vertex).then_some(probability))
    }

    /// Sums all probabilities.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` when there are no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Checks that every probability is finite and non-negative and that the
    /// total mass is one within [`PROBABILITY_TOLERANCE`].
    ///
    /// # Errors
    /// Returns the [`DistributionError`] describing the first violation.
    pub fn validate(&self) -> Result<(), DistributionError> {
        sampler::validate_weights(&self.candidates, &self.probabilities).map(|_| ())
    }
}
