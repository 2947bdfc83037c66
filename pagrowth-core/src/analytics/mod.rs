//! Distance statistics over the simple projection of a grown graph.
//!
//! Parallel edges and self-loops do not change shortest-path lengths, so
//! every routine here runs breadth-first search over the adjacency lists and
//! ignores multiplicity. With the `parallel` feature the all-pairs search
//! fans sources out over Rayon; results land in an ordered map so output
//! does not depend on scheduling.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use rand::{Rng, seq::SliceRandom};
use tracing::{debug, instrument};

use crate::{
    error::define_error_codes,
    graph::{MultiGraph, VertexId},
};

/// Shortest-path lengths keyed by unordered vertex pair `(low, high)`.
///
/// Each distinct pair of reachable vertices appears once; unreachable pairs
/// are omitted.
pub type DistanceMap = BTreeMap<(VertexId, VertexId), u32>;

/// Errors returned by the distance analytics.
#[derive(Clone, Debug, thiserror::Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum AnalyticsError {
    /// More samples were requested than there are pairs to draw from.
    #[error("requested {requested} samples but only {available} are available")]
    InsufficientSamples {
        /// Number of samples requested.
        requested: usize,
        /// Number of pairs available.
        available: usize,
    },
    /// Some vertex pair has no connecting path.
    #[error("graph is disconnected: {reachable} of {total} vertex pairs are reachable")]
    Disconnected {
        /// Pairs joined by a path.
        reachable: usize,
        /// All distinct vertex pairs.
        total: usize,
    },
    /// The graph has no vertices.
    #[error("graph has no vertices")]
    EmptyGraph,
}

define_error_codes! {
    /// Machine-readable error codes for [`AnalyticsError`].
    enum AnalyticsErrorCode for AnalyticsError {
        /// More samples were requested than there are pairs to draw from.
        InsufficientSamples => InsufficientSamples { .. } => "ANALYTICS_INSUFFICIENT_SAMPLES",
        /// Some vertex pair has no connecting path.
        Disconnected => Disconnected { .. } => "ANALYTICS_DISCONNECTED",
        /// The graph has no vertices.
        EmptyGraph => EmptyGraph => "ANALYTICS_EMPTY_GRAPH",
    }
}

/// Distance statistics captured at one timestep.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceSummary {
    t: u64,
    vertex_count: usize,
    edge_count: usize,
    diameter: Option<u32>,
    average_distance: Option<f64>,
    sampled_mean: Option<f64>,
}

impl DistanceSummary {
    /// Computes a snapshot of `graph` labelled with timestep `t`.
    ///
    /// `samples` distances are drawn from the reachable pairs; fewer are
    /// drawn when the graph does not have that many pairs yet. The diameter
    /// is `None` for disconnected or empty graphs.
    #[instrument(
        name = "analytics.summary",
        level = "debug",
        skip(graph, rng),
        fields(vertices = graph.vertex_count()),
    )]
    pub fn capture<R: Rng + ?Sized>(graph: &MultiGraph, t: u64, samples: usize, rng: &mut R) -> Self {
        let distances = all_pairwise_distances(graph);
        let diameter = diameter_of(&distances, graph.vertex_count()).ok();
        let count = samples.min(distances.len());
        let sampled_mean = sample_distances(&distances, count, rng)
            .ok()
            .and_then(|sampled| mean(&sampled));
        Self {
            t,
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            diameter,
            average_distance: average_distance(&distances),
            sampled_mean,
        }
    }

    /// Timestep the snapshot was taken at.
    #[must_use]
    #[rustfmt::skip]
    pub const fn t(&self) -> u64 { self.t }

    /// Number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertex_count(&self) -> usize { self.vertex_count }

    /// Number of edge instances.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edge_count(&self) -> usize { self.edge_count }

    /// Longest shortest path, when every pair is reachable.
    #[must_use]
    #[rustfmt::skip]
    pub const fn diameter(&self) -> Option<u32> { self.diameter }

    /// Mean over all reachable pairs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn average_distance(&self) -> Option<f64> { self.average_distance }

    /// Mean over the sampled pairs.
    #[must_use]
    #[rustfmt::skip]
    pub const fn sampled_mean(&self) -> Option<f64> { self.sampled_mean }
}

/// Computes the shortest-path length of every reachable vertex pair.
///
/// # Examples
/// ```
/// use pagrowth_core::{MultiGraph, analytics};
///
/// let mut graph = MultiGraph::new();
/// let a = graph.add_vertex()?;
/// let b = graph.add_vertex()?;
/// let c = graph.add_vertex()?;
/// graph.add_edge(a, b)?;
/// graph.add_edge(a, b)?;
/// graph.add_edge(b, c)?;
/// let distances = analytics::all_pairwise_distances(&graph);
/// assert_eq!(distances.len(), 3);
/// assert_eq!(distances.get(&(a, c)), Some(&2));
/// # Ok::<(), pagrowth_core::GraphError>(())
/// ```
#[must_use]
#[instrument(
    name = "analytics.all_pairwise_distances",
    level = "debug",
    skip(graph),
    fields(vertices = graph.vertex_count()),
)]
pub fn all_pairwise_distances(graph: &MultiGraph) -> DistanceMap {
    let map: DistanceMap = source_rows(graph).into_iter().flatten().collect();
    debug!(pairs = map.len(), "distances computed");
    map
}

/// Longest shortest path between any two vertices.
///
/// A single vertex has diameter `0`.
///
/// # Errors
/// Returns [`AnalyticsError::EmptyGraph`] for a graph without vertices and
/// [`AnalyticsError::Disconnected`] when some pair is unreachable.
#[instrument(
    name = "analytics.diameter",
    err,
    skip(graph),
    fields(vertices = graph.vertex_count()),
)]
pub fn diameter(graph: &MultiGraph) -> Result<u32, AnalyticsError> {
    diameter_of(&all_pairwise_distances(graph), graph.vertex_count())
}

/// Mean shortest-path length over the pairs in `distances`, or `None` when
/// the map is empty.
#[must_use]
pub fn average_distance(distances: &DistanceMap) -> Option<f64> {
    if distances.is_empty() {
        return None;
    }
    let total: u64 = distances.values().map(|&d| u64::from(d)).sum();
    Some(total as f64 / distances.len() as f64)
}

/// Draws `count` distances from `distances` uniformly without replacement.
///
/// # Errors
/// Returns [`AnalyticsError::InsufficientSamples`] when `count` exceeds the
/// number of pairs.
///
/// # Examples
/// ```
/// use pagrowth_core::{AnalyticsErrorCode, DistanceMap, analytics};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let err = analytics::sample_distances(&DistanceMap::new(), 1, &mut rng)
///     .expect_err("nothing to sample");
/// assert_eq!(err.code(), AnalyticsErrorCode::InsufficientSamples);
/// ```
pub fn sample_distances<R: Rng + ?Sized>(
    distances: &DistanceMap,
    count: usize,
    rng: &mut R,
) -> Result<Vec<u32>, AnalyticsError> {
    if count > distances.len() {
        return Err(AnalyticsError::InsufficientSamples {
            requested: count,
            available: distances.len(),
        });
    }
    let values: Vec<u32> = distances.values().copied().collect();
    Ok(values.choose_multiple(rng, count).copied().collect())
}

/// Shortest-path lengths between `count` distinct random vertex pairs.
///
/// Pairs are drawn uniformly without replacement and searched individually,
/// which avoids the all-pairs cost on large graphs. Unreachable pairs are
/// omitted, so the result may be shorter than `count`.
///
/// # Errors
/// Returns [`AnalyticsError::InsufficientSamples`] when `count` exceeds the
/// number of distinct vertex pairs.
#[instrument(
    name = "analytics.typical_distances",
    err,
    skip(graph, rng),
    fields(vertices = graph.vertex_count()),
)]
pub fn typical_distances<R: Rng + ?Sized>(
    graph: &MultiGraph,
    count: usize,
    rng: &mut R,
) -> Result<Vec<u32>, AnalyticsError> {
    let n = graph.vertex_count();
    let available = pair_count(n);
    if count > available {
        return Err(AnalyticsError::InsufficientSamples {
            requested: count,
            available,
        });
    }

    let mut pairs = BTreeSet::new();
    while pairs.len() < count {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u != v {
            pairs.insert((u.min(v), u.max(v)));
        }
    }

    let mut distances = Vec::with_capacity(count);
    let mut current: Option<(usize, Vec<Option<u32>>)> = None;
    for (source, target) in pairs {
        if current.as_ref().is_none_or(|(cached, _)| *cached != source) {
            current = VertexId::from_index(source).map(|vertex| (source, bfs(graph, vertex)));
        }
        if let Some(distance) = current
            .as_ref()
            .and_then(|(_, row)| row.get(target).copied().flatten())
        {
            distances.push(distance);
        }
    }
    Ok(distances)
}

fn diameter_of(distances: &DistanceMap, vertex_count: usize) -> Result<u32, AnalyticsError> {
    if vertex_count == 0 {
        return Err(AnalyticsError::EmptyGraph);
    }
    let total = pair_count(vertex_count);
    if distances.len() != total {
        return Err(AnalyticsError::Disconnected {
            reachable: distances.len(),
            total,
        });
    }
    Ok(distances.values().copied().max().unwrap_or(0))
}

fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: u64 = values.iter().map(|&d| u64::from(d)).sum();
    Some(total as f64 / values.len() as f64)
}

const fn pair_count(vertex_count: usize) -> usize {
    vertex_count.saturating_mul(vertex_count.saturating_sub(1)) / 2
}

type Row = Vec<((VertexId, VertexId), u32)>;

#[cfg(feature = "parallel")]
fn source_rows(graph: &MultiGraph) -> Vec<Row> {
    use rayon::prelude::*;

    let sources: Vec<VertexId> = graph.vertices().collect();
    sources
        .par_iter()
        .map(|&source| source_row(graph, source))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn source_rows(graph: &MultiGraph) -> Vec<Row> {
    graph
        .vertices()
        .map(|source| source_row(graph, source))
        .collect()
}

/// Distances from `source` to every later vertex.
fn source_row(graph: &MultiGraph, source: VertexId) -> Row {
    bfs(graph, source)
        .into_iter()
        .enumerate()
        .skip(source.index() + 1)
        .filter_map(|(index, distance)| {
            let target = VertexId::from_index(index)?;
            Some(((source, target), distance?))
        })
        .collect()
}

/// Hop counts from `source`, indexed by vertex slot.
fn bfs(graph: &MultiGraph, source: VertexId) -> Vec<Option<u32>> {
    let mut distances = vec![None; graph.vertex_count()];
    let mut queue = VecDeque::new();
    if let Some(slot) = distances.get_mut(source.index()) {
        *slot = Some(0);
        queue.push_back((source, 0_u32));
    }
    while let Some((vertex, distance)) = queue.pop_front() {
        for &next in graph.adjacency_of(vertex) {
            let Some(slot) = distances.get_mut(next.index()) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(distance + 1);
                queue.push_back((next, distance + 1));
            }
        }
    }
    distances
}

#[cfg(test)]
mod tests;
