//! Append-only undirected multigraph used as the simulation substrate.
//!
//! Vertices carry dense identifiers starting at 1 and are never removed.
//! Edges are stored as a multiset in insertion order; parallel edges and
//! self-loops are both permitted. The store keeps a running half-edge total
//! so the degree sum is available without rescanning.

use std::{fmt, num::NonZeroU32};

use crate::error::GraphError;

type GraphResult<T> = core::result::Result<T, GraphError>;

/// Identifier of a vertex in a [`MultiGraph`].
///
/// Identifiers are assigned densely in insertion order starting at 1.
///
/// # Examples
/// ```
/// use pagrowth_core::VertexId;
///
/// let id = VertexId::new(3).expect("identifiers are non-zero");
/// assert_eq!(id.get(), 3);
/// assert!(VertexId::new(0).is_none());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(NonZeroU32);

impl VertexId {
    /// Wraps a raw identifier, returning `None` for zero.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    #[rustfmt::skip]
    pub const fn get(self) -> u32 { self.0.get() }

    /// Zero-based slot of this vertex in the store's per-vertex tables.
    pub(crate) const fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|raw| raw.checked_add(1))
            .and_then(Self::new)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One undirected edge instance in canonical form (`low <= high`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Edge {
    low: VertexId,
    high: VertexId,
}

impl Edge {
    /// Canonicalises the endpoints of an undirected edge.
    ///
    /// # Examples
    /// ```
    /// use pagrowth_core::{Edge, VertexId};
    ///
    /// let a = VertexId::new(4).expect("non-zero");
    /// let b = VertexId::new(2).expect("non-zero");
    /// assert_eq!(Edge::new(a, b), Edge::new(b, a));
    /// assert_eq!(Edge::new(a, b).low(), b);
    /// ```
    #[must_use]
    pub fn new(u: VertexId, v: VertexId) -> Self {
        if u <= v {
            Self { low: u, high: v }
        } else {
            Self { low: v, high: u }
        }
    }

    /// Returns the smaller endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn low(&self) -> VertexId { self.low }

    /// Returns the larger endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn high(&self) -> VertexId { self.high }

    /// Returns `true` when both endpoints coincide.
    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.low == self.high
    }
}

/// Mutable undirected multigraph with self-loops.
///
/// # Examples
/// ```
/// use pagrowth_core::MultiGraph;
///
/// let mut graph = MultiGraph::new();
/// let a = graph.add_vertex()?;
/// let b = graph.add_vertex()?;
/// graph.add_edge(a, b)?;
/// graph.add_edge(a, a)?;
/// assert_eq!(graph.degree(a)?, 3);
/// assert_eq!(graph.degree_sum(), 4);
/// # Ok::<(), pagrowth_core::GraphError>(())
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MultiGraph {
    degrees: Vec<u64>,
    adjacency: Vec<Vec<VertexId>>,
    edges: Vec<Edge>,
    degree_sum: u64,
    self_loops: usize,
}

impl MultiGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the Hofstad-A seed: one vertex carrying `m` self-loops.
    ///
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Self::add_vertex`].
    pub fn single_vertex_with_loops(m: u32) -> GraphResult<Self> {
        let mut graph = Self::new();
        let root = graph.add_vertex()?;
        for _ in 0..m {
            graph.add_edge(root, root)?;
        }
        Ok(graph)
    }

    /// Builds the two-vertex seed: vertices 1 and 2 joined by `m` parallel
    /// edge-pairs, i.e. `2m` edges.
    ///
    /// # Errors
    /// Never fails in practice; the signature mirrors [`Self::add_vertex`].
    pub fn vertex_pair_with_parallel_edges(m: u32) -> GraphResult<Self> {
        let mut graph = Self::new();
        let first = graph.add_vertex()?;
        let second = graph.add_vertex()?;
        for _ in 0..m {
            graph.add_edge(first, second)?;
            graph.add_edge(second, first)?;
        }
        Ok(graph)
    }

    /// Appends a vertex with the next identifier and no edges.
    ///
    /// # Errors
    /// Returns [`GraphError::CapacityExceeded`] once `u32` identifiers run out.
    pub fn add_vertex(&mut self) -> GraphResult<VertexId> {
        let id = VertexId::from_index(self.degrees.len()).ok_or(GraphError::CapacityExceeded {
            vertex_count: self.degrees.len(),
        })?;
        self.degrees.push(0);
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Inserts one edge instance between existing vertices. `u == v` adds a
    /// self-loop, which contributes two to the vertex degree.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidVertex`] if either endpoint is absent; the
    /// graph is left untouched in that case.
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> GraphResult<()> {
        self.check(u)?;
        self.check(v)?;
        self.degrees[u.index()] += 1;
        self.degrees[v.index()] += 1;
        self.adjacency[u.index()].push(v);
        if u == v {
            self.self_loops += 1;
        } else {
            self.adjacency[v.index()].push(u);
        }
        self.edges.push(Edge::new(u, v));
        self.degree_sum += 2;
        Ok(())
    }

    /// Returns the number of edge endpoints incident to `v`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidVertex`] if `v` is absent.
    pub fn degree(&self, v: VertexId) -> GraphResult<u64> {
        self.check(v)?;
        Ok(self.degrees[v.index()])
    }

    /// Returns the neighbours of `v` with multiplicity; a self-loop lists `v`
    /// once.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidVertex`] if `v` is absent.
    pub fn neighbours(&self, v: VertexId) -> GraphResult<&[VertexId]> {
        self.check(v)?;
        Ok(&self.adjacency[v.index()])
    }

    /// Iterates vertex identifiers in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.degrees.len()).filter_map(VertexId::from_index)
    }

    /// Iterates `(vertex, degree)` pairs in insertion order.
    pub fn degrees(&self) -> impl Iterator<Item = (VertexId, u64)> + '_ {
        self.vertices().zip(self.degrees.iter().copied())
    }

    /// Returns every edge instance in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.degrees.len() }

    /// Returns the number of edge instances.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns the sum of all degrees in O(1).
    #[must_use]
    #[rustfmt::skip]
    pub fn degree_sum(&self) -> u64 { self.degree_sum }

    /// Returns the number of self-loop edge instances.
    #[must_use]
    #[rustfmt::skip]
    pub fn self_loop_count(&self) -> usize { self.self_loops }

    /// Returns the most recently inserted vertex.
    #[must_use]
    pub fn last_vertex(&self) -> Option<VertexId> {
        self.degrees
            .len()
            .checked_sub(1)
            .and_then(VertexId::from_index)
    }

    /// Returns `true` when `v` has been inserted.
    #[must_use]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.degrees.len()
    }

    /// Adjacency of a vertex known to be present; empty for unknown slots.
    pub(crate) fn adjacency_of(&self, v: VertexId) -> &[VertexId] {
        self.adjacency.get(v.index()).map_or(&[], Vec::as_slice)
    }

    fn check(&self, v: VertexId) -> GraphResult<()> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex {
                vertex: v,
                vertex_count: self.degrees.len(),
            })
        }
    }
}
