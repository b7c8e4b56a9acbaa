//! The CSR graph.

pub use relabel::relabel_by_greater_degree;

use crate::{
    error::{Error, Result},
    types::{Edge, VId},
};
use std::convert::TryFrom;

pub(crate) mod builder;
mod relabel;

/// An undirected graph in compressed sparse row form.
///
/// ```text
/// row_offsets: | 0 | d0 | d0+d1 | ... | 2 * edge_count |
///                |    |
///                v    v
/// neighbors:   | N(0) ascending | N(1) ascending | ... |
/// ```
///
/// Every neighbor list is strictly ascending and never contains its own vertex.
/// The graph is immutable once built, so it can be shared by any number of readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    edge_count: usize,
    row_offsets: Vec<usize>,
    neighbors: Vec<VId>,
    degrees: Vec<usize>,
}

impl CsrGraph {
    /// Builds the graph from an undirected edge list.
    ///
    /// The vertex count is `1 + max(id)`. Duplicated edges and self-loops are removed.
    /// Fails with [`Error::InvalidArgument`] on an empty list or a negative id, and with
    /// [`Error::RangeError`] on the id `VId::MAX`.
    pub fn from_edges(edges: &[Edge]) -> Result<Self> {
        if edges.is_empty() {
            return Err(Error::invalid_argument("empty edge list"));
        }
        builder::build(edges, 0)
    }

    /// Builds the graph from adjacency lists, `lists[u]` holding the neighbors of `u`.
    ///
    /// The graph has at least `lists.len()` vertices, so trailing isolated vertices survive.
    /// Lists are symmetrized: an entry in either direction creates the edge.
    pub fn from_adjacency<L: AsRef<[VId]>>(lists: &[L]) -> Result<Self> {
        VId::try_from(lists.len())
            .map_err(|_| Error::range_error("too many adjacency lists for the vertex id type"))?;
        let edges: Vec<Edge> = lists
            .iter()
            .enumerate()
            .flat_map(|(u, ns)| ns.as_ref().iter().map(move |&n| (u as VId, n)))
            .collect();
        builder::build(&edges, lists.len())
    }

    pub(crate) fn from_parts(
        edge_count: usize,
        row_offsets: Vec<usize>,
        neighbors: Vec<VId>,
        degrees: Vec<usize>,
    ) -> Self {
        debug_assert_eq!(row_offsets.len(), degrees.len() + 1);
        debug_assert_eq!(neighbors.len(), 2 * edge_count);
        Self {
            edge_count,
            row_offsets,
            neighbors,
            degrees,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.degrees.len()
    }

    /// Number of undirected edges, each counted once.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    pub fn row_offsets(&self) -> &[usize] {
        &self.row_offsets
    }

    pub fn neighbors(&self) -> &[VId] {
        &self.neighbors
    }

    pub fn degrees(&self) -> &[usize] {
        &self.degrees
    }

    pub fn degree(&self, v: VId) -> usize {
        self.degrees[v as usize]
    }

    /// The ascending neighbor list of `v`.
    pub fn neighbors_of(&self, v: VId) -> &[VId] {
        let v = v as usize;
        &self.neighbors[self.row_offsets[v]..self.row_offsets[v + 1]]
    }

    pub fn has_edge(&self, u: VId, v: VId) -> bool {
        self.neighbors_of(u).binary_search(&v).is_ok()
    }

    /// All vertex ids in ascending order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VId> {
        0..self.vertex_count() as VId
    }

    /// Every edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.vertices().flat_map(move |u| {
            self.neighbors_of(u)
                .iter()
                .filter(move |&&v| u < v)
                .map(move |&v| (u, v))
        })
    }

    pub fn max_degree(&self) -> usize {
        self.degrees.iter().copied().max().unwrap_or(0)
    }
}

impl std::fmt::Display for CsrGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+---------------------------------------------+")?;
        writeln!(f, "|{:^45}|", format!("vertex_count: {}", self.vertex_count()))?;
        writeln!(f, "|{:^45}|", format!("edge_count: {}", self.edge_count()))?;
        writeln!(f, "|{:^45}|", format!("max_degree: {}", self.max_degree()))?;
        write!(f, "+---------------------------------------------+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges() {
        let graph = CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.row_offsets(), &[0, 2, 4, 7, 8]);
        assert_eq!(graph.neighbors(), &[1, 2, 0, 2, 0, 1, 3, 2]);
        assert_eq!(graph.degrees(), &[2, 2, 3, 1]);
        assert!(graph.has_edge(3, 2));
        assert!(!graph.has_edge(3, 0));
        assert_eq!(
            graph.edges().collect::<Vec<_>>(),
            vec![(0, 1), (0, 2), (1, 2), (2, 3)]
        );
    }

    #[test]
    fn test_from_adjacency_keeps_isolated_vertices() {
        let graph = CsrGraph::from_adjacency(&[vec![1], vec![0], vec![]]).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors_of(2), &[] as &[VId]);
    }

    #[test]
    fn test_from_adjacency_symmetrizes() {
        let graph = CsrGraph::from_adjacency(&[vec![1, 2], vec![], vec![]]).unwrap();
        assert_eq!(graph.neighbors_of(1), &[0]);
        assert_eq!(graph.neighbors_of(2), &[0]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_empty_adjacency() {
        let lists: &[Vec<VId>] = &[];
        let graph = CsrGraph::from_adjacency(lists).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.row_offsets(), &[0]);
        assert_eq!(graph.max_degree(), 0);
    }
}
