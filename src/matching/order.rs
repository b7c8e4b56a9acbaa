use crate::{graph::CsrGraph, types::VId};
use std::cmp::Reverse;

/// The order in which pattern vertices get mapped, with the constraints each depth checks.
///
/// The first vertex is the one with the highest degree. Each following vertex is the
/// unvisited one with the most already visited neighbors, ties broken by higher degree and
/// then lower id. A disconnected pattern restarts from its highest remaining degree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct VisitOrder {
    order: Vec<VId>,
    degrees: Vec<usize>,
    /// Depths of the earlier pattern vertices adjacent to the vertex at each depth.
    mapped_neighbors: Vec<Vec<usize>>,
    /// Depths of the earlier pattern vertices not adjacent to it.
    mapped_non_neighbors: Vec<Vec<usize>>,
}

impl VisitOrder {
    pub(super) fn new(pattern: &CsrGraph) -> Self {
        let n = pattern.vertex_count();
        let mut visited = vec![false; n];
        let mut links = vec![0usize; n];
        let mut order = Vec::with_capacity(n);
        while let Some(next) = pattern
            .vertices()
            .filter(|&v| !visited[v as usize])
            .max_by_key(|&v| (links[v as usize], pattern.degree(v), Reverse(v)))
        {
            visited[next as usize] = true;
            for &w in pattern.neighbors_of(next) {
                links[w as usize] += 1;
            }
            order.push(next);
        }

        let (mut mapped_neighbors, mut mapped_non_neighbors) =
            (Vec::with_capacity(n), Vec::with_capacity(n));
        for (depth, &v) in order.iter().enumerate() {
            let (neighbors, non_neighbors): (Vec<usize>, Vec<usize>) =
                (0..depth).partition(|&j| pattern.has_edge(order[j], v));
            mapped_neighbors.push(neighbors);
            mapped_non_neighbors.push(non_neighbors);
        }
        Self {
            degrees: order.iter().map(|&v| pattern.degree(v)).collect(),
            order,
            mapped_neighbors,
            mapped_non_neighbors,
        }
    }

    pub(super) fn len(&self) -> usize {
        self.order.len()
    }

    /// The pattern vertex mapped at `depth`.
    pub(super) fn vertex(&self, depth: usize) -> VId {
        self.order[depth]
    }

    pub(super) fn degree(&self, depth: usize) -> usize {
        self.degrees[depth]
    }

    pub(super) fn mapped_neighbors(&self, depth: usize) -> &[usize] {
        &self.mapped_neighbors[depth]
    }

    pub(super) fn mapped_non_neighbors(&self, depth: usize) -> &[usize] {
        &self.mapped_non_neighbors[depth]
    }
}
