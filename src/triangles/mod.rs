//! Triangle counting.
//!
//! A triangle is an unordered triple of mutually adjacent vertices. Each one is found
//! exactly once through its canonical ordering `u > v > w`: neighbor lists are ascending,
//! so the scans over `N(u)` and `N(v)` stop at the vertex itself.

pub use descriptor::{Descriptor, Relabel, Task};

use crate::{
    error::{try_with_capacity, Result},
    graph::{relabel_by_greater_degree, CsrGraph},
    intersection::{for_each_common, Intersect, IntersectionStrategy},
    types::VId,
};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

mod descriptor;

/// The result of a triangle counting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VertexRanking {
    /// Number of triangles in the graph.
    Global(u64),
    /// Number of triangles each vertex belongs to, indexed by vertex id.
    Local(Vec<u64>),
}

impl VertexRanking {
    pub fn global_rank(&self) -> Option<u64> {
        match self {
            VertexRanking::Global(count) => Some(*count),
            VertexRanking::Local(_) => None,
        }
    }

    pub fn ranks(&self) -> Option<&[u64]> {
        match self {
            VertexRanking::Global(_) => None,
            VertexRanking::Local(ranks) => Some(ranks),
        }
    }
}

/// Counts triangles with the intersection strategy detected for the running CPU.
pub fn vertex_ranking(descriptor: &Descriptor, graph: &CsrGraph) -> Result<VertexRanking> {
    vertex_ranking_with(descriptor, graph, &IntersectionStrategy::detect())
}

/// Counts triangles with the given intersection routine.
pub fn vertex_ranking_with<I: Intersect>(
    descriptor: &Descriptor,
    graph: &CsrGraph,
    intersector: &I,
) -> Result<VertexRanking> {
    if graph.is_empty() {
        return Ok(match descriptor.task() {
            Task::Global => VertexRanking::Global(0),
            Task::Local => VertexRanking::Local(vec![]),
        });
    }
    let average_degree = graph.edge_count() / graph.vertex_count();
    let dense = average_degree >= descriptor.average_degree_threshold();
    debug!(
        "triangle counting: average degree {}, {} path",
        average_degree,
        if dense { "dense" } else { "sparse" }
    );
    let relabeled = if dense && descriptor.relabel() == Relabel::Yes {
        match relabel_by_greater_degree(graph) {
            Ok(relabeled) => Some(relabeled),
            Err(e) => {
                warn!("relabeling failed, counting on the original graph: {}", e);
                None
            }
        }
    } else {
        None
    };
    let (counted, old_ids) = match &relabeled {
        Some((g, old_ids)) => (g, Some(old_ids)),
        None => (graph, None),
    };
    Ok(match descriptor.task() {
        Task::Global => VertexRanking::Global(if dense {
            count_dense(counted, intersector)
        } else {
            count_sparse(counted)
        }),
        Task::Local => {
            let ranks = count_local(counted)?;
            VertexRanking::Local(match old_ids {
                Some(old_ids) => {
                    let mut original: Vec<u64> = try_with_capacity(ranks.len())?;
                    original.resize(ranks.len(), 0);
                    for (&old_id, &rank) in old_ids.iter().zip(&ranks) {
                        original[old_id as usize] = rank;
                    }
                    original
                }
                None => ranks,
            })
        }
    })
}

/// Merge-scans `N(u)` once per pair `v < u`, suited to short neighbor lists.
fn count_sparse(graph: &CsrGraph) -> u64 {
    (0..graph.vertex_count() as VId)
        .into_par_iter()
        .map(|u| {
            let neigh_u = graph.neighbors_of(u);
            let mut triangles = 0;
            for &v in neigh_u.iter().take_while(|&&v| v < u) {
                let mut p = 0;
                for &w in graph.neighbors_of(v).iter().take_while(|&&w| w < v) {
                    while p < neigh_u.len() && neigh_u[p] < w {
                        p += 1;
                    }
                    if p < neigh_u.len() && neigh_u[p] == w {
                        triangles += 1;
                    }
                }
            }
            triangles
        })
        .sum()
}

/// Intersects `N(u)` with the part of `N(v)` below `v`, for every `v < u`.
fn count_dense<I: Intersect>(graph: &CsrGraph, intersector: &I) -> u64 {
    (0..graph.vertex_count() as VId)
        .into_par_iter()
        .filter(|&u| graph.degree(u) >= 2)
        .map(|u| {
            let neigh_u = graph.neighbors_of(u);
            neigh_u
                .iter()
                .take_while(|&&v| v < u)
                .map(|&v| intersector.intersection_size(neigh_u, lower_neighbors(graph, v)) as u64)
                .sum::<u64>()
        })
        .sum()
}

fn count_local(graph: &CsrGraph) -> Result<Vec<u64>> {
    let mut ranks = try_with_capacity(graph.vertex_count())?;
    ranks.resize_with(graph.vertex_count(), || AtomicU64::new(0));
    (0..graph.vertex_count() as VId)
        .into_par_iter()
        .for_each(|u| {
            let neigh_u = graph.neighbors_of(u);
            for &v in neigh_u.iter().take_while(|&&v| v < u) {
                for_each_common(neigh_u, lower_neighbors(graph, v), |w| {
                    ranks[u as usize].fetch_add(1, Ordering::Relaxed);
                    ranks[v as usize].fetch_add(1, Ordering::Relaxed);
                    ranks[w as usize].fetch_add(1, Ordering::Relaxed);
                });
            }
        });
    let mut counts = try_with_capacity(ranks.len())?;
    counts.extend(ranks.into_iter().map(AtomicU64::into_inner));
    Ok(counts)
}

/// The neighbors of `v` with a smaller id.
fn lower_neighbors(graph: &CsrGraph, v: VId) -> &[VId] {
    let neigh_v = graph.neighbors_of(v);
    &neigh_v[..neigh_v.partition_point(|&w| w < v)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::LaneWidth;

    fn k4() -> CsrGraph {
        CsrGraph::from_edges(&[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]).unwrap()
    }

    #[test]
    fn test_sparse_and_dense_agree() {
        let bowtie = CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)])
            .unwrap();
        let cycle = CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]).unwrap();
        let strategy = IntersectionStrategy::scalar();
        for (graph, expected) in vec![(k4(), 4), (bowtie, 2), (cycle, 0)] {
            assert_eq!(count_sparse(&graph), expected);
            assert_eq!(count_dense(&graph, &strategy), expected);
        }
    }

    #[test]
    fn test_local_k4() {
        assert_eq!(count_local(&k4()).unwrap(), vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_lower_neighbors() {
        let graph = k4();
        assert_eq!(lower_neighbors(&graph, 2), &[0, 1]);
        assert!(lower_neighbors(&graph, 0).is_empty());
    }

    #[test]
    fn test_threshold_selects_path() {
        let graph = k4();
        for &width in LaneWidth::ALL.iter() {
            let strategy = IntersectionStrategy::new(width);
            for threshold in vec![0, 1, 4, usize::MAX] {
                let descriptor = Descriptor::new().set_average_degree_threshold(threshold);
                assert_eq!(
                    vertex_ranking_with(&descriptor, &graph, &strategy).unwrap(),
                    VertexRanking::Global(4)
                );
            }
        }
    }

    #[test]
    fn test_empty_graph() {
        let lists: &[Vec<VId>] = &[];
        let graph = CsrGraph::from_adjacency(lists).unwrap();
        let descriptor = Descriptor::new().set_task(Task::Local);
        assert_eq!(
            vertex_ranking(&descriptor, &graph).unwrap(),
            VertexRanking::Local(vec![])
        );
    }
}
