use super::{
    builder::{exclusive_prefix_sum, split_rows},
    CsrGraph,
};
use crate::{
    error::{try_with_capacity, Result},
    types::VId,
};
use rayon::prelude::*;
use std::cmp::Reverse;

/// Renumbers the vertices by descending degree, ties broken by ascending id.
///
/// Returns the relabeled graph and `old_ids`, where `old_ids[new_id]` is the original id
/// of the vertex now called `new_id`.
pub fn relabel_by_greater_degree(graph: &CsrGraph) -> Result<(CsrGraph, Vec<VId>)> {
    let vertex_count = graph.vertex_count();
    let mut old_ids: Vec<VId> = try_with_capacity(vertex_count)?;
    old_ids.extend(graph.vertices());
    old_ids.par_sort_unstable_by_key(|&v| (Reverse(graph.degree(v)), v));

    let mut new_ids: Vec<VId> = try_with_capacity(vertex_count)?;
    new_ids.resize(vertex_count, 0);
    for (new_id, &old_id) in old_ids.iter().enumerate() {
        new_ids[old_id as usize] = new_id as VId;
    }

    let mut degrees = try_with_capacity(vertex_count)?;
    degrees.extend(old_ids.iter().map(|&v| graph.degree(v)));
    let row_offsets = exclusive_prefix_sum(degrees.iter().copied(), vertex_count)?;

    let mut neighbors: Vec<VId> = try_with_capacity(graph.neighbors().len())?;
    neighbors.resize(graph.neighbors().len(), 0);
    split_rows(&mut neighbors, &row_offsets)?
        .into_par_iter()
        .zip(old_ids.par_iter())
        .for_each(|(row, &old_id)| {
            for (slot, &n) in row.iter_mut().zip(graph.neighbors_of(old_id)) {
                *slot = new_ids[n as usize];
            }
            row.sort_unstable();
        });

    Ok((
        CsrGraph::from_parts(graph.edge_count(), row_offsets, neighbors, degrees),
        old_ids,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relabel_star() {
        // 3 is the center of the star.
        let graph = CsrGraph::from_edges(&[(3, 0), (3, 1), (3, 2), (0, 1)]).unwrap();
        let (relabeled, old_ids) = relabel_by_greater_degree(&graph).unwrap();
        assert_eq!(old_ids, vec![3, 0, 1, 2]);
        assert_eq!(relabeled.degrees(), &[3, 2, 2, 1]);
        assert_eq!(relabeled.neighbors_of(0), &[1, 2, 3]);
        assert_eq!(relabeled.neighbors_of(1), &[0, 2]);
        assert_eq!(relabeled.neighbors_of(3), &[0]);
        assert_eq!(relabeled.edge_count(), graph.edge_count());
    }

    #[test]
    fn test_relabel_preserves_edges() {
        let graph =
            CsrGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 4), (2, 4)])
                .unwrap();
        let (relabeled, old_ids) = relabel_by_greater_degree(&graph).unwrap();
        let mut edges: Vec<_> = relabeled
            .edges()
            .map(|(u, v)| {
                let (u, v) = (old_ids[u as usize], old_ids[v as usize]);
                (u.min(v), u.max(v))
            })
            .collect();
        edges.sort_unstable();
        assert_eq!(edges, graph.edges().collect::<Vec<_>>());
    }
}
