//! Concurrent conversion of an edge list into a [`CsrGraph`].
//!
//! The conversion runs in passes, each one a parallel loop that completes before the next
//! one starts:
//!
//! 1. count the unfiltered degree of every vertex with atomic counters;
//! 2. scatter both endpoints of every edge into slots claimed by atomic post-increment;
//! 3. sort, deduplicate and drop self-loops in every neighbor list;
//! 4. copy the filtered lists into the compact neighbor array.
//!
//! Every scratch buffer lives inside [`build`] and is released on every return path.

use crate::{
    error::{try_with_capacity, Error, Result},
    graph::CsrGraph,
    types::{Edge, VId},
};
use log::{debug, info};
use rayon::prelude::*;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

pub(crate) fn build(edges: &[Edge], min_vertex_count: usize) -> Result<CsrGraph> {
    let vertex_count = vertex_count(edges)?.max(min_vertex_count);
    debug!(
        "building csr: {} input edges, {} vertices",
        edges.len(),
        vertex_count
    );
    let unfiltered_offsets = {
        let degrees = collect_degrees(edges, vertex_count)?;
        exclusive_prefix_sum(
            degrees.iter().map(|d| d.load(Ordering::Relaxed)),
            vertex_count,
        )?
    };
    let mut unfiltered_neighbors = scatter_neighbors(edges, &unfiltered_offsets)?;
    debug!("scattered {} endpoints", unfiltered_neighbors.len());
    let degrees = filter_neighbors(&mut unfiltered_neighbors, &unfiltered_offsets)?;
    let row_offsets = exclusive_prefix_sum(degrees.iter().copied(), vertex_count)?;
    let neighbors = compact_neighbors(
        &unfiltered_neighbors,
        &unfiltered_offsets,
        &row_offsets,
    )?;
    let edge_count = neighbors.len() / 2;
    info!(
        "built csr graph: {} vertices, {} edges",
        vertex_count, edge_count
    );
    Ok(CsrGraph::from_parts(
        edge_count,
        row_offsets,
        neighbors,
        degrees,
    ))
}

/// Returns `1 + max(id)`, or 0 for an empty list.
fn vertex_count(edges: &[Edge]) -> Result<usize> {
    if edges.par_iter().any(|&(src, dst)| src < 0 || dst < 0) {
        return Err(Error::invalid_argument("negative vertex id"));
    }
    // Vertex ids must stay representable as `0..vertex_count`.
    if edges
        .par_iter()
        .any(|&(src, dst)| src == VId::MAX || dst == VId::MAX)
    {
        return Err(Error::range_error(format!(
            "vertex id {} leaves no room for the vertex count",
            VId::MAX
        )));
    }
    Ok(edges
        .par_iter()
        .map(|&(src, dst)| src.max(dst) as usize + 1)
        .max()
        .unwrap_or(0))
}

fn atomic_counters(len: usize) -> Result<Vec<AtomicUsize>> {
    let mut counters = try_with_capacity(len)?;
    counters.resize_with(len, || AtomicUsize::new(0));
    Ok(counters)
}

/// Counts every incident endpoint, both directions of every edge included.
fn collect_degrees(edges: &[Edge], vertex_count: usize) -> Result<Vec<AtomicUsize>> {
    let degrees = atomic_counters(vertex_count)?;
    edges.par_iter().for_each(|&(src, dst)| {
        degrees[src as usize].fetch_add(1, Ordering::Relaxed);
        degrees[dst as usize].fetch_add(1, Ordering::Relaxed);
    });
    Ok(degrees)
}

/// Returns `len + 1` offsets, the first one being 0.
pub(crate) fn exclusive_prefix_sum<I>(counts: I, len: usize) -> Result<Vec<usize>>
where
    I: IntoIterator<Item = usize>,
{
    let capacity = len
        .checked_add(1)
        .ok_or_else(|| Error::range_error("overflow found in sum of two values"))?;
    let mut offsets = try_with_capacity(capacity)?;
    let mut total: usize = 0;
    offsets.push(total);
    for count in counts {
        total = total
            .checked_add(count)
            .ok_or_else(|| Error::range_error("overflow found in sum of two values"))?;
        offsets.push(total);
    }
    Ok(offsets)
}

/// Neighbor slots shared by the scatter pass.
///
/// Each vertex owns the slots `offsets[v]..offsets[v + 1]`; a writer claims the next free
/// one with a fetch-and-increment of the vertex cursor, so no two endpoints share a slot.
struct SlotArena {
    cursors: Vec<AtomicUsize>,
    slots: Vec<AtomicI32>,
}

impl SlotArena {
    fn new(offsets: &[usize]) -> Result<Self> {
        let vertex_count = offsets.len() - 1;
        let mut cursors = try_with_capacity(vertex_count)?;
        cursors.extend(offsets[..vertex_count].iter().map(|&o| AtomicUsize::new(o)));
        let len = offsets[vertex_count];
        let mut slots = try_with_capacity(len)?;
        slots.resize_with(len, || AtomicI32::new(0));
        Ok(Self { cursors, slots })
    }

    fn claim(&self, v: VId, value: VId) {
        let slot = self.cursors[v as usize].fetch_add(1, Ordering::Relaxed);
        self.slots[slot].store(value, Ordering::Relaxed);
    }

    fn into_slots(self) -> Result<Vec<VId>> {
        let mut neighbors = try_with_capacity(self.slots.len())?;
        neighbors.extend(self.slots.into_iter().map(AtomicI32::into_inner));
        Ok(neighbors)
    }
}

fn scatter_neighbors(edges: &[Edge], offsets: &[usize]) -> Result<Vec<VId>> {
    let arena = SlotArena::new(offsets)?;
    edges.par_iter().for_each(|&(src, dst)| {
        arena.claim(src, dst);
        arena.claim(dst, src);
    });
    arena.into_slots()
}

/// Splits `data` into the disjoint rows described by `offsets`.
pub(crate) fn split_rows<'a, T>(
    mut data: &'a mut [T],
    offsets: &[usize],
) -> Result<Vec<&'a mut [T]>> {
    let mut rows = try_with_capacity(offsets.len().saturating_sub(1))?;
    for bounds in offsets.windows(2) {
        let (row, rest) = std::mem::take(&mut data).split_at_mut(bounds[1] - bounds[0]);
        rows.push(row);
        data = rest;
    }
    Ok(rows)
}

/// Sorts, deduplicates and removes self-loops in place; returns the filtered degrees.
///
/// The filtered list of vertex `v` is the prefix of its unfiltered row.
fn filter_neighbors(neighbors: &mut [VId], offsets: &[usize]) -> Result<Vec<usize>> {
    let rows = split_rows(neighbors, offsets)?;
    let mut degrees = try_with_capacity(rows.len())?;
    rows.into_par_iter()
        .enumerate()
        .map(|(v, row)| filter_row(row, v as VId))
        .collect_into_vec(&mut degrees);
    Ok(degrees)
}

fn filter_row(row: &mut [VId], v: VId) -> usize {
    row.sort_unstable();
    let mut len = 0;
    for i in 0..row.len() {
        let n = row[i];
        if n != v && (len == 0 || row[len - 1] != n) {
            row[len] = n;
            len += 1;
        }
    }
    len
}

fn compact_neighbors(
    unfiltered: &[VId],
    unfiltered_offsets: &[usize],
    row_offsets: &[usize],
) -> Result<Vec<VId>> {
    let len = row_offsets[row_offsets.len() - 1];
    let mut neighbors = try_with_capacity(len)?;
    neighbors.resize(len, 0);
    split_rows(&mut neighbors, row_offsets)?
        .into_par_iter()
        .enumerate()
        .for_each(|(v, row)| {
            let begin = unfiltered_offsets[v];
            row.copy_from_slice(&unfiltered[begin..begin + row.len()]);
        });
    Ok(neighbors)
}
