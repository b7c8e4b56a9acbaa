//! Subgraph isomorphism.
//!
//! Enumerates the injective mappings of the pattern vertices onto target vertices that
//! keep every pattern edge (`Kind::NonInduced`), and for `Kind::Induced` also keep every
//! pattern non-edge. The search runs in parallel over the candidates of the first visited
//! pattern vertex.

use crate::{
    error::{try_with_capacity, Error, Result},
    graph::CsrGraph,
    table::Table,
    types::VId,
};
use log::{debug, info};
use order::VisitOrder;
use rayon::prelude::*;
use search::Search;
use std::{
    convert::TryFrom,
    sync::atomic::{AtomicUsize, Ordering},
};

mod order;
mod search;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Pattern non-edges must map to target non-edges.
    Induced,
    /// Only pattern edges are checked.
    NonInduced,
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Induced
    }
}

/// Options of a matching run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    kind: Kind,
    semantic_match: bool,
    max_match_count: i64,
}

impl Descriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Label-aware matching is not supported; setting it makes every run fail.
    pub fn set_semantic_match(mut self, semantic_match: bool) -> Self {
        self.semantic_match = semantic_match;
        self
    }

    /// Stops after this many matches. 0 means unbounded.
    pub fn set_max_match_count(mut self, max_match_count: i64) -> Self {
        self.max_match_count = max_match_count;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn semantic_match(&self) -> bool {
        self.semantic_match
    }

    pub fn max_match_count(&self) -> i64 {
        self.max_match_count
    }
}

/// The matches found by [`graph_matching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphMatchingResult {
    vertex_match: Table,
    match_count: usize,
}

impl GraphMatchingResult {
    /// One row per match, with one column per pattern vertex: `row[p]` is the target vertex
    /// pattern vertex `p` maps to. Row order is unspecified.
    pub fn vertex_match(&self) -> &Table {
        &self.vertex_match
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    pub fn into_vertex_match(self) -> Table {
        self.vertex_match
    }
}

/// The matches still allowed when a bound is set.
struct Budget(Option<AtomicUsize>);

impl Budget {
    fn new(max_match_count: usize) -> Self {
        Budget(if max_match_count == 0 {
            None
        } else {
            Some(AtomicUsize::new(max_match_count))
        })
    }

    /// Takes one match from the budget, or returns `false` when none is left.
    fn claim(&self) -> bool {
        match &self.0 {
            None => true,
            Some(left) => left
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok(),
        }
    }

    fn is_spent(&self) -> bool {
        matches!(&self.0, Some(left) if left.load(Ordering::Acquire) == 0)
    }
}

fn check(descriptor: &Descriptor, target: &CsrGraph, pattern: &CsrGraph) -> Result<usize> {
    let max_match_count = usize::try_from(descriptor.max_match_count()).map_err(|_| {
        Error::invalid_argument(format!(
            "max_match_count must be non-negative, got {}",
            descriptor.max_match_count()
        ))
    })?;
    if descriptor.semantic_match() {
        return Err(Error::unsupported("semantic matching"));
    }
    if target.is_empty() {
        return Err(Error::invalid_argument("empty target graph"));
    }
    if pattern.is_empty() {
        return Err(Error::invalid_argument("empty pattern graph"));
    }
    Ok(max_match_count)
}

/// Finds the embeddings of `pattern` in `target`.
///
/// A pattern with more vertices than the target has no match. With a positive
/// `max_match_count` exactly `min(max_match_count, total)` rows are returned. Running out
/// of memory while collecting rows gives [`Error::OutOfMemory`].
pub fn graph_matching(
    descriptor: &Descriptor,
    target: &CsrGraph,
    pattern: &CsrGraph,
) -> Result<GraphMatchingResult> {
    let max_match_count = check(descriptor, target, pattern)?;
    let column_count = pattern.vertex_count();
    if column_count > target.vertex_count() {
        debug!(
            "pattern has {} vertices, target only {}",
            column_count,
            target.vertex_count()
        );
        return Ok(GraphMatchingResult {
            vertex_match: Table::new(column_count),
            match_count: 0,
        });
    }

    let order = VisitOrder::new(pattern);
    debug!(
        "visit order: {:?}",
        (0..order.len()).map(|k| order.vertex(k)).collect::<Vec<_>>()
    );
    let mut roots: Vec<VId> = try_with_capacity(target.vertex_count())?;
    roots.extend(
        target
            .vertices()
            .filter(|&v| target.degree(v) >= order.degree(0)),
    );
    let budget = Budget::new(max_match_count);
    let vertex_match = roots
        .par_iter()
        .map_init(
            || Search::new(target, &order, descriptor.kind()),
            |search, &root| -> Result<Table> {
                let search = search
                    .as_mut()
                    .map_err(|e| Error::OutOfMemory(e.to_string()))?;
                let mut rows = Table::new(column_count);
                if budget.is_spent() {
                    return Ok(rows);
                }
                search.restart(root);
                for row in search {
                    let row = row?;
                    if !budget.claim() {
                        break;
                    }
                    rows.push_row(&row)?;
                }
                Ok(rows)
            },
        )
        .try_reduce(
            || Table::new(column_count),
            |mut acc, mut rows| {
                acc.append(&mut rows)?;
                Ok(acc)
            },
        )?;
    let match_count = vertex_match.row_count();
    info!("found {} matches", match_count);
    Ok(GraphMatchingResult {
        vertex_match,
        match_count,
    })
}
