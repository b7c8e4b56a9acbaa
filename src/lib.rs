//! Exact subgraph matching and triangle counting on CSR graphs.
//!
//! Graphs are built once from an edge list into an immutable [`graph::CsrGraph`] and then
//! shared by the parallel kernels: [`triangles::vertex_ranking`] and
//! [`matching::graph_matching`].

pub mod error;
pub mod graph;
pub mod intersection;
pub mod io;
pub mod matching;
pub mod table;
pub mod triangles;
pub mod types;
