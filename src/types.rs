//! Various types related to graphs.

/// The vertex id type.
pub type VId = i32;

/// An undirected edge given as `(src, dst)`.
pub type Edge = (VId, VId);

/// The edge list a graph is built from.
pub type EdgeList = Vec<Edge>;
