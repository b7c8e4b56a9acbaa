//! Edge list loaders.

pub use edge_list::{load_edge_list, parse_edge_list};
pub use sqlite::{load_sqlite, read_edges};

use crate::{error::Result, types::EdgeList};
use std::path::Path;

mod edge_list;
mod sqlite;

/// Loads `path` as a SQLite database when its extension says so, as a text edge list
/// otherwise.
pub fn load_edges<P: AsRef<Path>>(path: P) -> Result<EdgeList> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("db") | Some("sqlite") | Some("sqlite3") => load_sqlite(path),
        _ => load_edge_list(path),
    }
}
