use crate::{error::Result, types::EdgeList};
use std::path::Path;

/// Reads every row of the `edges` table.
///
/// ```sql
/// CREATE TABLE edges (src INT, dst INT);
/// ```
///
/// Extra columns are ignored.
pub fn read_edges(conn: &rusqlite::Connection) -> Result<EdgeList> {
    let mut stmt = conn.prepare("SELECT src, dst FROM edges")?;
    let edges = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<_>>()?;
    Ok(edges)
}

pub fn load_sqlite<P: AsRef<Path>>(path: P) -> Result<EdgeList> {
    let conn = rusqlite::Connection::open_with_flags(
        path,
        rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
    )?;
    read_edges(&conn)
}
