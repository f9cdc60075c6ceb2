//! Database connection management

use crate::errors::from_rusqlite;
use qmap_core::errors::Result;
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Turn on foreign keys (cascading deletes depend on them) and WAL
pub fn configure(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so it cannot go through `execute`
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;")
        .map_err(from_rusqlite)
}
