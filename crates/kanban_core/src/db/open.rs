//! Board database connections.
//!
//! # Invariants
//! - File databases run in WAL mode; memory databases keep the default journal.
//! - Migration failures close the connection before returning.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a board database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to one connection; gone when it is dropped.
    Memory,
}

impl Display for DbLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(_) => f.write_str("file"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Opens (creating if needed) a board database file.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_db_at(&DbLocation::File(path.as_ref().to_path_buf()))
}

/// Opens a throwaway in-memory board database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_db_at(&DbLocation::Memory)
}

/// Opens `location` and migrates it to the latest schema.
///
/// Emits one `db_open` event with the outcome and elapsed time; paths are
/// never logged.
pub fn open_db_at(location: &DbLocation) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect(location).and_then(|mut conn| {
        prepare(&mut conn, location)?;
        Ok(conn)
    });

    let elapsed_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => {
            info!("event=db_open module=db status=ok mode={location} duration_ms={elapsed_ms}")
        }
        Err(err) => error!(
            "event=db_open module=db status=error mode={location} duration_ms={elapsed_ms} error={err}"
        ),
    }
    result
}

fn connect(location: &DbLocation) -> DbResult<Connection> {
    match location {
        DbLocation::File(path) => Connection::open(path).map_err(|source| DbError::Open {
            path: path.clone(),
            source,
        }),
        DbLocation::Memory => Ok(Connection::open_in_memory()?),
    }
}

fn prepare(conn: &mut Connection, location: &DbLocation) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if matches!(location, DbLocation::File(_)) {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
    }
    apply_migrations(conn)
}

#[cfg(test)]
mod tests {
    use super::{open_db, open_db_at, DbLocation};
    use crate::db::DbError;

    #[test]
    fn file_database_uses_wal_journal() {
        let dir = tempfile::tempdir().unwrap();
        let conn = open_db(dir.path().join("board.sqlite3")).unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_ascii_lowercase(), "wal");
    }

    #[test]
    fn unreachable_file_reports_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("board.sqlite3");
        let err = open_db_at(&DbLocation::File(path.clone())).unwrap_err();
        assert!(matches!(err, DbError::Open { path: failed, .. } if failed == path));
    }
}
