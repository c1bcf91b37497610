//! Key-value slot storage contracts and implementations.
//!
//! # Responsibility
//! - Provide the get/set string storage the task store persists into.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A slot write replaces the whole value; there is no partial update.
//! - `write_slots` applies every entry or none of them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use log::error;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for slot reads/writes and collection encoding.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Collection could not be serialized before a write.
    Encode(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task collection: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot storage requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// String key-value storage with whole-value replacement.
pub trait SlotStorage {
    /// Reads one slot; `None` when it was never written.
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces one slot value.
    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()>;
    /// Replaces several slots together.
    ///
    /// The default writes entries in order; backends with transactions
    /// override it to make the batch atomic.
    fn write_slots(&mut self, entries: &[(&str, &str)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.write_slot(key, value)?;
        }
        Ok(())
    }
}

/// Process-local slot storage.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: HashMap<String, String>,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with raw slot contents.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }
}

impl SlotStorage for MemorySlotStorage {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// SQLite-backed slot storage over the `kv_slots` table.
pub struct SqliteSlotStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotStorage<'conn> {
    /// Constructs storage from a migrated connection.
    ///
    /// # Errors
    /// - Returns `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl SlotStorage for SqliteSlotStorage<'_> {
    fn read_slot(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_slot(&mut self, key: &str, value: &str) -> StoreResult<()> {
        upsert_slot(self.conn, key, value)
    }

    fn write_slots(&mut self, entries: &[(&str, &str)]) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (key, value) in entries {
            if let Err(err) = upsert_slot(&tx, key, value) {
                error!(
                    "event=slot_write module=repo status=error slots={} error={}",
                    entries.len(),
                    err
                );
                return Err(err);
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert_slot(conn: &Connection, key: &str, value: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO kv_slots (key, value)
         VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, value],
    )?;
    Ok(())
}
