//! Durable key-value byte store contracts and implementations.
//!
//! # Responsibility
//! - Define the storage seam the persistence gateway writes through.
//! - Provide an in-memory store and a SQLite-backed store.
//!
//! # Invariants
//! - `set` replaces the whole value stored under a key.
//! - Implementations are `Send + Sync` so debounced saves can run on the
//!   async runtime.

use crate::db::{open_db, open_db_in_memory, DbError};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),
    /// The store refused the write, e.g. because a quota is exhausted.
    #[error("storage rejected write for `{key}`: {reason}")]
    WriteRejected { key: String, reason: String },
    /// The store could not be read.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The connection is missing the expected schema.
    #[error("key-value store requires table `{0}`")]
    MissingRequiredTable(&'static str),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Byte store addressed by string keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, Vec<u8>>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// Process-local store. Also used to emulate storage failures.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    state: Mutex<MemoryState>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    /// Makes subsequent reads fail with [`StoreError::Unavailable`].
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Makes subsequent writes fail with [`StoreError::WriteRejected`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(StoreError::Unavailable("memory store reads disabled".to_string()));
        }
        Ok(state.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut state = self.state.lock();
        if state.fail_writes {
            return Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        state.entries.insert(key.to_string(), value.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.state.lock().entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps a migrated connection, rejecting connections without the schema.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        if !table_exists(&conn, "kv_entries")? {
            return Err(StoreError::MissingRequiredTable("kv_entries"));
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .lock()
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.conn.lock().execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.conn
            .lock()
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
