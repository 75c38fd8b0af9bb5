//! SQLite state-store backend (feature `sqlite`).
//!
//! Creates a single `rows` table keyed by `order_key` with a JSON-encoded
//! `value` column — a schema general enough for any `set_state`/`delete`
//! agent, the same two methods [`crate::MemoryBackend`] supports. A
//! deployment with a richer schema (typed columns per field) writes its own
//! `StoreBackend` the same way `dt-output`'s `SqliteWriter` has its own
//! fixed-shape tables; this one stays schema-agnostic so it can back any
//! agent type without per-agent migrations.

use std::path::Path;

use rusqlite::Connection;

use dsim_agent::StateUpdate;

use crate::{StoreBackend, StoreError, StoreResult};

pub struct SqliteBackend {
    conn: Connection,
    finished: bool,
}

impl SqliteBackend {
    /// Open (or create) `path` and initialize the schema.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS rows (
                 order_key TEXT PRIMARY KEY,
                 value     TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn, finished: false })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS rows (
                 order_key TEXT PRIMARY KEY,
                 value     TEXT NOT NULL
             );",
        )?;
        Ok(Self { conn, finished: false })
    }

    pub fn get(&self, order_key: &str) -> StoreResult<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare_cached("SELECT value FROM rows WHERE order_key = ?1")?;
        let mut rows = stmt.query(rusqlite::params![order_key])?;
        match rows.next()? {
            Some(row) => {
                let raw: String = row.get(0)?;
                Ok(serde_json::from_str(&raw).ok())
            }
            None => Ok(None),
        }
    }

    /// Checkpoint the WAL and mark this store finished. Idempotent, like
    /// `dt-output`'s writer finalization.
    pub fn finish(&mut self) -> StoreResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

impl StoreBackend for SqliteBackend {
    fn apply(&mut self, update: &StateUpdate) -> StoreResult<()> {
        match update.method.as_str() {
            "set_state" => {
                let value = update.args.first().ok_or_else(|| StoreError::MalformedArgs {
                    store: update.store_name.clone(),
                    method: update.method.clone(),
                    reason: "set_state requires one argument".to_string(),
                })?;
                let raw = serde_json::to_string(value).map_err(|e| StoreError::MalformedArgs {
                    store: update.store_name.clone(),
                    method: update.method.clone(),
                    reason: e.to_string(),
                })?;
                self.conn.execute(
                    "INSERT INTO rows (order_key, value) VALUES (?1, ?2) \
                     ON CONFLICT(order_key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![update.order_key, raw],
                )?;
                Ok(())
            }
            "delete" => {
                self.conn
                    .execute("DELETE FROM rows WHERE order_key = ?1", rusqlite::params![update.order_key])?;
                Ok(())
            }
            other => Err(StoreError::UnknownMethod {
                store: update.store_name.clone(),
                method: other.to_string(),
            }),
        }
    }

    fn begin_transaction(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("BEGIN;")?;
        Ok(())
    }

    fn commit_transaction(&mut self) -> StoreResult<()> {
        self.conn.execute_batch("COMMIT;")?;
        Ok(())
    }
}
