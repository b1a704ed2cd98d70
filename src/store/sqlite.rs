//! SQLite-backed [`BlobStore`].

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::blob::Blob;
use crate::utils::config::STORE_BUSY_TIMEOUT_MS;
use crate::{ItemKind, Repository, StorageMode};

use super::{BlobStore, SCHEMA, UPSERT_DOCUMENT_SQL, WAL_PRAGMAS};

/// Stored row as read back: (timestamp, data).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument {
    pub timestamp: String,
    pub data: String,
}

/// One connection serialized behind a mutex; index workers take turns on it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

/// Open or create the store DB and ensure schema + WAL.
pub fn open_store(path: &Path) -> Result<SqliteStore> {
    let conn = Connection::open(path)
        .with_context(|| format!("open store database {}", path.display()))?;
    conn.busy_timeout(Duration::from_millis(STORE_BUSY_TIMEOUT_MS))
        .context("set busy timeout")?;
    apply_wal_and_schema(&conn)?;
    Ok(SqliteStore::from_connection(conn))
}

/// Open an in-memory store with the same schema (no WAL pragmas needed).
pub fn open_store_in_memory() -> Result<SqliteStore> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(SqliteStore::from_connection(conn))
}

impl SqliteStore {
    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("store connection poisoned by a panicked writer"))
    }

    /// Read back one document, if stored.
    pub fn load_document(
        &self,
        mode: StorageMode,
        repo: &Repository,
        kind: ItemKind,
        id: &str,
    ) -> Result<Option<StoredDocument>> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT timestamp, data FROM documents
             WHERE storage = ?1 AND repository = ?2 AND kind = ?3 AND id = ?4",
            (mode.as_str(), repo.full_name(), kind.as_str(), id),
            |row| {
                Ok(StoredDocument {
                    timestamp: row.get(0)?,
                    data: row.get(1)?,
                })
            },
        )
        .optional()
        .context("load document")
    }

    /// Number of documents stored for `repo` under `mode`.
    pub fn document_count(&self, mode: StorageMode, repo: &Repository) -> Result<usize> {
        let conn = self.lock()?;
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE storage = ?1 AND repository = ?2",
                (mode.as_str(), repo.full_name()),
                |row| row.get(0),
            )
            .context("count documents")?;
        Ok(n.max(0) as usize)
    }
}

impl BlobStore for SqliteStore {
    fn store(&self, mode: StorageMode, repo: &Repository, blob: &Blob) -> Result<()> {
        let data = blob.encode()?;
        let conn = self.lock()?;
        conn.execute(
            UPSERT_DOCUMENT_SQL,
            (
                mode.as_str(),
                repo.full_name(),
                blob.kind.as_str(),
                blob.id.as_str(),
                blob.timestamp.to_rfc3339(),
                data,
            ),
        )
        .with_context(|| {
            format!(
                "store {} {} for {} ({})",
                blob.kind,
                blob.id,
                repo.pretty_name(),
                mode
            )
        })?;
        Ok(())
    }
}
