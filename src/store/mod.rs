//! Document store: schema, open, idempotent blob upsert.

mod sqlite;

pub use sqlite::{SqliteStore, StoredDocument, open_store, open_store_in_memory};

use anyhow::Result;

use crate::blob::Blob;
use crate::{Repository, StorageMode};

/// Destination for synchronized items. Shared by all index workers.
///
/// `store` must be an idempotent upsert keyed by `(mode, repository, blob.kind, blob.id)`:
/// writing the same key twice leaves one document holding the latest write.
pub trait BlobStore: Send + Sync {
    fn store(&self, mode: StorageMode, repo: &Repository, blob: &Blob) -> Result<()>;
}

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Upsert for the documents table; the latest write wins.
pub(crate) const UPSERT_DOCUMENT_SQL: &str = r#"
INSERT INTO documents (storage, repository, kind, id, timestamp, data)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
ON CONFLICT (storage, repository, kind, id)
DO UPDATE SET timestamp = excluded.timestamp, data = excluded.data
"#;

/// Schema for the documents table.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    storage TEXT NOT NULL,
    repository TEXT NOT NULL,
    kind TEXT NOT NULL,
    id TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (storage, repository, kind, id)
);
CREATE INDEX IF NOT EXISTS idx_documents_repository ON documents(repository, storage);
"#;
