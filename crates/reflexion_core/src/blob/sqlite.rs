//! SQLite-backed blob storage over the `kv_blobs` table.

use crate::blob::{BlobError, BlobResult, BlobStore};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Blob store owning one migrated SQLite connection.
pub struct SqliteBlobStore {
    conn: Mutex<Connection>,
}

impl SqliteBlobStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a journal database file.
    pub fn open(path: impl AsRef<Path>) -> BlobResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> BlobResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl BlobStore for SqliteBlobStore {
    fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().map_err(|_| BlobError::Poisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        let conn = self.conn.lock().map_err(|_| BlobError::Poisoned)?;
        // Single statement: SQLite applies it atomically.
        conn.execute(
            "INSERT INTO kv_blobs (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}
