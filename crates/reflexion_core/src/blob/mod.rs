//! Durable key-value blob storage.
//!
//! # Responsibility
//! - Define the narrow contract the entry store persists through.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `write` replaces the whole value for a key atomically; readers observe
//!   either the previous or the new value.
//! - A missing key reads as `None`, not as an error.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;

pub type BlobResult<T> = Result<T, BlobError>;

/// Storage-level failures for blob reads and writes.
#[derive(Debug)]
pub enum BlobError {
    Db(DbError),
    /// A previous holder of the storage lock panicked.
    Poisoned,
    /// Failure injected by a test double.
    Injected(String),
}

impl Display for BlobError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Poisoned => write!(f, "blob storage lock poisoned"),
            Self::Injected(reason) => write!(f, "blob write rejected: {reason}"),
        }
    }
}

impl Error for BlobError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Poisoned | Self::Injected(_) => None,
        }
    }
}

impl From<DbError> for BlobError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for BlobError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable home for named blobs.
pub trait BlobStore: Send + Sync {
    fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>>;
    fn write(&self, key: &str, value: &[u8]) -> BlobResult<()>;
}

impl<B: BlobStore + ?Sized> BlobStore for std::sync::Arc<B> {
    fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        (**self).write(key, value)
    }
}
