//! Journal database access.
//!
//! # Responsibility
//! - Hand out SQLite connections that are ready to hold entry blobs.
//! - Bring older journal files up to the current table layout on open.
//!
//! # Invariants
//! - The layout version of a journal file lives in `PRAGMA user_version`.
//! - A journal file written by a newer release is left untouched and refused.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Journal database failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The journal file was laid out by a newer release.
    JournalTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "journal database error: {err}"),
            Self::JournalTooNew { found, supported } => write!(
                f,
                "journal file uses layout v{found}; this release reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::JournalTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
