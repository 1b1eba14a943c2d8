//! Journal entry store.
//!
//! # Responsibility
//! - Keep the entry collection mirrored between one durable blob and an
//!   in-memory published snapshot.
//! - Provide upsert, list, filter and first-use seeding operations.
//! - Notify subscribers whenever the published snapshot changes.
//!
//! # Invariants
//! - At most one entry per id; saving an existing id replaces it whole.
//! - Reads are always ordered by `date`, newest first.
//! - The published snapshot changes only after a durable write succeeds.

use crate::blob::BlobError;
use crate::model::entry::{EntryId, EntryValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod codec;
pub mod entry_store;
pub mod observer;

pub use entry_store::{EntryStore, StoreConfig, DEFAULT_BLOB_KEY};
pub use observer::{EntryObserver, SubscriptionId};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entry store error.
#[derive(Debug)]
pub enum StoreError {
    Validation(EntryValidationError),
    Blob(BlobError),
    Encode(serde_json::Error),
    /// The persisted blob exists but is not a valid entry collection.
    Decode(serde_json::Error),
    NotFound(EntryId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Blob(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode journal entries: {err}"),
            Self::Decode(err) => write!(f, "persisted journal entries are unreadable: {err}"),
            Self::NotFound(id) => write!(f, "journal entry not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Blob(err) => Some(err),
            Self::Encode(err) | Self::Decode(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<BlobError> for StoreError {
    fn from(value: BlobError) -> Self {
        Self::Blob(value)
    }
}
