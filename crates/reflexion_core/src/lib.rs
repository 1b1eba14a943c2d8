//! Core journal entry store for Reflexion.
//! Owns entry persistence; capture and presentation live outside this crate.

pub mod blob;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use blob::{BlobError, BlobResult, BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{EntryDraft, EntryId, EntryType, EntryValidationError, JournalEntry};
pub use model::mood;
pub use service::journal_service::JournalService;
pub use store::{
    EntryObserver, EntryStore, StoreConfig, StoreError, StoreResult, SubscriptionId,
    DEFAULT_BLOB_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
