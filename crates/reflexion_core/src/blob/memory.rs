//! In-memory blob storage with write-failure injection.

use crate::blob::{BlobError, BlobResult, BlobStore};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct MemoryState {
    blobs: HashMap<String, Vec<u8>>,
    write_failure: Option<String>,
    writes: usize,
}

/// Process-local blob store.
///
/// Useful for tests and previews; nothing survives the process.
#[derive(Default)]
pub struct MemoryBlobStore {
    state: Mutex<MemoryState>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `write` fail with `reason` until cleared.
    pub fn fail_writes(&self, reason: impl Into<String>) {
        self.lock_state().write_failure = Some(reason.into());
    }

    pub fn clear_write_failure(&self) {
        self.lock_state().write_failure = None;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock_state().writes
    }

    fn lock_state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> BlobResult<Option<Vec<u8>>> {
        let state = self.state.lock().map_err(|_| BlobError::Poisoned)?;
        Ok(state.blobs.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> BlobResult<()> {
        let mut state = self.state.lock().map_err(|_| BlobError::Poisoned)?;
        if let Some(reason) = &state.write_failure {
            return Err(BlobError::Injected(reason.clone()));
        }
        state.blobs.insert(key.to_string(), value.to_vec());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_failure_leaves_value_untouched() {
        let store = MemoryBlobStore::new();
        store.write("k", b"kept").unwrap();

        store.fail_writes("disk full");
        let err = store.write("k", b"lost").unwrap_err();
        assert!(matches!(err, BlobError::Injected(ref reason) if reason == "disk full"));
        assert_eq!(store.read("k").unwrap().as_deref(), Some(&b"kept"[..]));

        store.clear_write_failure();
        store.write("k", b"next").unwrap();
        assert_eq!(store.write_count(), 2);
    }
}
