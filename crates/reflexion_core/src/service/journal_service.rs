//! Journal capture use-cases.
//!
//! # Invariants
//! - Every recorded entry gets a fresh id; the date is the capture time when
//!   the producer supplied one, otherwise the save time.
//! - Retagging keeps id, date, type, content and file reference.

use crate::blob::BlobStore;
use crate::model::entry::{EntryDraft, EntryId, EntryType, EntryValidationError, JournalEntry};
use crate::store::{EntryStore, StoreError, StoreResult};
use chrono::Utc;
use log::info;
use std::sync::Arc;

/// Use-case wrapper shared by capture producers.
pub struct JournalService<B: BlobStore> {
    store: Arc<EntryStore<B>>,
}

impl<B: BlobStore> JournalService<B> {
    pub fn new(store: Arc<EntryStore<B>>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<EntryStore<B>> {
        &self.store
    }

    /// Records a producer draft as a new entry.
    ///
    /// Returns the stored entry, including its assigned id and date.
    pub fn record(&self, draft: EntryDraft) -> StoreResult<JournalEntry> {
        let entry = draft.into_entry(Utc::now());
        self.store.save(&entry)?;
        Ok(entry)
    }

    /// Records drawn or uploaded artwork.
    ///
    /// `mood` comes from the caller's mood picker or image heuristic and is
    /// stored as-is.
    ///
    /// # Errors
    /// - `Validation(NotArtType)` when `kind` is not an art type.
    pub fn record_art(
        &self,
        image_path: impl Into<String>,
        caption: impl Into<String>,
        kind: EntryType,
        mood: Option<String>,
    ) -> StoreResult<JournalEntry> {
        if !kind.is_art() {
            return Err(EntryValidationError::NotArtType(kind).into());
        }

        let mut draft = EntryDraft::new(kind, caption).file_url(image_path);
        draft.emotion_tag = mood;
        self.record(draft)
    }

    /// Replaces the emotion tag of an existing entry.
    ///
    /// # Errors
    /// - `NotFound` when no entry has `id`.
    pub fn retag(&self, id: EntryId, tag: Option<String>) -> StoreResult<JournalEntry> {
        let mut entry = self.store.get(id).ok_or(StoreError::NotFound(id))?;
        entry.emotion_tag = tag;
        self.store.save(&entry)?;
        info!(
            "event=entry_retag module=service status=ok entry_id={id} tagged={}",
            entry.emotion_tag.is_some()
        );
        Ok(entry)
    }
}
