//! Blob-backed entry store.
//!
//! # Responsibility
//! - Upsert entries with a full read-modify-write of the persisted blob.
//! - Serve sorted reads and exact-tag projections.
//! - Seed one welcome entry on first use.
//!
//! # Invariants
//! - Writers and `refresh` are serialized by `write_lock`; the last writer
//!   for an id wins and a reload never publishes over a newer save.
//! - `published` is replaced only after the blob write returns `Ok`.
//! - Observers run after `write_lock` is released, so they may call back
//!   into the store.
//! - `save` never overwrites an unreadable blob; only `ensure_seeded` and
//!   `recover_unreadable` replace it.

use crate::blob::{BlobStore, SqliteBlobStore};
use crate::model::entry::{EntryId, EntryType, JournalEntry};
use crate::store::codec::{decode_entries, encode_entries, sort_newest_first};
use crate::store::observer::{EntryObserver, ObserverRegistry, SubscriptionId};
use crate::store::{StoreError, StoreResult};
use chrono::Utc;
use log::{error, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Instant;

/// Durable key of the entry collection blob.
pub const DEFAULT_BLOB_KEY: &str = "SavedJournalEntries";

/// Store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key holding the entry collection blob.
    pub blob_key: String,
    /// Run `ensure_seeded` while opening.
    pub seed_on_open: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            blob_key: DEFAULT_BLOB_KEY.to_string(),
            seed_on_open: true,
        }
    }
}

/// Entry collection mirrored between a durable blob and memory.
///
/// Construct once per process and share it (`Arc<EntryStore<_>>`) with
/// producers and presentation code.
pub struct EntryStore<B: BlobStore> {
    blobs: B,
    blob_key: String,
    write_lock: Mutex<()>,
    published: RwLock<Vec<JournalEntry>>,
    observers: ObserverRegistry,
}

impl EntryStore<SqliteBlobStore> {
    /// Opens a store over a journal database file.
    pub fn open_sqlite(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let blobs = SqliteBlobStore::open(path)?;
        Self::open(blobs, config)
    }
}

impl<B: BlobStore> EntryStore<B> {
    /// Builds the store, loads the persisted collection and optionally seeds.
    ///
    /// An unreadable blob opens as empty; with `seed_on_open` it is replaced
    /// by the welcome entry.
    ///
    /// # Errors
    /// - Storage read or write failures.
    pub fn open(blobs: B, config: StoreConfig) -> StoreResult<Self> {
        let store = Self {
            blobs,
            blob_key: config.blob_key,
            write_lock: Mutex::new(()),
            published: RwLock::new(Vec::new()),
            observers: ObserverRegistry::default(),
        };

        store.refresh()?;
        if config.seed_on_open {
            store.ensure_seeded()?;
        }

        info!(
            "event=store_open module=store status=ok entry_count={} seeded_on_open={}",
            store.entries().len(),
            config.seed_on_open
        );
        Ok(store)
    }

    /// Underlying blob storage.
    pub fn blob_store(&self) -> &B {
        &self.blobs
    }

    pub fn blob_key(&self) -> &str {
        &self.blob_key
    }

    /// Inserts `entry`, or replaces the stored entry with the same id.
    ///
    /// # Errors
    /// - `Validation` when the entry violates per-type requirements.
    /// - `Decode` when the existing blob is unreadable; it is left intact.
    /// - `Encode`/`Blob` when the new collection cannot be written.
    ///
    /// On error neither the blob nor the published snapshot changes.
    pub fn save(&self, entry: &JournalEntry) -> StoreResult<()> {
        entry.validate()?;
        {
            let guard = self.lock_writes();
            let stored = self.load_stored()?;
            self.upsert_locked(stored, entry, &guard)?;
        }
        self.notify_observers();
        Ok(())
    }

    /// Returns all persisted entries, newest first.
    ///
    /// Degrades to an empty list when the blob is missing or unreadable;
    /// use `try_list` to tell those cases apart.
    pub fn list(&self) -> Vec<JournalEntry> {
        self.try_list().unwrap_or_else(|err| {
            warn!("event=entry_list module=store status=degraded error={err}");
            Vec::new()
        })
    }

    /// Returns all persisted entries, newest first.
    ///
    /// # Errors
    /// - `Decode` for a corrupt blob; `Blob` when storage cannot be read.
    pub fn try_list(&self) -> StoreResult<Vec<JournalEntry>> {
        let mut entries = self.load_stored()?;
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    /// Reloads the durable collection and republishes it.
    ///
    /// An unreadable blob publishes an empty collection; storage read
    /// failures are returned and leave the snapshot untouched.
    pub fn refresh(&self) -> StoreResult<()> {
        {
            let _guard = self.lock_writes();
            let entries = match self.try_list() {
                Ok(entries) => entries,
                Err(StoreError::Decode(err)) => {
                    warn!("event=store_refresh module=store status=degraded error={err}");
                    Vec::new()
                }
                Err(err) => {
                    error!("event=store_refresh module=store status=error error={err}");
                    return Err(err);
                }
            };
            self.publish(entries);
        }
        self.notify_observers();
        Ok(())
    }

    /// Entries whose tag equals `tag` exactly; all entries for `None`.
    pub fn filter_by_tag(&self, tag: Option<&str>) -> Vec<JournalEntry> {
        let entries = self.list();
        match tag {
            None => entries,
            Some(tag) => entries.into_iter().filter(|e| e.has_tag(tag)).collect(),
        }
    }

    /// Entries produced by one capture flow, newest first.
    pub fn filter_by_type(&self, kind: EntryType) -> Vec<JournalEntry> {
        self.list().into_iter().filter(|e| e.kind == kind).collect()
    }

    pub fn get(&self, id: EntryId) -> Option<JournalEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    /// Current published snapshot, without touching storage.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Inserts the welcome entry when the persisted collection is empty.
    ///
    /// Returns whether a seed entry was written. Any existing entry, seed
    /// or not, suppresses seeding. An unreadable blob counts as empty and
    /// is replaced.
    pub fn ensure_seeded(&self) -> StoreResult<bool> {
        let seed = {
            let guard = self.lock_writes();
            match self.load_stored() {
                Ok(stored) if !stored.is_empty() => return Ok(false),
                Ok(_) => {}
                Err(StoreError::Decode(err)) => {
                    warn!(
                        "event=store_seed module=store status=replacing_unreadable error={err}"
                    );
                }
                Err(err) => return Err(err),
            }

            let seed = JournalEntry::welcome(Utc::now());
            self.upsert_locked(Vec::new(), &seed, &guard)?;
            seed
        };
        self.notify_observers();

        info!(
            "event=store_seed module=store status=ok entry_id={}",
            seed.id
        );
        Ok(true)
    }

    /// Replaces an unreadable blob with an empty collection.
    ///
    /// Returns `true` when the blob was unreadable and has been reset;
    /// a readable or missing blob is left alone.
    pub fn recover_unreadable(&self) -> StoreResult<bool> {
        {
            let _guard = self.lock_writes();
            match self.load_stored() {
                Ok(_) => return Ok(false),
                Err(StoreError::Decode(err)) => {
                    warn!("event=store_recover module=store status=start error={err}");
                }
                Err(err) => return Err(err),
            }

            let bytes = encode_entries(&[]).map_err(StoreError::Encode)?;
            self.blobs.write(&self.blob_key, &bytes)?;
            self.publish(Vec::new());
        }
        self.notify_observers();

        info!("event=store_recover module=store status=ok");
        Ok(true)
    }

    /// Registers an observer for snapshot republishes.
    pub fn subscribe(&self, observer: Arc<dyn EntryObserver>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // The guard protects no data; a panic elsewhere leaves nothing to repair.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Caller holds `write_lock`; the guard parameter proves it.
    fn upsert_locked(
        &self,
        mut entries: Vec<JournalEntry>,
        entry: &JournalEntry,
        _guard: &MutexGuard<'_, ()>,
    ) -> StoreResult<()> {
        let started_at = Instant::now();

        let mode = match entries.iter().position(|e| e.same_identity(entry)) {
            Some(index) => {
                entries[index] = entry.clone();
                "update"
            }
            None => {
                entries.push(entry.clone());
                "insert"
            }
        };

        let bytes = encode_entries(&entries).map_err(StoreError::Encode)?;
        if let Err(err) = self.blobs.write(&self.blob_key, &bytes) {
            error!(
                "event=entry_save module=store status=error entry_id={} type={} mode={mode} error={err}",
                entry.id, entry.kind
            );
            return Err(err.into());
        }

        info!(
            "event=entry_save module=store status=ok entry_id={} type={} mode={mode} entry_count={} duration_ms={}",
            entry.id,
            entry.kind,
            entries.len(),
            started_at.elapsed().as_millis()
        );

        sort_newest_first(&mut entries);
        self.publish(entries);
        Ok(())
    }

    /// Persisted entries in stored order; missing blob reads as empty.
    fn load_stored(&self) -> StoreResult<Vec<JournalEntry>> {
        match self.blobs.read(&self.blob_key)? {
            Some(bytes) => decode_entries(&bytes).map_err(StoreError::Decode),
            None => Ok(Vec::new()),
        }
    }

    // Only called with `write_lock` held.
    fn publish(&self, entries: Vec<JournalEntry>) {
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entries;
    }

    // Called after `write_lock` is released. Observers get the latest
    // snapshot, never one older than a save that has already returned.
    fn notify_observers(&self) {
        self.observers.notify(&self.entries());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::model::mood;

    fn unseeded() -> StoreConfig {
        StoreConfig {
            seed_on_open: false,
            ..StoreConfig::default()
        }
    }

    #[test]
    fn open_seeds_empty_store_by_default() {
        let store = EntryStore::open(MemoryBlobStore::new(), StoreConfig::default()).unwrap();
        let entries = store.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].has_tag(mood::REFLECTIVE));
        assert_eq!(store.list(), entries);
    }

    #[test]
    fn open_without_seeding_leaves_store_empty() {
        let store = EntryStore::open(MemoryBlobStore::new(), unseeded()).unwrap();
        assert!(store.entries().is_empty());
        assert!(store.blob_store().read(DEFAULT_BLOB_KEY).unwrap().is_none());
    }

    #[test]
    fn invalid_entry_is_rejected_before_any_write() {
        let store = EntryStore::open(MemoryBlobStore::new(), unseeded()).unwrap();
        let entry = JournalEntry::new(EntryType::Audio, "no file", Utc::now());

        let err = store.save(&entry).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.blob_store().write_count(), 0);
    }

    #[test]
    fn save_refuses_to_overwrite_unreadable_blob() {
        let blobs = MemoryBlobStore::new();
        blobs.write(DEFAULT_BLOB_KEY, b"not json").unwrap();
        let store = EntryStore::open(blobs, unseeded()).unwrap();

        let entry = JournalEntry::new(EntryType::Text, "fresh", Utc::now());
        assert!(matches!(store.save(&entry), Err(StoreError::Decode(_))));
        assert_eq!(
            store.blob_store().read(DEFAULT_BLOB_KEY).unwrap().as_deref(),
            Some(&b"not json"[..])
        );
    }

    #[test]
    fn default_open_replaces_unreadable_blob_with_seed() {
        let blobs = MemoryBlobStore::new();
        blobs.write(DEFAULT_BLOB_KEY, b"[{\"broken\"").unwrap();

        let store = EntryStore::open(blobs, StoreConfig::default()).unwrap();

        let entries = store.try_list().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].has_tag(mood::REFLECTIVE));
        assert_eq!(store.entries(), entries);
    }

    #[test]
    fn recover_unreadable_makes_store_writable_again() {
        let blobs = MemoryBlobStore::new();
        blobs.write(DEFAULT_BLOB_KEY, b"garbage").unwrap();
        let store = EntryStore::open(blobs, unseeded()).unwrap();

        assert!(store.recover_unreadable().unwrap());
        assert!(!store.recover_unreadable().unwrap());
        assert!(store.try_list().unwrap().is_empty());

        let entry = JournalEntry::new(EntryType::Text, "after recovery", Utc::now());
        store.save(&entry).unwrap();
        assert_eq!(store.list(), vec![entry]);
    }

    #[test]
    fn poisoned_locks_do_not_block_saves_or_reads() {
        let store = Arc::new(EntryStore::open(MemoryBlobStore::new(), unseeded()).unwrap());
        let holder = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _writes = holder.lock_writes();
            let _published = holder.published.write().unwrap();
            panic!("writer died mid-save");
        })
        .join();
        assert!(store.write_lock.is_poisoned());
        assert!(store.published.is_poisoned());

        let entry = JournalEntry::new(EntryType::Text, "still writable", Utc::now());
        store.save(&entry).unwrap();

        assert_eq!(store.entries(), vec![entry.clone()]);
        assert_eq!(store.list(), vec![entry]);
    }

    #[test]
    fn observer_count_tracks_subscriptions() {
        let store = EntryStore::open(MemoryBlobStore::new(), unseeded()).unwrap();
        let id = store.subscribe(Arc::new(|_: &[JournalEntry]| {}));
        assert_eq!(store.observer_count(), 1);
        store.unsubscribe(id);
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn custom_blob_key_is_used() {
        let config = StoreConfig {
            blob_key: "alt".to_string(),
            seed_on_open: true,
        };
        let store = EntryStore::open(MemoryBlobStore::new(), config).unwrap();
        assert_eq!(store.blob_key(), "alt");
        assert!(store.blob_store().read("alt").unwrap().is_some());
        assert!(store.blob_store().read(DEFAULT_BLOB_KEY).unwrap().is_none());
    }
}
