//! Subscribe/notify registry for published collection changes.

use crate::model::entry::JournalEntry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Receives the full published collection after every republish.
pub trait EntryObserver: Send + Sync {
    fn entries_changed(&self, entries: &[JournalEntry]);
}

impl<F> EntryObserver for F
where
    F: Fn(&[JournalEntry]) + Send + Sync,
{
    fn entries_changed(&self, entries: &[JournalEntry]) {
        self(entries)
    }
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: AtomicU64,
    observers: Mutex<BTreeMap<SubscriptionId, Arc<dyn EntryObserver>>>,
}

impl ObserverRegistry {
    pub(crate) fn subscribe(&self, observer: Arc<dyn EntryObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(id, observer);
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Calls observers in subscription order, outside the registry lock so
    /// an observer may subscribe or unsubscribe re-entrantly.
    pub(crate) fn notify(&self, entries: &[JournalEntry]) {
        let targets: Vec<Arc<dyn EntryObserver>> = self.lock().values().cloned().collect();
        for observer in targets {
            observer.entries_changed(entries);
        }
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<SubscriptionId, Arc<dyn EntryObserver>>> {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
