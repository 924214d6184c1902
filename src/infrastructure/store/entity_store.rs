use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::RecordId;
use tokio::sync::{RwLock, broadcast};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// What just happened to a store, for observers that re-render on change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    Replaced,
    Inserted(RecordId),
    Updated(RecordId),
    Removed(RecordId),
}

/// In-memory ordered collection for one entity kind.
///
/// Records are kept sorted by `created_at` descending. Only the sync channel
/// and the mutation gateway write here; every mutation takes the write lock
/// once and is never held across an await, so mutations are atomic with
/// respect to interleaved callbacks.
pub struct EntityStore<T: SyncRecord> {
    records: RwLock<Vec<T>>,
    changes: broadcast::Sender<StoreChange>,
}

impl<T: SyncRecord> EntityStore<T> {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            records: RwLock::new(Vec::new()),
            changes,
        }
    }

    /// Observe mutations. Receivers that lag simply miss notifications and
    /// re-read the snapshot on the next one.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Replace the whole collection (bulk fetch / explicit refresh).
    pub async fn replace_all(&self, mut records: Vec<T>) {
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        *self.records.write().await = records;
        self.notify(StoreChange::Replaced);
    }

    /// Insert a record, or update it in place when the id already exists.
    /// An id collision never produces a duplicate.
    pub async fn upsert(&self, record: T) {
        let id = record.id().clone();
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.id() == &id) {
            *existing = record;
            drop(records);
            self.notify(StoreChange::Updated(id));
            return;
        }
        records.push(record);
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        drop(records);
        self.notify(StoreChange::Inserted(id));
    }

    /// Apply the mutable fields of `update` to the record with the same id.
    /// Returns false when the id is unknown (a tolerated race with a
    /// not-yet-applied insert).
    pub async fn apply_update(&self, update: &T) -> bool {
        let id = update.id().clone();
        let mut records = self.records.write().await;
        let Some(existing) = records.iter_mut().find(|r| r.id() == &id) else {
            return false;
        };
        existing.apply_update(update);
        drop(records);
        self.notify(StoreChange::Updated(id));
        true
    }

    /// Set a record's status, returning the previous status for rollback.
    pub async fn set_status(&self, id: &RecordId, status: T::Status) -> Option<T::Status> {
        let mut records = self.records.write().await;
        let existing = records.iter_mut().find(|r| r.id() == id)?;
        let previous = existing.status();
        existing.set_status(status);
        drop(records);
        self.notify(StoreChange::Updated(id.clone()));
        Some(previous)
    }

    /// Remove by id. No-op (None) when already absent, so a repeated remote
    /// delete leaves the store untouched.
    pub async fn remove(&self, id: &RecordId) -> Option<T> {
        let mut records = self.records.write().await;
        let index = records.iter().position(|r| r.id() == id)?;
        let removed = records.remove(index);
        drop(records);
        self.notify(StoreChange::Removed(id.clone()));
        Some(removed)
    }

    /// Supersede an optimistic placeholder with the confirmed record.
    ///
    /// Done under one write lock: the placeholder is dropped and the
    /// confirmed record upserted, so no observer ever sees both records for
    /// the same logical creation, even when the subscription echo already
    /// inserted the confirmed id.
    pub async fn reconcile(&self, placeholder: &RecordId, confirmed: T) {
        let confirmed_id = confirmed.id().clone();
        let mut records = self.records.write().await;
        if let Some(index) = records.iter().position(|r| r.id() == placeholder) {
            records.remove(index);
        }
        if let Some(existing) = records.iter_mut().find(|r| r.id() == &confirmed_id) {
            *existing = confirmed;
        } else {
            records.push(confirmed);
            records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        }
        drop(records);
        self.notify(StoreChange::Updated(confirmed_id));
    }

    pub async fn get(&self, id: &RecordId) -> Option<T> {
        self.records.read().await.iter().find(|r| r.id() == id).cloned()
    }

    /// Current contents, newest first.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn notify(&self, change: StoreChange) {
        // No receivers is fine; nothing is observing this store yet.
        let _ = self.changes.send(change);
    }
}

impl<T: SyncRecord> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
