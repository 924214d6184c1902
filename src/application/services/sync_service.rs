use crate::application::ports::remote_table::{ChangeOp, RemoteChange, RemoteTable};
use crate::application::services::notice_service::NoticeCenter;
use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::RecordId;
use crate::infrastructure::store::EntityStore;
use crate::shared::error::AppError;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shape of a delete notification's payload.
#[derive(Debug, Deserialize)]
struct DeletedRecord {
    id: RecordId,
}

/// Live link between a view and one table's change stream.
///
/// Dropping the handle aborts the apply loop, so a view that goes away
/// (normally or through an error path) always releases its subscription.
pub struct SubscriptionHandle {
    table: &'static str,
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    fn new(table: &'static str, task: JoinHandle<()>) -> Self {
        Self { table, task }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn close(self) {
        // Drop does the work.
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(table = self.table, "change subscription released");
    }
}

/// Per-entity-type remote sync: one bulk fetch, then a long-lived
/// subscription applying each committed change to the entity store.
pub struct SyncChannel<T: SyncRecord> {
    remote: Arc<dyn RemoteTable<T>>,
    store: Arc<EntityStore<T>>,
    notices: Arc<NoticeCenter>,
}

impl<T: SyncRecord> SyncChannel<T> {
    pub fn new(
        remote: Arc<dyn RemoteTable<T>>,
        store: Arc<EntityStore<T>>,
        notices: Arc<NoticeCenter>,
    ) -> Self {
        Self {
            remote,
            store,
            notices,
        }
    }

    /// Bulk fetch into the store, then start applying change events as they
    /// arrive. The returned handle owns the apply loop.
    pub async fn open(&self) -> Result<SubscriptionHandle, AppError> {
        self.refresh().await?;
        let rx = self.remote.subscribe().await?;
        let store = Arc::clone(&self.store);
        let notices = Arc::clone(&self.notices);
        let task = tokio::spawn(Self::apply_loop(rx, store, notices));
        Ok(SubscriptionHandle::new(T::TABLE, task))
    }

    /// Full re-fetch. The canonical remedy after a lost subscription; there
    /// is no automatic retry.
    pub async fn refresh(&self) -> Result<(), AppError> {
        let records = self.remote.fetch_all().await?;
        self.store.replace_all(records).await;
        Ok(())
    }

    async fn apply_loop(
        mut rx: mpsc::Receiver<RemoteChange>,
        store: Arc<EntityStore<T>>,
        notices: Arc<NoticeCenter>,
    ) {
        while let Some(change) = rx.recv().await {
            Self::apply_change(&store, change).await;
        }
        // A closed stream means the connection is gone. Surface it and let
        // the user refresh; stale data keeps rendering meanwhile.
        warn!(table = T::TABLE, "change stream closed");
        notices
            .warning("Live updates were interrupted. Please refresh.")
            .await;
    }

    async fn apply_change(store: &EntityStore<T>, change: RemoteChange) {
        match change.op {
            ChangeOp::Insert => match serde_json::from_value::<T>(change.record) {
                Ok(record) => store.upsert(record).await,
                Err(err) => warn!(table = T::TABLE, "dropping malformed insert event: {err}"),
            },
            ChangeOp::Update => match serde_json::from_value::<T>(change.record) {
                Ok(record) => {
                    if !store.apply_update(&record).await {
                        // Races a not-yet-applied insert; the insert event
                        // will carry the same fields.
                        debug!(
                            table = T::TABLE,
                            id = %record.id(),
                            "update for unknown id ignored"
                        );
                    }
                }
                Err(err) => warn!(table = T::TABLE, "dropping malformed update event: {err}"),
            },
            ChangeOp::Delete => match serde_json::from_value::<DeletedRecord>(change.record) {
                Ok(deleted) => {
                    store.remove(&deleted.id).await;
                }
                Err(err) => warn!(table = T::TABLE, "dropping malformed delete event: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{HelpRequest, Urgency};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct TestTable {
        rows: Vec<HelpRequest>,
        events: Mutex<Option<mpsc::Receiver<RemoteChange>>>,
    }

    impl TestTable {
        fn new(rows: Vec<HelpRequest>) -> (Arc<Self>, mpsc::Sender<RemoteChange>) {
            let (tx, rx) = mpsc::channel(16);
            (
                Arc::new(Self {
                    rows,
                    events: Mutex::new(Some(rx)),
                }),
                tx,
            )
        }
    }

    #[async_trait]
    impl RemoteTable<HelpRequest> for TestTable {
        async fn fetch_all(&self) -> Result<Vec<HelpRequest>, AppError> {
            Ok(self.rows.clone())
        }

        async fn insert(&self, record: &HelpRequest) -> Result<HelpRequest, AppError> {
            Ok(record.clone())
        }

        async fn update_status(&self, _: &RecordId, _: &Urgency) -> Result<(), AppError> {
            Ok(())
        }

        async fn delete(&self, _: &RecordId) -> Result<(), AppError> {
            Ok(())
        }

        async fn subscribe(&self) -> Result<mpsc::Receiver<RemoteChange>, AppError> {
            self.events
                .lock()
                .await
                .take()
                .ok_or_else(|| AppError::SubscriptionClosed("already subscribed".into()))
        }
    }

    fn confirmed_row(id: i64, need: &str, urgency: Urgency) -> HelpRequest {
        let mut request =
            HelpRequest::new(need.into(), "Ana".into(), "Mabolo".into(), urgency, None);
        request.id = RecordId::Assigned(id);
        request
    }

    fn channel_for(
        rows: Vec<HelpRequest>,
    ) -> (
        SyncChannel<HelpRequest>,
        Arc<EntityStore<HelpRequest>>,
        mpsc::Sender<RemoteChange>,
        Arc<NoticeCenter>,
    ) {
        let (table, tx) = TestTable::new(rows);
        let store = Arc::new(EntityStore::new());
        let notices = Arc::new(NoticeCenter::new(Duration::from_secs(60)));
        let channel = SyncChannel::new(table, Arc::clone(&store), Arc::clone(&notices));
        (channel, store, tx, notices)
    }

    async fn drain_events(store: &EntityStore<HelpRequest>, expected_len: usize) {
        for _ in 0..200 {
            if store.len().await == expected_len {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    #[tokio::test]
    async fn open_loads_bulk_fetch_then_applies_inserts() {
        let (channel, store, tx, _) = channel_for(vec![confirmed_row(1, "water", Urgency::High)]);
        let _handle = channel.open().await.expect("open");
        assert_eq!(store.len().await, 1);

        let row = serde_json::to_value(confirmed_row(2, "food", Urgency::Low)).unwrap();
        tx.send(RemoteChange::new(ChangeOp::Insert, row))
            .await
            .expect("send");
        drain_events(&store, 2).await;
        assert!(store.get(&RecordId::Assigned(2)).await.is_some());
    }

    #[tokio::test]
    async fn duplicate_insert_updates_in_place() {
        let (channel, store, tx, _) = channel_for(vec![confirmed_row(1, "water", Urgency::Low)]);
        let _handle = channel.open().await.expect("open");

        let mut echo = confirmed_row(1, "water", Urgency::High);
        echo.barangay = "Lahug".into();
        tx.send(RemoteChange::new(
            ChangeOp::Insert,
            serde_json::to_value(&echo).unwrap(),
        ))
        .await
        .expect("send");

        for _ in 0..200 {
            if store.get(&RecordId::Assigned(1)).await.expect("row").urgency == Urgency::High {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn delete_for_absent_id_is_tolerated() {
        let (channel, store, tx, _) = channel_for(vec![confirmed_row(1, "water", Urgency::High)]);
        let _handle = channel.open().await.expect("open");

        tx.send(RemoteChange::new(ChangeOp::Delete, json!({ "id": 1 })))
            .await
            .expect("send");
        drain_events(&store, 0).await;
        assert!(store.is_empty().await);

        // Late duplicate delete for the same id.
        tx.send(RemoteChange::new(ChangeOp::Delete, json!({ "id": 1 })))
            .await
            .expect("send");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped_not_fatal() {
        let (channel, store, tx, _) = channel_for(vec![]);
        let _handle = channel.open().await.expect("open");

        tx.send(RemoteChange::new(ChangeOp::Insert, json!("not a record")))
            .await
            .expect("send");
        let row = serde_json::to_value(confirmed_row(3, "medicine", Urgency::Medium)).unwrap();
        tx.send(RemoteChange::new(ChangeOp::Insert, row))
            .await
            .expect("send");

        drain_events(&store, 1).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_before_insert_is_ignored_without_error() {
        let (channel, store, tx, _) = channel_for(vec![]);
        let _handle = channel.open().await.expect("open");

        let row = serde_json::to_value(confirmed_row(8, "water", Urgency::High)).unwrap();
        tx.send(RemoteChange::new(ChangeOp::Update, row))
            .await
            .expect("send");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn closed_stream_surfaces_transient_notice() {
        let (channel, _store, tx, notices) = channel_for(vec![]);
        let handle = channel.open().await.expect("open");
        drop(tx);

        for _ in 0..200 {
            if !notices.active().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(notices.active().await.len(), 1);
        assert!(!handle.is_active());
    }

    #[tokio::test]
    async fn dropping_handle_stops_the_apply_loop() {
        let (channel, store, tx, _) = channel_for(vec![]);
        let handle = channel.open().await.expect("open");
        drop(handle);
        tokio::time::sleep(Duration::from_millis(10)).await;

        let row = serde_json::to_value(confirmed_row(4, "water", Urgency::High)).unwrap();
        // The receiver is gone; at best this send fails, at worst the event
        // is never applied.
        let _ = tx.send(RemoteChange::new(ChangeOp::Insert, row)).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn refresh_replaces_store_contents() {
        let (channel, store, _tx, _) = channel_for(vec![confirmed_row(1, "water", Urgency::High)]);
        store
            .upsert(confirmed_row(99, "stale", Urgency::Low))
            .await;

        channel.refresh().await.expect("refresh");
        assert_eq!(store.len().await, 1);
        assert!(store.get(&RecordId::Assigned(99)).await.is_none());
    }
}
