use crate::application::ports::remote_table::RemoteTable;
use crate::application::services::notice_service::NoticeCenter;
use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::RecordId;
use crate::infrastructure::store::EntityStore;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Optimistic create/update/delete with remote reconciliation.
///
/// Every mutation is applied to the entity store synchronously for immediate
/// feedback, then pushed to the backend. Failures roll the store back and
/// surface a notice; successes reconcile the optimistic state against the
/// authoritative one.
pub struct MutationGateway<T: SyncRecord> {
    remote: Arc<dyn RemoteTable<T>>,
    store: Arc<EntityStore<T>>,
    notices: Arc<NoticeCenter>,
}

impl<T: SyncRecord> MutationGateway<T> {
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

    /// Insert `pending` (carrying a local placeholder id) immediately, then
    /// confirm it remotely. On success the placeholder is superseded by the
    /// authoritative record, never left alongside it, regardless of whether
    /// the subscription echo won the race. On failure the placeholder is
    /// rolled back.
    pub async fn create(&self, pending: T) -> Result<T, AppError> {
        let placeholder_id = pending.id().clone();
        debug_assert!(placeholder_id.is_local());
        self.store.upsert(pending.clone()).await;

        match self.remote.insert(&pending).await {
            Ok(confirmed) => {
                self.store.reconcile(&placeholder_id, confirmed.clone()).await;
                debug!(
                    table = T::TABLE,
                    id = %confirmed.id(),
                    "optimistic create confirmed"
                );
                Ok(confirmed)
            }
            Err(err) => {
                self.store.remove(&placeholder_id).await;
                warn!(table = T::TABLE, "create failed, rolled back: {err}");
                self.notices
                    .error(format!("Failed to submit: {}", err.user_message()))
                    .await;
                Err(err)
            }
        }
    }

    /// Optimistic status change. On remote failure the previous status is
    /// restored before the failure is surfaced.
    pub async fn update_status(&self, id: &RecordId, status: T::Status) -> Result<(), AppError> {
        let Some(previous) = self.store.set_status(id, status.clone()).await else {
            return Err(AppError::NotFound(format!("{} {id}", T::TABLE)));
        };

        if let Err(err) = self.remote.update_status(id, &status).await {
            self.store.set_status(id, previous).await;
            warn!(table = T::TABLE, %id, "status update failed, restored: {err}");
            self.notices
                .error(format!("Failed to update status: {}", err.user_message()))
                .await;
            return Err(err);
        }
        Ok(())
    }

    /// Optimistic removal. On remote failure the removed record is restored
    /// and the failure surfaced.
    pub async fn delete(&self, id: &RecordId) -> Result<(), AppError> {
        let Some(removed) = self.store.remove(id).await else {
            // Already gone (e.g. a remote delete beat us); nothing to undo.
            return Ok(());
        };

        if let Err(err) = self.remote.delete(id).await {
            self.store.upsert(removed).await;
            warn!(table = T::TABLE, %id, "delete failed, restored: {err}");
            self.notices
                .error(format!("Failed to delete: {}", err.user_message()))
                .await;
            return Err(err);
        }
        Ok(())
    }
}
