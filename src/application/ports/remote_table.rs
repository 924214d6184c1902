use crate::domain::entities::SyncRecord;
use crate::domain::value_objects::RecordId;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Kind of committed change announced on a table's change stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A raw change notification as delivered by the backend.
///
/// The payload is left undecoded here; the sync channel deserializes it and
/// drops malformed payloads with a warning instead of failing the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChange {
    pub op: ChangeOp,
    pub record: serde_json::Value,
}

impl RemoteChange {
    pub fn new(op: ChangeOp, record: serde_json::Value) -> Self {
        Self { op, record }
    }
}

/// One backend table plus its change stream, per entity kind.
///
/// The channel delivers each committed change at most once; closing the
/// channel signals connection loss. There is no auto-retry; callers refresh
/// explicitly.
#[async_trait]
pub trait RemoteTable<T: SyncRecord>: Send + Sync {
    /// Full table contents ordered by `created_at` descending.
    async fn fetch_all(&self) -> Result<Vec<T>, AppError>;

    /// Insert and return the confirmed record (authoritative id and
    /// timestamps).
    async fn insert(&self, record: &T) -> Result<T, AppError>;

    async fn update_status(&self, id: &RecordId, status: &T::Status) -> Result<(), AppError>;

    async fn delete(&self, id: &RecordId) -> Result<(), AppError>;

    /// Subscribe to committed changes on this table.
    async fn subscribe(&self) -> Result<mpsc::Receiver<RemoteChange>, AppError>;
}
