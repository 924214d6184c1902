#![allow(dead_code)]

use async_trait::async_trait;
use sagip_core::application::ports::hazard_feed::{CycloneFeed, SeismicFeed};
use sagip_core::application::ports::map_surface::{
    CameraCommand, MapLayer, MapSurface, MarkerDescriptor,
};
use sagip_core::application::ports::position_provider::{
    AcquireOptions, PositionError, PositionProvider,
};
use sagip_core::application::ports::remote_table::{ChangeOp, RemoteChange, RemoteTable};
use sagip_core::domain::entities::{CycloneTrack, SeismicEvent, SyncRecord};
use sagip_core::domain::value_objects::{Coordinates, RecordId};
use sagip_core::shared::error::AppError;
use sagip_core::state::ExternalServices;
use sagip_core::AppConfig;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::{Mutex, mpsc};

/// Backend table double: assigns server ids, fans change events out to every
/// subscriber, and can be told to fail or to echo its own inserts the way a
/// realtime backend does.
pub struct FakeTable<T: SyncRecord> {
    rows: Mutex<Vec<T>>,
    next_id: AtomicI64,
    subscribers: Mutex<Vec<mpsc::Sender<RemoteChange>>>,
    pub fail_insert: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_delete: AtomicBool,
    /// When set, `insert` emits the confirming Insert event before the
    /// direct response is returned, the echo-wins-the-race order.
    pub echo_inserts: AtomicBool,
}

impl<T: SyncRecord> FakeTable<T> {
    pub fn new() -> Arc<Self> {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<T>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            next_id: AtomicI64::new(1),
            subscribers: Mutex::new(Vec::new()),
            fail_insert: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            echo_inserts: AtomicBool::new(false),
        })
    }

    pub async fn emit(&self, change: RemoteChange) {
        let subscribers = self.subscribers.lock().await;
        for tx in subscribers.iter() {
            let _ = tx.send(change.clone()).await;
        }
    }

    pub async fn emit_insert(&self, record: &T) {
        self.emit(RemoteChange::new(
            ChangeOp::Insert,
            serde_json::to_value(record).expect("serialize record"),
        ))
        .await;
    }

    pub async fn emit_update(&self, record: &T) {
        self.emit(RemoteChange::new(
            ChangeOp::Update,
            serde_json::to_value(record).expect("serialize record"),
        ))
        .await;
    }

    pub async fn emit_delete(&self, id: &RecordId) {
        self.emit(RemoteChange::new(
            ChangeOp::Delete,
            json!({ "id": serde_json::to_value(id).expect("serialize id") }),
        ))
        .await;
    }

    /// Drop every subscriber channel, simulating connection loss.
    pub async fn disconnect(&self) {
        self.subscribers.lock().await.clear();
    }

    pub async fn rows(&self) -> Vec<T> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl<T: SyncRecord> RemoteTable<T> for FakeTable<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, AppError> {
        let mut rows = self.rows.lock().await.clone();
        rows.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(rows)
    }

    async fn insert(&self, record: &T) -> Result<T, AppError> {
        if self.fail_insert.load(Ordering::Acquire) {
            return Err(AppError::Network("insert refused".into()));
        }
        let confirmed = {
            let mut value = serde_json::to_value(record).expect("serialize record");
            value["id"] = json!(self.next_id.fetch_add(1, Ordering::SeqCst));
            serde_json::from_value::<T>(value).expect("confirmed record")
        };
        self.rows.lock().await.push(confirmed.clone());
        if self.echo_inserts.load(Ordering::Acquire) {
            self.emit_insert(&confirmed).await;
        }
        Ok(confirmed)
    }

    async fn update_status(&self, id: &RecordId, status: &T::Status) -> Result<(), AppError> {
        if self.fail_update.load(Ordering::Acquire) {
            return Err(AppError::Network("update refused".into()));
        }
        let mut rows = self.rows.lock().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == id) {
            row.set_status(status.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<(), AppError> {
        if self.fail_delete.load(Ordering::Acquire) {
            return Err(AppError::Network("delete refused".into()));
        }
        self.rows.lock().await.retain(|row| row.id() != id);
        Ok(())
    }

    async fn subscribe(&self) -> Result<mpsc::Receiver<RemoteChange>, AppError> {
        let (tx, rx) = mpsc::channel(32);
        self.subscribers.lock().await.push(tx);
        Ok(rx)
    }
}

/// Positioning double with three behaviors.
pub enum FakePositions {
    Fixed(Coordinates),
    Denied,
    /// Never resolves; the gate's timeout decides.
    Stalled,
}

#[async_trait]
impl PositionProvider for FakePositions {
    async fn current_position(&self, _: &AcquireOptions) -> Result<Coordinates, PositionError> {
        match self {
            FakePositions::Fixed(position) => Ok(*position),
            FakePositions::Denied => Err(PositionError::Denied),
            FakePositions::Stalled => futures::future::pending().await,
        }
    }
}

/// Feed double replaying scripted results, then failing.
pub struct ScriptedFeed<T> {
    script: std::sync::Mutex<Vec<Result<Vec<T>, AppError>>>,
}

impl<T> ScriptedFeed<T> {
    pub fn new(script: Vec<Result<Vec<T>, AppError>>) -> Arc<Self> {
        Arc::new(Self {
            script: std::sync::Mutex::new(script),
        })
    }
}

#[async_trait]
impl SeismicFeed for ScriptedFeed<SeismicEvent> {
    async fn fetch(&self) -> Result<Vec<SeismicEvent>, AppError> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(AppError::FeedError("script exhausted".into()));
        }
        script.remove(0)
    }
}

#[async_trait]
impl CycloneFeed for ScriptedFeed<CycloneTrack> {
    async fn fetch(&self) -> Result<Vec<CycloneTrack>, AppError> {
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(AppError::FeedError("script exhausted".into()));
        }
        script.remove(0)
    }
}

/// Map surface double recording rendered layers and camera moves.
#[derive(Default)]
pub struct RecordingSurface {
    layers: std::sync::Mutex<Vec<(MapLayer, Vec<MarkerDescriptor>)>>,
    cameras: std::sync::Mutex<Vec<CameraCommand>>,
    pub fail: AtomicBool,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last_layer(&self, layer: MapLayer) -> Option<Vec<MarkerDescriptor>> {
        self.layers
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(rendered, _)| *rendered == layer)
            .map(|(_, markers)| markers.clone())
    }

    pub fn cameras(&self) -> Vec<CameraCommand> {
        self.cameras.lock().unwrap().clone()
    }
}

#[async_trait]
impl MapSurface for RecordingSurface {
    async fn render_layer(
        &self,
        layer: MapLayer,
        markers: Vec<MarkerDescriptor>,
    ) -> Result<(), AppError> {
        if self.fail.load(Ordering::Acquire) {
            return Err(AppError::Internal("surface crashed".into()));
        }
        self.layers.lock().unwrap().push((layer, markers));
        Ok(())
    }

    async fn move_camera(&self, command: CameraCommand) -> Result<(), AppError> {
        if self.fail.load(Ordering::Acquire) {
            return Err(AppError::Internal("surface crashed".into()));
        }
        self.cameras.lock().unwrap().push(command);
        Ok(())
    }
}

/// One fully-wired fake environment.
pub struct TestEnv {
    pub requests: Arc<FakeTable<sagip_core::domain::entities::HelpRequest>>,
    pub shelters: Arc<FakeTable<sagip_core::domain::entities::Shelter>>,
    pub family_posts: Arc<FakeTable<sagip_core::domain::entities::FamilyPost>>,
    pub surface: Arc<RecordingSurface>,
}

impl TestEnv {
    pub fn services(
        &self,
        positions: FakePositions,
        seismic: Arc<ScriptedFeed<SeismicEvent>>,
        cyclones: Arc<ScriptedFeed<CycloneTrack>>,
    ) -> ExternalServices {
        ExternalServices {
            requests: self.requests.clone(),
            shelters: self.shelters.clone(),
            family_posts: self.family_posts.clone(),
            seismic_feed: seismic,
            cyclone_feed: cyclones,
            positions: Arc::new(positions),
            surface: self.surface.clone(),
        }
    }
}

pub fn env() -> TestEnv {
    TestEnv {
        requests: FakeTable::new(),
        shelters: FakeTable::new(),
        family_posts: FakeTable::new(),
        surface: RecordingSurface::new(),
    }
}

pub fn config() -> AppConfig {
    AppConfig::default()
}

/// Let queued change events drain through the apply loops. Under a paused
/// clock this advances instantly once every task is idle.
pub async fn settle() {
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
