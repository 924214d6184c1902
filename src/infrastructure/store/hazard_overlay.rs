use crate::domain::entities::{CycloneTrack, SeismicEvent};
use tokio::sync::{RwLock, broadcast};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardLayerChange {
    Seismic,
    Cyclones,
}

/// Latest point-in-time snapshots of the two hazard feeds.
///
/// Each snapshot is replaced wholesale by its poller; a failed poll never
/// touches the snapshot, so readers at worst see stale data.
pub struct HazardOverlay {
    seismic: RwLock<Vec<SeismicEvent>>,
    cyclones: RwLock<Vec<CycloneTrack>>,
    changes: broadcast::Sender<HazardLayerChange>,
}

impl HazardOverlay {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            seismic: RwLock::new(Vec::new()),
            cyclones: RwLock::new(Vec::new()),
            changes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HazardLayerChange> {
        self.changes.subscribe()
    }

    pub async fn replace_seismic(&self, events: Vec<SeismicEvent>) {
        *self.seismic.write().await = events;
        let _ = self.changes.send(HazardLayerChange::Seismic);
    }

    pub async fn replace_cyclones(&self, tracks: Vec<CycloneTrack>) {
        *self.cyclones.write().await = tracks;
        let _ = self.changes.send(HazardLayerChange::Cyclones);
    }

    pub async fn seismic(&self) -> Vec<SeismicEvent> {
        self.seismic.read().await.clone()
    }

    pub async fn cyclones(&self) -> Vec<CycloneTrack> {
        self.cyclones.read().await.clone()
    }
}

impl Default for HazardOverlay {
    fn default() -> Self {
        Self::new()
    }
}
